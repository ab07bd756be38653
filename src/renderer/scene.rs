//! Scene building: session state in, coloured triangles out
//!
//! `build_scene` reads the session and never mutates it. All coordinates are
//! playfield units (850×1000, +y down); the pipeline letterboxes them.

use glam::Vec2;

use super::anim;
use super::glyphs::{self, Align};
use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::PLAYFIELD_HEIGHT;
use crate::player_line;
use crate::sim::{
    InvaderKind, PowerUpKind, ProjectileKind, SessionState, WeaponKind, WeaponMode, palette,
};

const STROKE: f32 = 2.5;
const POWER_UP_STROKE: f32 = 3.0;
const CIRCLE_SEGMENTS: u32 = 24;

const SHIELD_RADIUS: f32 = 80.0;
const SHIELD_Y_OFFSET: f32 = 5.0;

const HUD_LEFT: f32 = 20.0;
const HUD_BAR_WIDTH: f32 = 200.0;
const HUD_BAR_HEIGHT: f32 = 10.0;
const HUD_SPACING: f32 = 28.0;
const HUD_TEXT_PIXEL: f32 = 2.0;
const OVERDRIVE_CAPTION: &str = "OVERDRIVE";
const OVERDRIVE_PIXEL: f32 = 1.5;
const LABEL_PIXEL: f32 = 2.0;

/// Render-side knobs derived from user settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub draw_stars: bool,
    /// Newest particles beyond this count are the ones kept
    pub max_particles: usize,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            draw_stars: true,
            max_particles: usize::MAX,
        }
    }
}

/// Back-to-front triangle list for one frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub vertices: Vec<Vertex>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Build a scene with default options
pub fn build_scene(state: &SessionState) -> Scene {
    build_scene_with(state, &SceneOptions::default())
}

pub fn build_scene_with(state: &SessionState, options: &SceneOptions) -> Scene {
    let mut out = Vec::with_capacity(8192);
    let frame = state.frame_count;

    if options.draw_stars {
        for star in &state.stars {
            shapes::rect(&mut out, star.pos, Vec2::splat(star.size), colors::STAR);
        }
    }

    let skip = state.particles.len().saturating_sub(options.max_particles);
    for p in state.particles.iter().skip(skip) {
        shapes::rect(&mut out, p.pos, Vec2::splat(p.size), with_alpha(p.color, p.life.clamp(0.0, 1.0)));
    }

    for invader in &state.invaders {
        let center = invader.center();
        draw_invader(&mut out, invader.kind, center, invader.color, anim::invader_wobble(frame, center.x));
    }

    for p in &state.projectiles {
        match p.kind {
            ProjectileKind::Plasma => {
                shapes::circle(&mut out, p.pos, p.size.x / 2.0, p.color, CIRCLE_SEGMENTS)
            }
            _ => shapes::rect(
                &mut out,
                Vec2::new(p.pos.x - p.size.x / 2.0, p.pos.y),
                p.size,
                p.color,
            ),
        }
    }

    let rotation = anim::power_up_rotation(frame);
    for pu in &state.power_ups {
        draw_power_up(&mut out, pu.kind, pu.pos, pu.color, rotation);
        glyphs::draw_text(&mut out, pu.label, pu.pos, LABEL_PIXEL, Align::Center, colors::HUD_TEXT);
    }

    draw_player(&mut out, Vec2::new(state.player_x, player_line()), anim::thruster_flicker(frame));

    if state.shield.is_active() {
        shapes::dashed_ring(
            &mut out,
            Vec2::new(state.player_x, player_line() + SHIELD_Y_OFFSET),
            SHIELD_RADIUS,
            4.0,
            10.0,
            5.0,
            colors::SHIELD_RING,
        );
    }

    draw_hud(&mut out, state);

    Scene { vertices: out }
}

fn local(points: &[(f32, f32)], origin: Vec2) -> Vec<Vec2> {
    points.iter().map(|&(x, y)| origin + Vec2::new(x, y)).collect()
}

fn draw_player(out: &mut Vec<Vertex>, at: Vec2, flicker: f32) {
    let hull = local(
        &[
            (0.0, -40.0),
            (-10.0, -10.0),
            (-45.0, 25.0),
            (-12.0, 15.0),
            (-10.0, 35.0),
            (10.0, 35.0),
            (12.0, 15.0),
            (45.0, 25.0),
            (10.0, -10.0),
        ],
        at,
    );
    shapes::polygon_fill(out, &hull, with_alpha(colors::PLAYER, 0.4));
    shapes::polygon_outline(out, &hull, STROKE, colors::PLAYER);

    let fade = with_alpha(colors::PLAYER, 0.0);
    for dx in [-15.0, 5.0] {
        shapes::gradient_rect(
            out,
            at + Vec2::new(dx, 35.0),
            Vec2::new(10.0, flicker),
            colors::PLAYER,
            fade,
        );
    }

    shapes::ellipse(out, at + Vec2::new(0.0, -2.0), Vec2::new(6.0, 12.0), colors::COCKPIT, CIRCLE_SEGMENTS);
}

fn draw_invader(out: &mut Vec<Vertex>, kind: InvaderKind, at: Vec2, color: [f32; 4], wobble: f32) {
    match kind {
        InvaderKind::Commander => {
            let hull = local(
                &[
                    (-35.0, -25.0),
                    (35.0, -25.0),
                    (45.0, 10.0 + wobble),
                    (0.0, 35.0),
                    (-45.0, 10.0 - wobble),
                ],
                at,
            );
            shapes::polygon_fill(out, &hull, color);
            shapes::polygon_outline(out, &hull, STROKE, color);
            for dx in [-18.0, 12.0] {
                shapes::rect(out, at + Vec2::new(dx, -12.0), Vec2::splat(6.0), colors::INVADER_EYES);
            }
        }
        InvaderKind::Heavy => {
            let hull = local(
                &[
                    (-40.0, 0.0),
                    (-25.0, -20.0),
                    (25.0, -20.0),
                    (40.0, 0.0),
                    (35.0, 30.0 + wobble),
                    (-35.0, 30.0 - wobble),
                ],
                at,
            );
            shapes::polygon_fill(out, &hull, with_alpha(color, 0.3));
            shapes::polygon_outline(out, &hull, STROKE, color);
        }
        InvaderKind::Scout => {
            let hull = local(
                &[
                    (0.0, -30.0),
                    (-30.0, 20.0 + wobble),
                    (0.0, 10.0),
                    (30.0, 20.0 - wobble),
                ],
                at,
            );
            shapes::polygon_outline(out, &hull, STROKE, color);
        }
        InvaderKind::Basic => {
            let mut hull = shapes::arc_points(at, 25.0, std::f32::consts::PI, std::f32::consts::TAU, 12);
            hull.extend(local(
                &[
                    (30.0, 20.0 + wobble),
                    (15.0, 15.0),
                    (-15.0, 15.0),
                    (-30.0, 20.0 - wobble),
                ],
                at,
            ));
            shapes::polygon_outline(out, &hull, STROKE, color);
        }
    }
}

fn draw_power_up(out: &mut Vec<Vertex>, kind: PowerUpKind, at: Vec2, color: [f32; 4], angle: f32) {
    match kind {
        PowerUpKind::Health => {
            let cross: Vec<Vec2> = [
                (-15.0, -5.0),
                (-5.0, -5.0),
                (-5.0, -15.0),
                (5.0, -15.0),
                (5.0, -5.0),
                (15.0, -5.0),
                (15.0, 5.0),
                (5.0, 5.0),
                (5.0, 15.0),
                (-5.0, 15.0),
                (-5.0, 5.0),
                (-15.0, 5.0),
            ]
            .iter()
            .map(|&(x, y)| Vec2::new(x, y))
            .collect();
            shapes::polygon_outline(out, &shapes::transform(&cross, at, angle), POWER_UP_STROKE, color);
        }
        PowerUpKind::Shield => {
            shapes::ring(out, at, 18.0, POWER_UP_STROKE, color, CIRCLE_SEGMENTS);
            shapes::ring(out, at, 10.0, POWER_UP_STROKE, color, CIRCLE_SEGMENTS);
        }
        PowerUpKind::Nuke => {
            let tri = [
                Vec2::new(0.0, -20.0),
                Vec2::new(20.0, 20.0),
                Vec2::new(-20.0, 20.0),
            ];
            shapes::polygon_outline(out, &shapes::transform(&tri, at, angle), POWER_UP_STROKE, color);
        }
        PowerUpKind::Spread | PowerUpKind::Rapid | PowerUpKind::Beam | PowerUpKind::Plasma => {
            let hex = shapes::regular_polygon(6, 22.0);
            shapes::polygon_outline(out, &shapes::transform(&hex, at, angle), POWER_UP_STROKE, color);
        }
    }
}

/// Label row plus empty bar track
fn hud_bar_frame(out: &mut Vec<Vertex>, y: f32, label: &str, value: &str, color: [f32; 4], track: [f32; 4]) {
    glyphs::draw_text(out, label, Vec2::new(HUD_LEFT, y), HUD_TEXT_PIXEL, Align::Left, color);
    glyphs::draw_text(
        out,
        value,
        Vec2::new(HUD_LEFT + HUD_BAR_WIDTH, y),
        HUD_TEXT_PIXEL,
        Align::Right,
        color,
    );
    shapes::rect(
        out,
        Vec2::new(HUD_LEFT, y + 12.0),
        Vec2::new(HUD_BAR_WIDTH, HUD_BAR_HEIGHT),
        track,
    );
}

fn draw_hud(out: &mut Vec<Vertex>, state: &SessionState) {
    let mut y = PLAYFIELD_HEIGHT - 40.0;
    let row_step = HUD_BAR_HEIGHT + HUD_SPACING + 12.0;

    if state.shield.is_active() {
        let ratio = state.shield.ratio();
        let percent = format!("{}%", (ratio * 100.0).round() as u32);
        hud_bar_frame(out, y, "SHIELD STATUS", &percent, palette::YELLOW, colors::HUD_SHIELD_TRACK);
        shapes::rect(
            out,
            Vec2::new(HUD_LEFT, y + 12.0),
            Vec2::new(HUD_BAR_WIDTH * ratio, HUD_BAR_HEIGHT),
            palette::YELLOW,
        );
        y -= row_step;
    }

    if let WeaponMode::Charged { kind, remaining, cap } = state.weapon {
        let color = kind.hud_color();
        let label = format!("WEAPON: {}", kind.name());
        let ammo = match kind {
            WeaponKind::Nuke => format!("{remaining}x"),
            _ => remaining.to_string(),
        };
        hud_bar_frame(out, y, &label, &ammo, color, colors::HUD_TRACK);
        shapes::rect_outline(
            out,
            Vec2::new(HUD_LEFT, y + 12.0),
            Vec2::new(HUD_BAR_WIDTH, HUD_BAR_HEIGHT),
            1.0,
            colors::HUD_TRACK_EDGE,
        );

        let overdrive = state.weapon.is_overdrive();
        let ratio = (remaining as f32 / cap.max(1) as f32).min(1.0);
        let fill = if !overdrive {
            color
        } else if anim::overdrive_blink(state.frame_count) {
            with_alpha(palette::WHITE, 0.7)
        } else {
            palette::WHITE
        };
        let filled = HUD_BAR_WIDTH * ratio;
        shapes::rect(out, Vec2::new(HUD_LEFT, y + 12.0), Vec2::new(filled, HUD_BAR_HEIGHT), fill);
        if ratio > 0.0 {
            shapes::rect(
                out,
                Vec2::new(HUD_LEFT + filled - 2.0, y + 12.0),
                Vec2::new(2.0, HUD_BAR_HEIGHT),
                palette::WHITE,
            );
        }
        if overdrive {
            glyphs::draw_text(
                out,
                OVERDRIVE_CAPTION,
                Vec2::new(HUD_LEFT + HUD_BAR_WIDTH / 2.0, y + 17.0),
                OVERDRIVE_PIXEL,
                Align::Center,
                colors::HUD_TEXT,
            );
        }
    }
}
