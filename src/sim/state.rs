//! Session state and entity types
//!
//! One `SessionState` exists per play-through. The simulation owns it
//! exclusively; the renderer only ever borrows it immutably.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::weapon::{WeaponKind, WeaponMode};
use crate::consts::*;

/// RGBA color, components in 0..1
pub type Color = [f32; 4];

/// Named neon colors shared by the simulation and the renderer
pub mod palette {
    use super::Color;

    pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
    pub const MAGENTA: Color = [1.0, 0.0, 1.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
    pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
    pub const SKY: Color = [0.0, 0.8, 1.0, 1.0];
    pub const HOT_PINK: Color = [1.0, 0.0, 0.33, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
}

/// Enemy ship class, determined by formation row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvaderKind {
    Basic,
    Scout,
    Heavy,
    Commander,
}

impl InvaderKind {
    /// Row 0 is the front line and the toughest
    pub fn for_row(row: u32) -> Self {
        match row {
            0 => InvaderKind::Commander,
            1 => InvaderKind::Heavy,
            2 => InvaderKind::Scout,
            _ => InvaderKind::Basic,
        }
    }

    pub fn health(&self) -> u32 {
        match self {
            InvaderKind::Commander => 4,
            InvaderKind::Heavy => 2,
            InvaderKind::Scout | InvaderKind::Basic => 1,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            InvaderKind::Commander => 250,
            InvaderKind::Heavy => 75,
            InvaderKind::Scout => 40,
            InvaderKind::Basic => 25,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            InvaderKind::Commander => Vec2::new(90.0, 65.0),
            InvaderKind::Heavy => Vec2::new(80.0, 55.0),
            InvaderKind::Scout => Vec2::new(65.0, 50.0),
            InvaderKind::Basic => Vec2::new(60.0, 50.0),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            InvaderKind::Commander => palette::HOT_PINK,
            InvaderKind::Heavy => palette::YELLOW,
            InvaderKind::Scout => palette::SKY,
            InvaderKind::Basic => palette::GREEN,
        }
    }
}

/// Identifier unique within a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvaderId {
    pub level: u32,
    pub row: u32,
    pub col: u32,
}

impl fmt::Display for InvaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.level, self.row, self.col)
    }
}

/// An enemy ship
#[derive(Debug, Clone)]
pub struct Invader {
    pub id: InvaderId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub kind: InvaderKind,
    /// Remaining hits; the invader is removed the moment this reaches 0
    pub health: u32,
    pub points: u32,
    /// Decorative animation phase
    pub anim_phase: f32,
}

impl Invader {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Standard,
    Beam,
    /// Not consumed when it hits an invader
    Plasma,
    /// Enemy shot
    Shard,
}

impl ProjectileKind {
    pub fn pierces(&self) -> bool {
        matches!(self, ProjectileKind::Plasma)
    }
}

/// A shot in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Anchor point: horizontal centre, top edge
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical speed per tick (negative = upward)
    pub velocity: f32,
    /// Horizontal speed per tick
    pub spread: f32,
    pub color: Color,
    pub owner: Owner,
    pub kind: ProjectileKind,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Health,
    Spread,
    Rapid,
    Beam,
    Plasma,
    Shield,
    Nuke,
}

impl PowerUpKind {
    /// Drop pool, rolled uniformly
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::Health,
        PowerUpKind::Spread,
        PowerUpKind::Beam,
        PowerUpKind::Plasma,
        PowerUpKind::Rapid,
        PowerUpKind::Shield,
        PowerUpKind::Nuke,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "HP",
            PowerUpKind::Spread => "SPRD",
            PowerUpKind::Rapid => "RAPD",
            PowerUpKind::Beam => "BEAM",
            PowerUpKind::Plasma => "PLSM",
            PowerUpKind::Shield => "SHLD",
            PowerUpKind::Nuke => "NUKE",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Health => palette::GREEN,
            PowerUpKind::Spread | PowerUpKind::Rapid => palette::CYAN,
            PowerUpKind::Beam => palette::MAGENTA,
            PowerUpKind::Plasma | PowerUpKind::Shield => palette::YELLOW,
            PowerUpKind::Nuke => palette::WHITE,
        }
    }

    /// The weapon this pickup grants, if any
    pub fn weapon(&self) -> Option<WeaponKind> {
        match self {
            PowerUpKind::Spread => Some(WeaponKind::Spread),
            PowerUpKind::Rapid => Some(WeaponKind::Rapid),
            PowerUpKind::Beam => Some(WeaponKind::Beam),
            PowerUpKind::Plasma => Some(WeaponKind::Plasma),
            PowerUpKind::Nuke => Some(WeaponKind::Nuke),
            PowerUpKind::Health | PowerUpKind::Shield => None,
        }
    }
}

pub const POWER_UP_SIZE: f32 = 45.0;
pub const POWER_UP_FALL_SPEED: f32 = 2.5;

/// A falling pickup
#[derive(Debug, Clone)]
pub struct PowerUp {
    /// Centre x, top y
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub kind: PowerUpKind,
    pub velocity: f32,
    pub label: &'static str,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(POWER_UP_SIZE),
            color: kind.color(),
            kind,
            velocity: POWER_UP_FALL_SPEED,
            label: kind.label(),
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 1 → 0
    pub color: Color,
    pub size: f32,
}

/// Decorative background star
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Shield countdown; the shield is up exactly while ticks remain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shield {
    timer: u32,
}

impl Shield {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer > 0
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Fraction of the full duration remaining
    pub fn ratio(&self) -> f32 {
        self.timer as f32 / SHIELD_DURATION_TICKS as f32
    }

    /// Raise (or refresh) the shield
    pub fn activate(&mut self) {
        self.timer = SHIELD_DURATION_TICKS;
    }

    /// Absorb a hit: the shield drops immediately
    pub fn consume(&mut self) {
        self.timer = 0;
    }

    /// Advance one tick
    pub fn decay(&mut self) {
        self.timer = self.timer.saturating_sub(1);
    }
}

/// Events reported to the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Points from one kill
    ScoreDelta(u32),
    LevelUp,
    LifeLost,
    LifeGained,
    /// Terminal; emitted at most once per session
    GameOver { score: u64 },
}

/// Audio cues raised during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Shoot,
    Explosion,
    PowerUp,
}

/// Complete per-session simulation state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub seed: u64,
    pub rng: Pcg32,
    /// Ship centre x
    pub player_x: f32,
    /// Hand x observed on the last tracked tick
    pub prev_hand_x: f32,
    pub level: u32,
    /// Local mirror of the shell's score
    pub score: u64,
    pub invaders: Vec<Invader>,
    /// Formation horizontal direction (+1 right, -1 left)
    pub invader_dir: f32,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub frame_count: u64,
    pub weapon: WeaponMode,
    pub shield: Shield,
    pub stars: Vec<Star>,
    /// Timestamp of the last player shot (ms)
    pub last_shot_ms: Option<f64>,
    /// Set once the game-over event has been emitted
    pub game_over: bool,
}

impl SessionState {
    /// Create a new session with the given seed. The formation is left empty;
    /// the frame driver seeds level 1 when it first activates.
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * PLAYFIELD_WIDTH,
                    rng.random::<f32>() * PLAYFIELD_HEIGHT,
                ),
                size: rng.random::<f32>() * 2.0 + 0.5,
                speed: rng.random::<f32>() * 2.0 + 0.5,
            })
            .collect();

        Self {
            seed,
            rng,
            player_x: PLAYER_START_X,
            prev_hand_x: 0.5,
            level: 1,
            score: 0,
            invaders: Vec::new(),
            invader_dir: 1.0,
            projectiles: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            frame_count: 0,
            weapon: WeaponMode::Standard,
            shield: Shield::default(),
            stars,
            last_shot_ms: None,
            game_over: false,
        }
    }

    /// Populate the formation for the current level if it is empty
    pub fn ensure_formation(&mut self) {
        if self.invaders.is_empty() {
            self.invaders = super::formation::generate_formation(self.level, &mut self.rng);
        }
    }
}
