//! Invader formation layout and movement

use glam::Vec2;
use rand::Rng;

use super::state::{Invader, InvaderId, InvaderKind};
use crate::consts::PLAYFIELD_WIDTH;

/// Columns per wave
pub const FORMATION_COLS: u32 = 7;
/// Row count stops growing here
pub const MAX_FORMATION_ROWS: u32 = 5;
const SPACING_X: f32 = 105.0;
const SPACING_Y: f32 = 85.0;
const ORIGIN: Vec2 = Vec2::new(60.0, 90.0);

/// Formation turns around this close to either side wall
pub const SIDE_MARGIN: f32 = 15.0;
/// Vertical step taken on every direction change
pub const DROP_STEP: f32 = 18.0;

/// Rows in the formation for a level
pub fn rows_for_level(level: u32) -> u32 {
    (3 + level).min(MAX_FORMATION_ROWS)
}

/// Horizontal formation speed per tick
pub fn formation_speed(level: u32) -> f32 {
    0.4 + level as f32 * 0.1
}

/// Lay out a fresh formation for the given level
pub fn generate_formation(level: u32, rng: &mut impl Rng) -> Vec<Invader> {
    let rows = rows_for_level(level);
    let mut invaders = Vec::with_capacity((rows * FORMATION_COLS) as usize);

    for row in 0..rows {
        let kind = InvaderKind::for_row(row);
        for col in 0..FORMATION_COLS {
            invaders.push(Invader {
                id: InvaderId { level, row, col },
                pos: ORIGIN + Vec2::new(col as f32 * SPACING_X, row as f32 * SPACING_Y),
                size: kind.size(),
                color: kind.color(),
                kind,
                health: kind.health(),
                points: kind.points(),
                anim_phase: rng.random::<f32>() * 100.0,
            });
        }
    }

    invaders
}

/// Move the whole formation one tick. If any ship touches a side boundary the
/// formation reverses and drops on the same tick. Returns true on a reversal.
pub fn step_formation(invaders: &mut [Invader], dir: &mut f32, level: u32) -> bool {
    let speed = formation_speed(level);
    let mut reverse = false;

    for invader in invaders.iter_mut() {
        invader.pos.x += *dir * speed;
        if invader.pos.x > PLAYFIELD_WIDTH - invader.size.x - SIDE_MARGIN
            || invader.pos.x < SIDE_MARGIN
        {
            reverse = true;
        }
    }

    if reverse {
        *dir = -*dir;
        for invader in invaders.iter_mut() {
            invader.pos.y += DROP_STEP;
        }
    }

    reverse
}
