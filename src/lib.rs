//! Neon Vader - a hand-gesture controlled arcade shooter
//!
//! Core modules:
//! - `sim`: Per-frame simulation (movement, weapons, collisions, spawning, scoring)
//! - `renderer`: Pure scene building plus the WebGPU pipeline that presents it
//! - `driver`: Frame driver that owns the tick/render loop
//! - `input`: Latest-value cells fed by the hand tracker and UI
//! - `shell`: Reference host shell (score, lives, pause lifecycle)
//! - `audio`: Procedural Web Audio sound effects

pub mod audio;
pub mod driver;
pub mod error;
pub mod input;
pub mod narrative;
pub mod renderer;
pub mod settings;
pub mod shell;
pub mod sim;

pub use driver::{DriverState, FrameDriver, FrameScheduler};
pub use error::{AppError, RenderError};
pub use input::{HandState, InputSnapshot, Inputs, LatestValue};
pub use settings::{QualityPreset, Settings};
pub use shell::ShellState;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical units, origin top-left, +y down)
    pub const PLAYFIELD_WIDTH: f32 = 850.0;
    pub const PLAYFIELD_HEIGHT: f32 = 1000.0;

    /// Player ship
    pub const SHIP_HALF_WIDTH: f32 = 50.0;
    pub const PLAYER_START_X: f32 = PLAYFIELD_WIDTH / 2.0;
    /// Ship centre sits this far above the bottom edge
    pub const PLAYER_LINE_OFFSET: f32 = 100.0;
    /// Hand-x delta (0..1) is multiplied by sensitivity and this
    pub const MOVEMENT_SCALE: f32 = 3000.0;

    /// Sensitivity bounds (enforced by the producer, not the engine)
    pub const SENSITIVITY_MIN: f32 = 0.05;
    pub const SENSITIVITY_MAX: f32 = 2.4;
    pub const SENSITIVITY_DEFAULT: f32 = 0.35;
    pub const SENSITIVITY_STEP: f32 = 0.1;

    /// Projectiles are dropped once outside this vertical margin
    pub const PROJECTILE_CULL_MARGIN: f32 = 100.0;
    pub const PLAYER_SHOT_OFFSET: f32 = 110.0;

    /// Shield lasts this many ticks
    pub const SHIELD_DURATION_TICKS: u32 = 600;

    /// Decorative star-field
    pub const STAR_COUNT: usize = 100;

    /// Host shell lives
    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    /// Hand must be missing this long before the shell auto-pauses
    pub const SIGNAL_LOSS_PAUSE_MS: f64 = 1000.0;
}

/// Y coordinate of the player ship centre
#[inline]
pub fn player_line() -> f32 {
    consts::PLAYFIELD_HEIGHT - consts::PLAYER_LINE_OFFSET
}

/// Clamp a ship x position into the playfield. A non-finite position
/// recentres the ship.
#[inline]
pub fn clamp_player_x(x: f32) -> f32 {
    if !x.is_finite() {
        return consts::PLAYER_START_X;
    }
    x.clamp(
        consts::SHIP_HALF_WIDTH,
        consts::PLAYFIELD_WIDTH - consts::SHIP_HALF_WIDTH,
    )
}
