//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per rendered frame
//! - Seeded RNG only
//! - Stable iteration order (list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod formation;
pub mod state;
pub mod tick;
pub mod weapon;

pub use formation::{generate_formation, step_formation};
pub use state::{
    Color, GameEvent, Invader, InvaderId, InvaderKind, Owner, Particle, PowerUp, PowerUpKind,
    Projectile, ProjectileKind, SessionState, Shield, SoundCue, Star, palette,
};
pub use tick::{TickOutput, tick};
pub use weapon::{WeaponKind, WeaponMode};
