//! Hit tests
//!
//! Everything here is axis-aligned. Player shots test their anchor point
//! against an invader's box; enemy shots and pickups test fixed zones around
//! the ship.

use glam::Vec2;

use super::state::{Invader, PowerUp, Projectile};
use crate::consts::PLAYFIELD_HEIGHT;

/// Horizontal half-width of the zone where enemy shots hurt the player
pub const PLAYER_HIT_HALF_WIDTH: f32 = 40.0;
/// Enemy shots hurt between these distances above the bottom edge
pub const PLAYER_HIT_TOP: f32 = 120.0;
pub const PLAYER_HIT_BOTTOM: f32 = 50.0;

/// Pickups are collected within this horizontal distance of the ship
pub const COLLECT_HALF_WIDTH: f32 = 50.0;
/// ...once they fall below this distance from the bottom edge
pub const COLLECT_BAND: f32 = 140.0;

/// Strict point-in-box test (edges do not count)
#[inline]
pub fn point_in_box(point: Vec2, min: Vec2, size: Vec2) -> bool {
    let max = min + size;
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

/// Player shot overlaps an invader
#[inline]
pub fn projectile_hits_invader(projectile: &Projectile, invader: &Invader) -> bool {
    point_in_box(projectile.pos, invader.pos, invader.size)
}

/// Enemy shot is inside the player's hit zone
#[inline]
pub fn projectile_hits_player(projectile: &Projectile, player_x: f32) -> bool {
    (projectile.pos.x - player_x).abs() < PLAYER_HIT_HALF_WIDTH
        && projectile.pos.y > PLAYFIELD_HEIGHT - PLAYER_HIT_TOP
        && projectile.pos.y < PLAYFIELD_HEIGHT - PLAYER_HIT_BOTTOM
}

/// Pickup is close enough to be collected
#[inline]
pub fn power_up_collected(power_up: &PowerUp, player_x: f32) -> bool {
    (power_up.pos.x - player_x).abs() < COLLECT_HALF_WIDTH
        && power_up.pos.y > PLAYFIELD_HEIGHT - COLLECT_BAND
}
