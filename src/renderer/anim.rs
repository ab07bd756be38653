//! Frame-counter driven animation
//!
//! Everything here is a pure function of the frame counter the simulation
//! already advanced, so a frame never shows a phase the tick did not reach.

/// Thruster flame length
pub fn thruster_flicker(frame: u64) -> f32 {
    12.0 + (frame as f32 * 0.4).sin() * 8.0
}

/// Wing wobble for an invader centred at `x`
pub fn invader_wobble(frame: u64, x: f32) -> f32 {
    (frame as f32 * 0.12 + x).sin() * 6.0
}

/// Pickup rotation in radians
pub fn power_up_rotation(frame: u64) -> f32 {
    frame as f32 * 0.04
}

/// Overdrive bar dims on the first half of every ten-frame cycle
pub fn overdrive_blink(frame: u64) -> bool {
    frame % 10 < 5
}
