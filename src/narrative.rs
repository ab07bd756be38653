//! Mission text shown on the overlays
//!
//! Keyed by level and final score so richer text can slot in later; the
//! current build returns fixed lines.

const BRIEFING: &str = "The Grid is under attack. Pilot your craft with precision.";
const GAME_OVER: &str = "MISSION FAILED. SYSTEM REBOOTING...";

pub fn mission_briefing(_level: u32) -> &'static str {
    BRIEFING
}

pub fn game_over_message(_score: u64) -> &'static str {
    GAME_OVER
}
