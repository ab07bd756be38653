//! Latest-value input cells
//!
//! The hand tracker, the sensitivity control and the host shell each write
//! into their own cell whenever they like. The frame driver reads every cell
//! once at the top of a frame and uses that snapshot for the whole tick, so a
//! write that lands mid-frame is only seen on the next one. Superseded samples
//! are simply overwritten; nothing is queued.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{SENSITIVITY_DEFAULT, SENSITIVITY_MAX, SENSITIVITY_MIN};

/// One hand-tracking sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandState {
    /// Normalized horizontal position (0 = left edge, 1 = right edge)
    pub x: f32,
    /// Closed fist (fire)
    pub is_fist: bool,
    /// Tracker currently sees a hand
    pub is_active: bool,
}

impl HandState {
    /// Sample reported when no hand is visible
    pub const fn inactive() -> Self {
        Self {
            x: 0.5,
            is_fist: false,
            is_active: false,
        }
    }

    pub const fn tracking(x: f32, is_fist: bool) -> Self {
        Self {
            x,
            is_fist,
            is_active: true,
        }
    }
}

impl Default for HandState {
    fn default() -> Self {
        Self::inactive()
    }
}

/// Hand sample synthesized from a mouse or touch pointer over the canvas.
/// Any held button counts as a closed fist.
pub fn pointer_hand(offset_x: f32, surface_width: f32, buttons: u16) -> HandState {
    if !surface_width.is_finite() || surface_width <= 0.0 || !offset_x.is_finite() {
        return HandState::inactive();
    }
    HandState::tracking((offset_x / surface_width).clamp(0.0, 1.0), buttons != 0)
}

/// Shared single-writer cell holding the most recent value
#[derive(Debug, Default)]
pub struct LatestValue<T: Copy> {
    cell: Rc<Cell<T>>,
}

impl<T: Copy> Clone for LatestValue<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Copy> LatestValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    #[inline]
    pub fn set(&self, value: T) {
        self.cell.set(value);
    }
}

/// Clamp a sensitivity value into the supported range. Non-finite values
/// fall back to the default.
pub fn clamp_sensitivity(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
    } else {
        SENSITIVITY_DEFAULT
    }
}

/// Everything the engine reads during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub hand: HandState,
    pub sensitivity: f32,
    pub paused: bool,
    /// Frame timestamp in milliseconds (drives weapon cool-downs)
    pub now_ms: f64,
}

impl InputSnapshot {
    /// Snapshot with a tracked hand and default sensitivity, handy for scripted runs
    pub fn with_hand(hand: HandState, now_ms: f64) -> Self {
        Self {
            hand,
            sensitivity: SENSITIVITY_DEFAULT,
            paused: false,
            now_ms,
        }
    }
}

/// The input cells the frame driver reads from
#[derive(Debug, Clone)]
pub struct Inputs {
    pub hand: LatestValue<HandState>,
    pub sensitivity: LatestValue<f32>,
    pub paused: LatestValue<bool>,
    /// Changing this value starts a new session on the next frame
    pub session_id: LatestValue<u64>,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            hand: LatestValue::new(HandState::inactive()),
            sensitivity: LatestValue::new(SENSITIVITY_DEFAULT),
            paused: LatestValue::new(false),
            session_id: LatestValue::new(0),
        }
    }
}

impl Inputs {
    /// Read every cell once
    pub fn snapshot(&self, now_ms: f64) -> InputSnapshot {
        InputSnapshot {
            hand: self.hand.get(),
            sensitivity: self.sensitivity.get(),
            paused: self.paused.get(),
            now_ms,
        }
    }
}
