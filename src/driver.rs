//! Frame driver
//!
//! Owns the session and runs one simulation tick plus one render per
//! display-synchronized callback. The pause flag is read fresh on every
//! callback: while it is set the driver only reschedules itself, so the
//! displayed frame freezes but the loop stays alive.

use crate::input::Inputs;
use crate::renderer::{RenderTarget, SceneOptions, build_scene_with};
use crate::sim::{GameEvent, SessionState, SoundCue, tick};

/// Opaque id returned by a scheduler for one pending callback
pub type FrameHandle = i32;

/// Source of display-synchronized callbacks
pub trait FrameScheduler {
    /// Ask for exactly one future callback
    fn request(&mut self) -> FrameHandle;
    /// Withdraw a pending callback; unknown handles are ignored
    fn cancel(&mut self, handle: FrameHandle);
}

/// Receives everything a tick reports outward
pub trait EventSink {
    fn on_event(&mut self, event: GameEvent);
    fn on_sound(&mut self, _cue: SoundCue) {}
}

/// Sink that drops everything
impl EventSink for () {
    fn on_event(&mut self, _event: GameEvent) {}
}

impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        self.push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Created, not started
    Idle,
    Running,
    Paused,
    /// Page hidden into the back/forward cache; no callback pending
    Suspended,
    /// Terminal
    Disposed,
}

/// Seed for a session, mixed from the driver seed and the session id
pub fn session_seed(base: u64, session_id: u64) -> u64 {
    base ^ session_id.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub struct FrameDriver<S: FrameScheduler> {
    session: SessionState,
    inputs: Inputs,
    scheduler: S,
    pending: Option<FrameHandle>,
    state: DriverState,
    base_seed: u64,
    session_id: u64,
    scene_options: SceneOptions,
}

impl<S: FrameScheduler> FrameDriver<S> {
    pub fn new(base_seed: u64, inputs: Inputs, scheduler: S) -> Self {
        let session_id = inputs.session_id.get();
        Self {
            session: SessionState::new(session_seed(base_seed, session_id)),
            inputs,
            scheduler,
            pending: None,
            state: DriverState::Idle,
            base_seed,
            session_id,
            scene_options: SceneOptions::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Handle of the callback currently waiting to fire
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn set_scene_options(&mut self, options: SceneOptions) {
        self.scene_options = options;
    }

    /// First activation: seed the level-1 formation and request a frame
    pub fn start(&mut self) {
        match self.state {
            DriverState::Idle => {
                self.session.ensure_formation();
                self.state = DriverState::Running;
                self.schedule();
                log::info!(
                    "Frame driver started (session {}, seed {})",
                    self.session_id,
                    self.session.seed
                );
            }
            DriverState::Disposed => log::warn!("start() called on a disposed frame driver"),
            DriverState::Running | DriverState::Paused | DriverState::Suspended => {}
        }
    }

    /// Withdraw the pending callback but keep the session for a later `resume`
    pub fn suspend(&mut self) {
        if !matches!(self.state, DriverState::Running | DriverState::Paused) {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.state = DriverState::Suspended;
        log::info!("Frame driver suspended at frame {}", self.session.frame_count);
    }

    /// Pick the loop back up after `suspend`
    pub fn resume(&mut self) {
        if self.state != DriverState::Suspended {
            return;
        }
        self.state = DriverState::Running;
        self.schedule();
        log::info!("Frame driver resumed at frame {}", self.session.frame_count);
    }

    /// One scheduled callback
    pub fn on_frame<T, E>(&mut self, now_ms: f64, target: &mut T, sink: &mut E)
    where
        T: RenderTarget + ?Sized,
        E: EventSink + ?Sized,
    {
        self.pending = None;
        if matches!(
            self.state,
            DriverState::Disposed | DriverState::Idle | DriverState::Suspended
        ) {
            return;
        }

        let session_id = self.inputs.session_id.get();
        if session_id != self.session_id {
            self.reset_session(session_id);
        }

        let input = self.inputs.snapshot(now_ms);
        if input.paused {
            if self.state != DriverState::Paused {
                log::debug!("Paused at frame {}", self.session.frame_count);
            }
            self.state = DriverState::Paused;
            self.schedule();
            return;
        }
        self.state = DriverState::Running;

        let output = tick(&mut self.session, &input);
        for event in output.events {
            sink.on_event(event);
        }
        for cue in output.sounds {
            sink.on_sound(cue);
        }

        let scene = build_scene_with(&self.session, &self.scene_options);
        if let Err(e) = target.present(&scene) {
            log::warn!("Render error: {e}");
        }

        self.schedule();
    }

    /// Cancel the pending callback and stop for good. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.state == DriverState::Disposed {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.state = DriverState::Disposed;
        log::info!("Frame driver disposed at frame {}", self.session.frame_count);
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request());
        }
    }

    fn reset_session(&mut self, session_id: u64) {
        self.session_id = session_id;
        self.session = SessionState::new(session_seed(self.base_seed, session_id));
        self.session.ensure_formation();
        log::info!("New session {} (seed {})", session_id, self.session.seed);
    }
}

/// Scheduler that queues handles for the caller to fire by hand.
/// Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: FrameHandle,
    queued: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles requested and not yet fired or cancelled
    pub fn queued(&self) -> &[FrameHandle] {
        &self.queued
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Pop the oldest queued handle, as if the display fired it
    pub fn fire_next(&mut self) -> Option<FrameHandle> {
        if self.queued.is_empty() {
            None
        } else {
            Some(self.queued.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> FrameHandle {
        self.next += 1;
        self.queued.push(self.next);
        self.next
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Some(i) = self.queued.iter().position(|&h| h == handle) {
            self.queued.remove(i);
            self.cancelled.push(handle);
        }
    }
}
