//! Host shell state
//!
//! Score, lives and level as the player sees them, plus the pause lifecycle.
//! The shell consumes engine events and writes the pause flag, sensitivity and
//! session id back into the driver's input cells.

use crate::consts::{MAX_LIVES, SENSITIVITY_DEFAULT, SENSITIVITY_STEP, SIGNAL_LOSS_PAUSE_MS, START_LIVES};
use crate::driver::EventSink;
use crate::input::{Inputs, clamp_sensitivity};
use crate::narrative;
use crate::sim::GameEvent;

/// Which full-screen overlay the page should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Before the first game
    Title,
    Paused,
    /// Auto-paused after losing the hand
    SignalLost,
    GameOver,
    None,
}

/// Key presses the shell reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKey {
    Escape,
    ArrowUp,
    ArrowDown,
}

impl ShellKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(ShellKey::Escape),
            "ArrowUp" => Some(ShellKey::ArrowUp),
            "ArrowDown" => Some(ShellKey::ArrowDown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellState {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub has_started: bool,
    pub game_over: bool,
    /// Set by the player (Escape / pause button)
    pub paused: bool,
    /// Set when the hand has been missing too long
    pub auto_paused: bool,
    pub sensitivity: f32,
    pub session_id: u64,
    pub briefing: &'static str,
    pub game_over_message: Option<&'static str>,
    hand_lost_since: Option<f64>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            level: 1,
            has_started: false,
            game_over: false,
            paused: true,
            auto_paused: false,
            sensitivity: SENSITIVITY_DEFAULT,
            session_id: 0,
            briefing: narrative::mission_briefing(1),
            game_over_message: None,
            hand_lost_since: None,
        }
    }
}

impl ShellState {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity: clamp_sensitivity(sensitivity),
            ..Self::default()
        }
    }

    /// Begin a new game, replacing any previous session
    pub fn start_game(&mut self) {
        self.session_id += 1;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.game_over = false;
        self.paused = false;
        self.auto_paused = false;
        self.has_started = true;
        self.game_over_message = None;
        self.hand_lost_since = None;
        self.briefing = narrative::mission_briefing(self.level);
        log::info!("Game started (session {})", self.session_id);
    }

    /// Fold one engine event into the visible counters
    pub fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreDelta(points) => self.score += points as u64,
            GameEvent::LevelUp => {
                self.level += 1;
                self.briefing = narrative::mission_briefing(self.level);
                log::info!("Sector {} reached", self.level);
            }
            GameEvent::LifeLost => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 && self.has_started && !self.paused {
                    self.end_game(self.score);
                }
            }
            GameEvent::LifeGained => self.lives = (self.lives + 1).min(MAX_LIVES),
            GameEvent::GameOver { score } => self.end_game(score),
        }
    }

    fn end_game(&mut self, score: u64) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.paused = true;
        self.game_over_message = Some(narrative::game_over_message(score));
        log::info!("Game over, final score {}", score);
    }

    /// Manual pause toggle; ignored before start and after game over
    pub fn toggle_pause(&mut self) {
        if !self.has_started || self.game_over {
            return;
        }
        self.paused = !self.paused;
    }

    pub fn adjust_sensitivity(&mut self, delta: f32) {
        self.sensitivity = clamp_sensitivity(self.sensitivity + delta);
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.sensitivity = clamp_sensitivity(value);
    }

    pub fn handle_key(&mut self, key: ShellKey) {
        match key {
            ShellKey::Escape => self.toggle_pause(),
            ShellKey::ArrowUp => self.adjust_sensitivity(SENSITIVITY_STEP),
            ShellKey::ArrowDown => self.adjust_sensitivity(-SENSITIVITY_STEP),
        }
    }

    /// Track hand presence for auto-pause. Call with every tracker sample
    /// (or at least once per frame).
    pub fn observe_hand(&mut self, active: bool, now_ms: f64) {
        if active {
            self.hand_lost_since = None;
            self.auto_paused = false;
            return;
        }
        if !self.has_started || self.game_over {
            return;
        }
        match self.hand_lost_since {
            None => self.hand_lost_since = Some(now_ms),
            Some(since) if now_ms - since >= SIGNAL_LOSS_PAUSE_MS => {
                if !self.auto_paused {
                    log::info!("Hand signal lost, auto-pausing");
                }
                self.auto_paused = true;
            }
            Some(_) => {}
        }
    }

    /// What the engine's pause cell should hold
    pub fn effective_pause(&self) -> bool {
        self.paused || self.auto_paused
    }

    pub fn overlay(&self) -> Overlay {
        if self.game_over {
            Overlay::GameOver
        } else if self.paused {
            if self.has_started {
                Overlay::Paused
            } else {
                Overlay::Title
            }
        } else if self.auto_paused {
            Overlay::SignalLost
        } else {
            Overlay::None
        }
    }

    /// Push pause, sensitivity and session id into the driver's input cells
    pub fn sync(&self, inputs: &Inputs) {
        inputs.paused.set(self.effective_pause());
        inputs.sensitivity.set(self.sensitivity);
        inputs.session_id.set(self.session_id);
    }
}

impl EventSink for ShellState {
    fn on_event(&mut self, event: GameEvent) {
        self.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SENSITIVITY_MAX, SENSITIVITY_MIN};
    use proptest::prelude::*;

    fn started() -> ShellState {
        let mut shell = ShellState::default();
        shell.start_game();
        shell
    }

    #[test]
    fn test_initial_state_is_paused_title() {
        let shell = ShellState::default();
        assert!(shell.effective_pause());
        assert_eq!(shell.overlay(), Overlay::Title);
        assert_eq!(shell.lives, 3);
    }

    #[test]
    fn test_start_game_bumps_session_and_resets() {
        let mut shell = started();
        shell.apply(GameEvent::ScoreDelta(250));
        shell.apply(GameEvent::LevelUp);
        shell.apply(GameEvent::LifeLost);
        let id = shell.session_id;

        shell.start_game();
        assert_eq!(shell.session_id, id + 1);
        assert_eq!(shell.score, 0);
        assert_eq!(shell.level, 1);
        assert_eq!(shell.lives, 3);
        assert!(!shell.effective_pause());
    }

    #[test]
    fn test_lives_clamped() {
        let mut shell = started();
        for _ in 0..10 {
            shell.apply(GameEvent::LifeGained);
        }
        assert_eq!(shell.lives, MAX_LIVES);
    }

    #[test]
    fn test_last_life_ends_game_once() {
        let mut shell = started();
        shell.apply(GameEvent::ScoreDelta(40));
        for _ in 0..3 {
            shell.apply(GameEvent::LifeLost);
        }
        assert!(shell.game_over);
        assert!(shell.paused);
        assert_eq!(shell.lives, 0);
        assert_eq!(shell.overlay(), Overlay::GameOver);
        assert_eq!(shell.game_over_message, Some(narrative::game_over_message(40)));

        shell.apply(GameEvent::LifeLost);
        shell.apply(GameEvent::GameOver { score: 40 });
        assert_eq!(shell.lives, 0);
        assert!(shell.game_over);
    }

    #[test]
    fn test_game_over_event_ends_game() {
        let mut shell = started();
        shell.on_event(GameEvent::GameOver { score: 1234 });
        assert!(shell.game_over);
        assert!(shell.effective_pause());
    }

    #[test]
    fn test_toggle_pause_rules() {
        let mut shell = ShellState::default();
        shell.toggle_pause();
        assert!(shell.paused, "ignored before start");

        shell.start_game();
        shell.handle_key(ShellKey::Escape);
        assert!(shell.paused);
        assert_eq!(shell.overlay(), Overlay::Paused);
        shell.handle_key(ShellKey::Escape);
        assert!(!shell.paused);

        shell.apply(GameEvent::GameOver { score: 0 });
        shell.toggle_pause();
        assert!(shell.paused, "ignored after game over");
    }

    #[test]
    fn test_arrow_keys_step_sensitivity() {
        let mut shell = started();
        shell.handle_key(ShellKey::ArrowUp);
        assert!((shell.sensitivity - 0.45).abs() < 1e-6);
        for _ in 0..50 {
            shell.handle_key(ShellKey::ArrowDown);
        }
        assert_eq!(shell.sensitivity, SENSITIVITY_MIN);
        for _ in 0..50 {
            shell.handle_key(ShellKey::ArrowUp);
        }
        assert_eq!(shell.sensitivity, SENSITIVITY_MAX);
    }

    #[test]
    fn test_nan_sensitivity_is_rejected() {
        let mut shell = started();
        shell.set_sensitivity(1.2);
        shell.set_sensitivity(f32::NAN);
        assert_eq!(shell.sensitivity, SENSITIVITY_DEFAULT);

        let inputs = Inputs::default();
        shell.sync(&inputs);
        assert!(inputs.sensitivity.get().is_finite());
        assert!(ShellState::new(f32::INFINITY).sensitivity.is_finite());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(ShellKey::from_key("Escape"), Some(ShellKey::Escape));
        assert_eq!(ShellKey::from_key("ArrowDown"), Some(ShellKey::ArrowDown));
        assert_eq!(ShellKey::from_key("a"), None);
    }

    #[test]
    fn test_auto_pause_after_signal_loss() {
        let mut shell = started();
        shell.observe_hand(true, 0.0);
        shell.observe_hand(false, 100.0);
        shell.observe_hand(false, 900.0);
        assert!(!shell.auto_paused);
        shell.observe_hand(false, 1100.0);
        assert!(shell.auto_paused);
        assert!(shell.effective_pause());
        assert_eq!(shell.overlay(), Overlay::SignalLost);

        shell.observe_hand(true, 1200.0);
        assert!(!shell.auto_paused);
        assert!(!shell.effective_pause());
    }

    #[test]
    fn test_brief_dropout_does_not_pause() {
        let mut shell = started();
        shell.observe_hand(false, 0.0);
        shell.observe_hand(true, 500.0);
        shell.observe_hand(false, 600.0);
        shell.observe_hand(false, 1500.0);
        assert!(!shell.auto_paused);
    }

    #[test]
    fn test_no_auto_pause_before_start() {
        let mut shell = ShellState::default();
        shell.observe_hand(false, 0.0);
        shell.observe_hand(false, 5000.0);
        assert!(!shell.auto_paused);
    }

    #[test]
    fn test_sync_writes_cells() {
        let inputs = Inputs::default();
        let mut shell = started();
        shell.set_sensitivity(1.0);
        shell.sync(&inputs);
        assert!(!inputs.paused.get());
        assert_eq!(inputs.sensitivity.get(), 1.0);
        assert_eq!(inputs.session_id.get(), 1);

        shell.toggle_pause();
        shell.sync(&inputs);
        assert!(inputs.paused.get());
    }

    proptest! {
        #[test]
        fn prop_sensitivity_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..80)) {
            let mut shell = started();
            for up in steps {
                shell.handle_key(if up { ShellKey::ArrowUp } else { ShellKey::ArrowDown });
                prop_assert!(shell.sensitivity >= SENSITIVITY_MIN);
                prop_assert!(shell.sensitivity <= SENSITIVITY_MAX);
            }
        }

        #[test]
        fn prop_lives_never_exceed_cap(gains in 0usize..20, losses in 0usize..20) {
            let mut shell = started();
            for _ in 0..gains {
                shell.apply(GameEvent::LifeGained);
            }
            for _ in 0..losses {
                shell.apply(GameEvent::LifeLost);
            }
            prop_assert!(shell.lives <= MAX_LIVES);
            prop_assert_eq!(shell.game_over, shell.lives == 0);
        }
    }
}
