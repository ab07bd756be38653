//! Audio system using Web Audio API
//!
//! Effects are short oscillator voices described by tone tables, so nothing
//! is loaded from disk.

use crate::sim::{GameEvent, SoundCue};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player cannon fired
    Shoot,
    /// Invader destroyed
    Explosion,
    /// Pickup collected
    PowerUp,
    /// Wave cleared
    LevelUp,
    GameOver,
}

impl From<SoundCue> for SoundEffect {
    fn from(cue: SoundCue) -> Self {
        match cue {
            SoundCue::Shoot => SoundEffect::Shoot,
            SoundCue::Explosion => SoundEffect::Explosion,
            SoundCue::PowerUp => SoundEffect::PowerUp,
        }
    }
}

impl SoundEffect {
    /// Stinger for a shell-level event, if it has one. A lost life has
    /// none: the hit already plays the engine's explosion cue.
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::LevelUp => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::ScoreDelta(_) | GameEvent::LifeLost | GameEvent::LifeGained => None,
        }
    }
}

/// Oscillator waveform, mirrored from Web Audio so the tables stay testable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator voice with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq: f32,
    /// Pitch at the end of the sweep; `None` holds `freq`
    pub sweep_to: Option<f32>,
    /// Peak gain before master volume
    pub gain: f32,
    /// Offset from the trigger time, seconds
    pub delay: f64,
    /// Decay length, seconds
    pub decay: f64,
}

impl Tone {
    const fn new(wave: Wave, freq: f32, gain: f32, decay: f64) -> Self {
        Self {
            wave,
            freq,
            sweep_to: None,
            gain,
            delay: 0.0,
            decay,
        }
    }

    const fn sweep(mut self, to: f32) -> Self {
        self.sweep_to = Some(to);
        self
    }

    const fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Oscillator stops a little after the envelope bottoms out
    pub fn stop_at(&self) -> f64 {
        self.delay + self.decay + 0.05
    }
}

const SHOOT: &[Tone] = &[Tone::new(Wave::Square, 880.0, 0.08, 0.08).sweep(220.0)];
const EXPLOSION: &[Tone] = &[
    Tone::new(Wave::Sawtooth, 100.0, 0.4, 0.35).sweep(30.0),
    Tone::new(Wave::Square, 1500.0, 0.15, 0.1),
];
const POWER_UP: &[Tone] = &[
    Tone::new(Wave::Sine, 600.0, 0.25, 0.15),
    Tone::new(Wave::Sine, 800.0, 0.25, 0.15).after(0.08),
    Tone::new(Wave::Sine, 1000.0, 0.25, 0.15).after(0.16),
];
const LEVEL_UP: &[Tone] = &[
    Tone::new(Wave::Triangle, 400.0, 0.3, 0.4),
    Tone::new(Wave::Triangle, 500.0, 0.3, 0.4).after(0.1),
    Tone::new(Wave::Triangle, 600.0, 0.3, 0.4).after(0.2),
    Tone::new(Wave::Triangle, 800.0, 0.3, 0.4).after(0.3),
];
const GAME_OVER: &[Tone] = &[
    Tone::new(Wave::Sine, 400.0, 0.3, 0.3),
    Tone::new(Wave::Sine, 350.0, 0.3, 0.3).after(0.2),
    Tone::new(Wave::Sine, 300.0, 0.3, 0.3).after(0.4),
    Tone::new(Wave::Sine, 200.0, 0.3, 0.3).after(0.6),
];

impl SoundEffect {
    /// Voices making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Shoot => SHOOT,
            SoundEffect::Explosion => EXPLOSION,
            SoundEffect::PowerUp => POWER_UP,
            SoundEffect::LevelUp => LEVEL_UP,
            SoundEffect::GameOver => GAME_OVER,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, OscillatorType};

    use super::{SoundEffect, Tone, Wave};

    /// Envelope floor; exponential ramps cannot reach zero
    const SILENCE: f32 = 0.01;

    impl From<Wave> for OscillatorType {
        fn from(wave: Wave) -> Self {
            match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Plays sound effects through a single AudioContext
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Browsers keep the context suspended until a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Effective output level; 0 silences everything
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            self.resume();

            let now = ctx.current_time();
            for tone in effect.tones() {
                if let Err(e) = schedule(ctx, tone, now, vol) {
                    log::debug!("Dropped {:?} voice: {:?}", effect, e);
                }
            }
        }
    }

    fn schedule(
        ctx: &AudioContext,
        tone: &Tone,
        now: f64,
        vol: f32,
    ) -> Result<(), wasm_bindgen::JsValue> {
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.set_type(tone.wave.into());
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let start = now + tone.delay;
        let end = start + tone.decay;

        osc.frequency().set_value_at_time(tone.freq, start)?;
        if let Some(target) = tone.sweep_to {
            osc.frequency()
                .exponential_ramp_to_value_at_time(target, end)?;
        }
        gain.gain().set_value_at_time(vol * tone.gain, start)?;
        gain.gain().exponential_ramp_to_value_at_time(SILENCE, end)?;

        osc.start_with_when(start)?;
        osc.stop_with_when(now + tone.stop_at())?;
        Ok(())
    }
}
