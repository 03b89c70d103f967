//! Sound and haptic cues
//!
//! Procedurally generated tones - no external files needed. The simulation
//! only emits [`GameEvent`]s; a [`SoundSink`] turns them into cues. Sinks
//! must never fail or block: a missing audio backend just means silence.

use crate::sim::GameEvent;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator blip with an exponential fade-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub freq: f32,
    /// Seconds
    pub duration: f64,
    pub wave: Waveform,
    /// Peak gain before master volume
    pub volume: f32,
    /// Seconds after the cue starts
    pub delay: f64,
}

impl Tone {
    const fn new(freq: f32, duration: f64, wave: Waveform, volume: f32, delay: f64) -> Self {
        Self {
            freq,
            duration,
            wave,
            volume,
            delay,
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    WeakJump,
    SuperJump,
    Break,
    GameOver,
    Milestone,
    /// Pitch rises with the combo level
    Combo(u32),
}

impl SoundEffect {
    /// Cue for a simulation event (some events are silent)
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(Self::Jump),
            GameEvent::WeakJump => Some(Self::WeakJump),
            GameEvent::SuperJump => Some(Self::SuperJump),
            GameEvent::Break => Some(Self::Break),
            GameEvent::Combo(level) => Some(Self::Combo(*level)),
            GameEvent::Milestone(_) => Some(Self::Milestone),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            GameEvent::NewBest(_) => None,
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;
        match *self {
            SoundEffect::Jump => vec![
                Tone::new(440.0, 0.08, Sine, 0.07, 0.0),
                Tone::new(660.0, 0.06, Sine, 0.05, 0.0),
            ],
            SoundEffect::WeakJump => vec![Tone::new(300.0, 0.06, Sine, 0.05, 0.0)],
            SoundEffect::SuperJump => vec![
                Tone::new(500.0, 0.06, Sine, 0.09, 0.0),
                Tone::new(700.0, 0.06, Sine, 0.09, 0.04),
                Tone::new(900.0, 0.08, Sine, 0.11, 0.08),
            ],
            SoundEffect::Break => vec![
                Tone::new(200.0, 0.12, Square, 0.05, 0.0),
                Tone::new(150.0, 0.15, Square, 0.04, 0.0),
            ],
            SoundEffect::GameOver => vec![
                Tone::new(400.0, 0.3, Sawtooth, 0.07, 0.0),
                Tone::new(300.0, 0.3, Sawtooth, 0.07, 0.15),
                Tone::new(180.0, 0.5, Sawtooth, 0.09, 0.3),
            ],
            SoundEffect::Milestone => [600.0, 750.0, 900.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::new(f, 0.1, Sine, 0.09, i as f64 * 0.06))
                .collect(),
            SoundEffect::Combo(level) => {
                let base = 500.0 + level.min(8) as f32 * 80.0;
                vec![
                    Tone::new(base, 0.06, Sine, 0.06, 0.0),
                    Tone::new(base + 200.0, 0.05, Sine, 0.05, 0.03),
                ]
            }
        }
    }

    /// Vibration pattern in ms (on, off, on, ...)
    pub fn vibration(&self) -> &'static [u32] {
        match self {
            SoundEffect::Jump => &[4],
            SoundEffect::WeakJump => &[3],
            SoundEffect::SuperJump => &[10],
            SoundEffect::Break => &[8, 20, 8],
            SoundEffect::GameOver => &[30, 50, 30, 50, 60],
            SoundEffect::Milestone => &[10, 15, 10],
            SoundEffect::Combo(_) => &[6],
        }
    }
}

/// Consumer of simulation events for sound/haptics. Fire-and-forget.
pub trait SoundSink {
    fn play(&mut self, event: &GameEvent);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&mut self, _event: &GameEvent) {}
}

/// Logs cues at debug level (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSound;

impl SoundSink for LogSound {
    fn play(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            log::debug!("cue {effect:?}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{SoundEffect, SoundSink, Tone, Waveform};
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Web Audio + vibration backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
    }

    impl AudioManager {
        pub fn new(settings: Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, settings }
        }

        pub fn set_settings(&mut self, settings: Settings) {
            self.settings = settings;
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, master: f32) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(match tone.wave {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            osc.frequency().set_value(tone.freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time() + tone.delay;
            gain.gain().set_value_at_time(tone.volume * master, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + tone.duration)
                .ok()?;
            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + tone.duration).ok()?;
            Some(())
        }

        fn vibrate(&self, pattern: &[u32]) {
            let Some(window) = web_sys::window() else { return };
            let navigator = window.navigator();
            match pattern {
                [ms] => {
                    navigator.vibrate_with_duration(*ms);
                }
                _ => {
                    let array = js_sys::Array::new();
                    for &ms in pattern {
                        array.push(&wasm_bindgen::JsValue::from(ms));
                    }
                    navigator.vibrate_with_pattern(&array);
                }
            }
        }
    }

    impl SoundSink for AudioManager {
        fn play(&mut self, event: &GameEvent) {
            let Some(effect) = SoundEffect::for_event(event) else { return };

            if self.settings.haptics {
                self.vibrate(effect.vibration());
            }

            let master = self.settings.effective_volume();
            if master <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for tone in effect.tones() {
                // Backend errors are swallowed
                let _ = self.play_tone(ctx, &tone, master);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_events() {
        assert_eq!(SoundEffect::for_event(&GameEvent::NewBest(3)), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::Milestone(500)), Some(SoundEffect::Milestone));
    }

    #[test]
    fn combo_pitch_rises_then_caps() {
        let low = SoundEffect::Combo(3).tones()[0].freq;
        let high = SoundEffect::Combo(8).tones()[0].freq;
        let capped = SoundEffect::Combo(20).tones()[0].freq;
        assert!(high > low);
        assert_eq!(high, capped);
        assert_eq!(high, 1140.0);
    }

    #[test]
    fn every_cue_has_tones_and_vibration() {
        let all = [
            SoundEffect::Jump,
            SoundEffect::WeakJump,
            SoundEffect::SuperJump,
            SoundEffect::Break,
            SoundEffect::GameOver,
            SoundEffect::Milestone,
            SoundEffect::Combo(4),
        ];
        for effect in all {
            assert!(!effect.tones().is_empty(), "{effect:?}");
            assert!(!effect.vibration().is_empty(), "{effect:?}");
            for tone in effect.tones() {
                assert!(tone.duration > 0.0 && tone.volume > 0.0);
            }
        }
    }
}
