//! Fixed-step host: one engine tick per displayed frame
//!
//! Owns the latest pointer state, forwards events to the sound sink and
//! writes the best score when a run beats it.

use crate::audio::SoundSink;
use crate::persistence::BestScoreStore;
use crate::sim::{Engine, GameEvent, GamePhase, Snapshot, TickInput};
use crate::tuning::Tuning;

pub struct Session<S: SoundSink, B: BestScoreStore> {
    engine: Engine,
    input: TickInput,
    sound: S,
    store: B,
}

impl<S: SoundSink, B: BestScoreStore> Session<S, B> {
    /// Reads the stored best score and opens on the title screen
    pub fn new(tuning: Tuning, seed: u64, sound: S, store: B) -> Self {
        let best = store.load();
        Self {
            engine: Engine::new(tuning, seed, best),
            input: TickInput::default(),
            sound,
            store,
        }
    }

    /// Tap/press. Starts a run from Title or GameOver, otherwise steers.
    pub fn pointer_down(&mut self, x: f64) {
        match self.engine.phase() {
            GamePhase::Title | GamePhase::GameOver => {
                self.input.target_x = None;
                self.engine.reset();
            }
            GamePhase::Playing => self.input.target_x = Some(x),
        }
    }

    /// Drag; ignored outside of play
    pub fn pointer_move(&mut self, x: f64) {
        if self.engine.phase() == GamePhase::Playing {
            self.input.target_x = Some(x);
        }
    }

    pub fn pointer_up(&mut self) {
        self.input.target_x = None;
    }

    /// Run one tick and dispatch its events
    pub fn frame(&mut self) -> Snapshot<'_> {
        let events = self.engine.step(&self.input);
        for event in events {
            self.sound.play(event);
            if let GameEvent::NewBest(score) = event {
                if let Err(e) = self.store.save(*score) {
                    log::warn!("Best score not saved: {e}");
                }
            }
        }
        self.engine.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Reconfigure the sink (volume, mute, haptics) between frames
    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    pub fn store(&self) -> &B {
        &self.store
    }
}
