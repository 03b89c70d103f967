//! Engine: sole owner of the world, its tuning and its random source
//!
//! Hosts call [`Engine::step`] once per displayed frame and hand the
//! resulting [`Snapshot`] to the renderer.

use std::ops::Deref;

use rand_pcg::Pcg32;
use serde::Serialize;

use super::rng::{RandomSource, seeded};
use super::state::{GameEvent, GamePhase, World};
use super::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Read-only view of the world for one frame. Serializes as `{ frame, world }`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    /// Increments once per [`Engine::step`]
    pub frame: u64,
    pub world: &'a World,
}

impl Deref for Snapshot<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

pub struct Engine<R: RandomSource = Pcg32> {
    world: World,
    tuning: Tuning,
    rng: R,
    frame: u64,
    events: Vec<GameEvent>,
}

impl Engine<Pcg32> {
    /// Seeded engine on the title screen
    pub fn new(tuning: Tuning, seed: u64, best_score: u64) -> Self {
        log::info!("New engine (seed {seed}, best {best_score})");
        Self::with_rng(tuning, seeded(seed), best_score)
    }
}

impl<R: RandomSource> Engine<R> {
    pub fn with_rng(mut tuning: Tuning, mut rng: R, best_score: u64) -> Self {
        tuning.normalize();
        let world = World::new(&tuning, &mut rng, best_score);
        Self {
            world,
            tuning,
            rng,
            frame: 0,
            events: Vec::new(),
        }
    }

    /// Start a fresh run, keeping the best score
    pub fn reset(&mut self) {
        let best = self.world.best_score;
        self.world = World::new_run(&self.tuning, &mut self.rng, best);
        log::info!("Run started (best {best})");
    }

    /// Advance one frame. Returns the signals raised during it.
    pub fn step(&mut self, input: &TickInput) -> &[GameEvent] {
        self.events.clear();
        self.frame += 1;
        tick(&mut self.world, input, &self.tuning, &mut self.rng, &mut self.events);
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            frame: self.frame,
            world: &self.world,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_until_reset() {
        let mut engine = Engine::new(Tuning::default(), 1, 0);
        let before = engine.world().player.clone();
        assert!(engine.step(&TickInput::default()).is_empty());
        assert_eq!(engine.phase(), GamePhase::Title);
        assert_eq!(engine.world().player, before);
        assert_eq!(engine.frame(), 1);

        engine.reset();
        assert_eq!(engine.phase(), GamePhase::Playing);
        // The opening launch is not a landing
        assert!(engine.step(&TickInput::default()).is_empty());
        let w = engine.world();
        assert_eq!(w.combo, 0);
        assert_eq!(w.player.vel.y, engine.tuning().jump_velocity + engine.tuning().gravity);
    }

    #[test]
    fn reset_keeps_best_and_clears_progress() {
        let mut engine = Engine::new(Tuning::default(), 3, 0);
        engine.reset();
        engine.world.best_score = 77;
        engine.world.score = 12;
        engine.world.altitude = 120.0;
        engine.world.combo = 5;
        engine.world.milestones_passed.insert(500);
        engine.world.phase = GamePhase::GameOver;

        engine.reset();
        let w = engine.world();
        assert_eq!(w.phase, GamePhase::Playing);
        assert_eq!(w.best_score, 77);
        assert_eq!(w.score, 0);
        assert_eq!(w.altitude, 0.0);
        assert_eq!(w.combo, 0);
        assert!(w.milestones_passed.is_empty());
        assert_eq!(w.platforms.len(), engine.tuning().initial_platforms);
    }

    #[test]
    fn snapshot_is_versioned() {
        let mut engine = Engine::new(Tuning::default(), 4, 0);
        engine.reset();
        let first = engine.snapshot().frame;
        engine.step(&TickInput::default());
        let snap = engine.snapshot();
        assert_eq!(snap.frame, first + 1);
        // Derefs to the world
        assert_eq!(snap.phase, GamePhase::Playing);
    }

    #[test]
    fn unordered_milestones_still_fire_ascending() {
        let tuning = Tuning {
            milestones: vec![1000, 500, 1000],
            ..Tuning::default()
        };
        let mut engine = Engine::new(tuning, 6, 0);
        assert_eq!(engine.tuning().milestones, vec![500, 1000]);
        engine.reset();
        engine.world.platforms.clear();

        // Past 500 but short of 1000
        engine.world.camera_y = -1_400.0;
        engine.world.target_camera_y = -1_400.0;
        engine.world.player.pos.y = -1_300.0;
        let first = engine.step(&TickInput::default()).to_vec();
        assert!(engine.world().altitude > 500.0 && engine.world().altitude < 1_000.0);
        assert!(first.contains(&GameEvent::Milestone(500)));

        engine.world.camera_y = -2_400.0;
        engine.world.target_camera_y = -2_400.0;
        engine.world.player.pos.y = -2_300.0;
        let second = engine.step(&TickInput::default()).to_vec();
        let fired: Vec<_> = second
            .iter()
            .filter(|e| matches!(e, GameEvent::Milestone(_)))
            .collect();
        assert_eq!(fired, vec![&GameEvent::Milestone(1000)]);
    }

    #[test]
    fn serialized_snapshot_carries_frame() {
        let mut engine = Engine::new(Tuning::default(), 4, 0);
        engine.reset();
        engine.step(&TickInput::default());
        engine.step(&TickInput::default());
        let json: serde_json::Value = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["frame"], 2);
        assert_eq!(json["world"]["phase"], "Playing");
        assert!(json["world"]["platforms"].is_array());
    }

    #[test]
    fn game_over_freezes_until_reset() {
        let mut engine = Engine::new(Tuning::default(), 8, 0);
        engine.reset();
        engine.world.platforms.clear();
        let mut frames = 0;
        while engine.phase() == GamePhase::Playing && frames < 10_000 {
            engine.step(&TickInput::default());
            frames += 1;
        }
        assert_eq!(engine.phase(), GamePhase::GameOver);

        let frozen = engine.world().player.clone();
        assert!(engine.step(&TickInput { target_x: Some(0.0) }).is_empty());
        assert_eq!(engine.world().player, frozen);
    }
}
