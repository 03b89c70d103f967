//! World snapshot and entity types
//!
//! The engine is the only mutator of a [`World`]; collaborators read it.

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::terrain;
use crate::tuning::Tuning;

/// Stretch applied by the launch that starts a run
const RUN_START_STRETCH: f64 = 0.3;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap
    Title,
    /// Active gameplay
    Playing,
    /// Run ended, frozen until reset
    GameOver,
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Slides horizontally, bouncing off the playfield edges
    Moving,
    /// Gives a weak bounce and crumbles
    Breakable,
    /// Launches the player with a super jump
    Spring,
}

/// A platform entity. `pos` is the centre of the slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: DVec2,
    pub width: f64,
    pub height: f64,
    pub kind: PlatformKind,
    /// Horizontal speed (Moving only)
    pub vx: f64,
    pub broken: bool,
    /// Frames of debris left after breaking
    pub break_timer: u32,
}

impl Platform {
    pub fn new(pos: DVec2, width: f64, height: f64, kind: PlatformKind) -> Self {
        Self {
            pos,
            width,
            height,
            kind,
            vx: 0.0,
            broken: false,
            break_timer: 0,
        }
    }

    /// Y of the landing surface
    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y - self.height / 2.0
    }

    /// Broken and done crumbling: logically gone
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.broken && self.break_timer == 0
    }

    /// Start crumbling
    pub fn break_apart(&mut self, frames: u32) {
        self.broken = true;
        self.break_timer = frames;
    }
}

/// The player ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    /// Visual deformation: negative = squash, positive = stretch
    pub stretch: f64,
}

/// A visual particle (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Frames remaining
    pub life: u32,
    pub max_life: u32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f64,
}

impl Particle {
    /// Remaining life as a 0..1 fade factor
    pub fn fade(&self) -> f64 {
        fade_ratio(self.life, self.max_life)
    }
}

/// Expanding ring drawn where the player landed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingRing {
    pub pos: DVec2,
    pub radius: f64,
    pub life: u32,
    pub max_life: u32,
    pub color: u32,
}

impl LandingRing {
    pub fn fade(&self) -> f64 {
        fade_ratio(self.life, self.max_life)
    }
}

fn fade_ratio(life: u32, max_life: u32) -> f64 {
    if max_life == 0 {
        0.0
    } else {
        (life as f64 / max_life as f64).min(1.0)
    }
}

/// Background star (parallax, wrap-rendered)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: DVec2,
    pub size: f64,
    pub speed: f64,
    pub alpha: f64,
}

/// Discrete signals for sound and storage collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Normal or moving platform bounce
    Jump,
    /// Breakable platform bounce
    WeakJump,
    /// Spring launch
    SuperJump,
    /// A breakable platform started crumbling
    Break,
    /// Combo reached a celebrated level
    Combo(u32),
    /// Altitude threshold crossed for the first time this run
    Milestone(u32),
    /// Run ended
    GameOver { score: u64, altitude: f64 },
    /// Best score beaten; persist it
    NewBest(u64),
}

/// Complete world state for one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub phase: GamePhase,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub particles: Vec<Particle>,
    pub landing_rings: Vec<LandingRing>,
    pub stars: Vec<Star>,
    pub score: u64,
    pub best_score: u64,
    /// Running maximum; never decreases within a run
    pub altitude: f64,
    pub combo: u32,
    /// Frames until the combo lapses
    pub combo_timer: u32,
    pub camera_y: f64,
    /// Only ever moves up (toward negative y)
    pub target_camera_y: f64,
    pub shake: f64,
    pub level_text: String,
    pub level_text_life: u32,
    pub speed_line_alpha: f64,
    pub milestones_passed: BTreeSet<u32>,
}

impl World {
    /// Fresh world on the title screen
    pub fn new(tuning: &Tuning, rng: &mut impl RandomSource, best_score: u64) -> Self {
        let platforms = terrain::initial_layout(tuning, rng);
        let stars = terrain::generate_stars(tuning, rng);
        Self {
            phase: GamePhase::Title,
            player: Player {
                pos: start_position(tuning),
                vel: DVec2::ZERO,
                radius: tuning.player_radius,
                stretch: 0.0,
            },
            platforms,
            particles: Vec::new(),
            landing_rings: Vec::new(),
            stars,
            score: 0,
            best_score,
            altitude: 0.0,
            combo: 0,
            combo_timer: 0,
            camera_y: 0.0,
            target_camera_y: 0.0,
            shake: 0.0,
            level_text: String::new(),
            level_text_life: 0,
            speed_line_alpha: 0.0,
            milestones_passed: BTreeSet::new(),
        }
    }

    /// Fresh terrain and zeroed progress, already playing. Best score carries over.
    ///
    /// The player leaves the ground already jumping; the launch is not a
    /// landing, so it raises no events and starts no combo.
    pub fn new_run(tuning: &Tuning, rng: &mut impl RandomSource, best_score: u64) -> Self {
        let mut world = Self::new(tuning, rng, best_score);
        world.phase = GamePhase::Playing;
        world.player.vel.y = tuning.jump_velocity;
        world.player.stretch = RUN_START_STRETCH;
        world
    }

    /// Height the camera has climbed (non-decreasing within a run)
    #[inline]
    pub fn camera_height(&self) -> f64 {
        -self.target_camera_y
    }

    /// Player y relative to the top of the visible window
    #[inline]
    pub fn player_screen_y(&self) -> f64 {
        self.player.pos.y - self.camera_y
    }

    /// Platforms that can still be landed on
    pub fn live_platforms(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| !p.is_spent())
    }
}

/// Player rests on the ground platform
pub fn start_position(tuning: &Tuning) -> DVec2 {
    let ground = terrain::ground(tuning);
    DVec2::new(tuning.canvas_width / 2.0, ground.top() - tuning.player_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    #[test]
    fn new_world_starts_on_title() {
        let tuning = Tuning::default();
        let world = World::new(&tuning, &mut seeded(1), 42);
        assert_eq!(world.phase, GamePhase::Title);
        assert_eq!(world.best_score, 42);
        assert_eq!(world.platforms.len(), tuning.initial_platforms);
        assert_eq!(world.stars.len(), tuning.star_count);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn player_starts_touching_ground() {
        let tuning = Tuning::default();
        let world = World::new(&tuning, &mut seeded(1), 0);
        let ground = &world.platforms[0];
        assert!((world.player.pos.y + world.player.radius - ground.top()).abs() < 1e-9);
    }

    #[test]
    fn spent_platform() {
        let mut p = Platform::new(DVec2::new(10.0, 10.0), 64.0, 12.0, PlatformKind::Breakable);
        assert!(!p.is_spent());
        p.break_apart(2);
        assert!(!p.is_spent());
        p.break_timer = 0;
        assert!(p.is_spent());
    }

    #[test]
    fn fade_ratios() {
        let ring = LandingRing {
            pos: DVec2::ZERO,
            radius: 5.0,
            life: 10,
            max_life: 20,
            color: 0,
        };
        assert_eq!(ring.fade(), 0.5);

        let mut particle = Particle {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            life: 7,
            max_life: 28,
            color: 0,
            size: 2.0,
        };
        assert_eq!(particle.fade(), 0.25);
        particle.max_life = 0;
        assert_eq!(particle.fade(), 0.0);
    }
}
