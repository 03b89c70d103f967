//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per displayed frame, fixed step
//! - Seeded RNG only, drawn through [`RandomSource`]
//! - Stable iteration order (collection order)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod engine;
pub mod rng;
pub mod state;
pub mod terrain;
pub mod tick;

pub use autopilot::autopilot_target;
pub use collision::{Landing, find_landing};
pub use engine::{Engine, Snapshot};
pub use rng::{RandomSource, ScriptedRandom, seeded};
pub use state::{
    GameEvent, GamePhase, LandingRing, Particle, Platform, PlatformKind, Player, Star, World,
};
pub use terrain::TypeBands;
pub use tick::{TickInput, tick};
