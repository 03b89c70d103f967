//! Sky Leap - an endless vertical jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics tick, collisions, terrain generation)
//! - `session`: Fixed-step host that wires input, sound and storage to the sim
//! - `audio`: Sound/haptic cue dispatch
//! - `persistence`: Best-score storage
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Visible playfield, in world units
    pub const CANVAS_WIDTH: f64 = 400.0;
    pub const CANVAS_HEIGHT: f64 = 650.0;

    /// Physics (per tick, one tick per displayed frame)
    pub const GRAVITY: f64 = 0.42;
    pub const JUMP_VELOCITY: f64 = -11.2;
    pub const SUPER_JUMP: f64 = -16.5;
    /// Breakable platform bounce
    pub const WEAK_JUMP: f64 = -6.0;
    pub const MAX_FALL_SPEED: f64 = 13.0;
    pub const PLAYER_RADIUS: f64 = 14.0;
    pub const MOVE_ACCEL: f64 = 0.15;
    pub const FRICTION_AIR: f64 = 0.91;
    pub const CAMERA_LERP: f64 = 0.12;

    /// Platforms
    pub const PLATFORM_W: f64 = 64.0;
    pub const PLATFORM_H: f64 = 12.0;
    /// Ground platform is this many times wider than a regular one
    pub const GROUND_WIDTH_SCALE: f64 = 1.8;
    /// Distance of the ground platform centre from the bottom edge
    pub const GROUND_OFFSET: f64 = 40.0;
    pub const PLATFORM_GAP_MIN: f64 = 55.0;
    pub const PLATFORM_GAP_MAX: f64 = 105.0;
    pub const INITIAL_PLATFORMS: usize = 12;
    /// Platforms directly above the ground that are always Normal
    pub const SAFE_START_PLATFORMS: usize = 3;
    pub const SCROLL_LINE: f64 = 250.0;
    pub const MOVING_PLATFORM_SPEED: f64 = 1.2;
    pub const BREAKABLE_CHANCE: f64 = 0.10;
    pub const MOVING_CHANCE: f64 = 0.15;
    pub const SPRING_CHANCE: f64 = 0.07;
    /// Frames a broken platform lingers as debris
    pub const BREAK_FRAMES: u32 = 18;

    /// Terrain generation
    pub const LOOKAHEAD_MARGIN: f64 = 200.0;
    pub const CULL_MARGIN: f64 = 100.0;
    pub const MAX_SPAWNS_PER_TICK: usize = 5;

    /// Combo
    pub const COMBO_DECAY_FRAMES: u32 = 120;

    /// Game over once the player is this far below the visible window
    pub const GAME_OVER_MARGIN: f64 = 50.0;
    pub const GAME_OVER_SHAKE: f64 = 0.5;

    /// Background
    pub const STAR_COUNT: usize = 80;

    /// Altitude thresholds that trigger a celebration banner
    pub const MILESTONES: [u32; 10] = [500, 1000, 2000, 3000, 5000, 7500, 10000, 15000, 20000, 30000];
    pub const BANNER_FRAMES: u32 = 60;
}

/// Wrap a horizontal position onto the cylinder `[-margin, width + margin)`.
///
/// Leaving past one edge re-enters at the opposite edge, keeping any overshoot.
#[inline]
pub fn wrap_x(x: f64, width: f64, margin: f64) -> f64 {
    let span = width + 2.0 * margin;
    let wrapped = (x + margin).rem_euclid(span) - margin;
    // rem_euclid can round up to `span` for tiny negative inputs
    if wrapped >= width + margin { -margin } else { wrapped }
}

/// Move `current` toward `target` by a fixed fraction
#[inline]
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}
