//! Data-driven game balance
//!
//! [`Tuning`] mirrors every constant in [`crate::consts`]. Missing keys in a
//! JSON override fall back to the compile-time defaults, so a file only needs
//! the values being experimented with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// How a platform kind's spawn chance scales with difficulty.
///
/// The multiplier is `floor + difficulty * per_difficulty`, capped at `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanceScale {
    pub floor: f64,
    pub per_difficulty: f64,
    pub cap: f64,
}

impl ChanceScale {
    pub const fn new(floor: f64, per_difficulty: f64, cap: f64) -> Self {
        Self {
            floor,
            per_difficulty,
            cap,
        }
    }

    /// Multiplier applied to the base chance at `difficulty`
    pub fn multiplier(&self, difficulty: f64) -> f64 {
        (self.floor + difficulty.max(0.0) * self.per_difficulty)
            .max(self.floor)
            .min(self.cap)
    }
}

/// Runtime-tunable physics, terrain and scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Playfield ──
    pub canvas_width: f64,
    pub canvas_height: f64,

    // ── Player physics ──
    pub gravity: f64,
    pub jump_velocity: f64,
    pub super_jump: f64,
    pub weak_jump: f64,
    pub max_fall_speed: f64,
    pub player_radius: f64,
    pub move_accel: f64,
    pub friction_air: f64,
    /// Fraction of the player radius added to a platform's half width
    pub hitbox_tolerance: f64,
    /// Extra vertical slack on top of the fall speed when testing landings
    pub landing_epsilon: f64,

    // ── Camera ──
    pub camera_lerp: f64,
    pub scroll_line: f64,

    // ── Platforms ──
    pub platform_w: f64,
    pub platform_h: f64,
    pub gap_min: f64,
    pub gap_max: f64,
    /// Gap growth per unit of difficulty, and its cap (min/max bounds)
    pub gap_min_growth: f64,
    pub gap_min_growth_cap: f64,
    pub gap_max_growth: f64,
    pub gap_max_growth_cap: f64,
    pub initial_platforms: usize,
    pub safe_start_platforms: usize,
    pub moving_platform_speed: f64,
    pub break_frames: u32,

    // ── Platform type selection ──
    pub spring_chance: f64,
    pub moving_chance: f64,
    pub breakable_chance: f64,
    pub spring_scale: ChanceScale,
    pub moving_scale: ChanceScale,
    pub breakable_scale: ChanceScale,
    /// Upper bound on the summed non-Normal bands
    pub max_special_total: f64,

    // ── Terrain streaming ──
    pub lookahead_margin: f64,
    pub cull_margin: f64,
    pub max_spawns_per_tick: usize,

    // ── Scoring ──
    /// Altitude gained per unit of camera travel
    pub altitude_per_camera: f64,
    /// Altitude needed per score point
    pub altitude_per_point: f64,
    /// Altitude that adds one unit of difficulty
    pub altitude_per_difficulty: f64,
    pub milestones: Vec<u32>,
    pub banner_frames: u32,

    // ── Combo ──
    pub combo_decay_frames: u32,
    /// Whether landing on a Breakable platform extends the combo
    pub breakable_awards_combo: bool,

    // ── Game over ──
    pub game_over_margin: f64,
    pub game_over_shake: f64,

    // ── Background ──
    pub star_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            super_jump: SUPER_JUMP,
            weak_jump: WEAK_JUMP,
            max_fall_speed: MAX_FALL_SPEED,
            player_radius: PLAYER_RADIUS,
            move_accel: MOVE_ACCEL,
            friction_air: FRICTION_AIR,
            hitbox_tolerance: 0.3,
            landing_epsilon: 4.0,

            camera_lerp: CAMERA_LERP,
            scroll_line: SCROLL_LINE,

            platform_w: PLATFORM_W,
            platform_h: PLATFORM_H,
            gap_min: PLATFORM_GAP_MIN,
            gap_max: PLATFORM_GAP_MAX,
            gap_min_growth: 1.5,
            gap_min_growth_cap: 15.0,
            gap_max_growth: 3.0,
            gap_max_growth_cap: 30.0,
            initial_platforms: INITIAL_PLATFORMS,
            safe_start_platforms: SAFE_START_PLATFORMS,
            moving_platform_speed: MOVING_PLATFORM_SPEED,
            break_frames: BREAK_FRAMES,

            spring_chance: SPRING_CHANCE,
            moving_chance: MOVING_CHANCE,
            breakable_chance: BREAKABLE_CHANCE,
            spring_scale: ChanceScale::new(0.5, 0.08, 1.5),
            moving_scale: ChanceScale::new(0.5, 0.12, 2.0),
            breakable_scale: ChanceScale::new(0.5, 0.15, 2.5),
            max_special_total: 0.95,

            lookahead_margin: LOOKAHEAD_MARGIN,
            cull_margin: CULL_MARGIN,
            max_spawns_per_tick: MAX_SPAWNS_PER_TICK,

            altitude_per_camera: 0.5,
            altitude_per_point: 10.0,
            altitude_per_difficulty: 1000.0,
            milestones: MILESTONES.to_vec(),
            banner_frames: BANNER_FRAMES,

            combo_decay_frames: COMBO_DECAY_FRAMES,
            breakable_awards_combo: false,

            game_over_margin: GAME_OVER_MARGIN,
            game_over_shake: GAME_OVER_SHAKE,

            star_count: STAR_COUNT,
        }
    }
}

impl Tuning {
    /// Parse a JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.normalize();
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON override from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Put list-valued settings in the shape the simulation expects
    /// (milestones strictly ascending)
    pub fn normalize(&mut self) {
        self.milestones.sort_unstable();
        self.milestones.dedup();
    }

    /// Difficulty scalar for a given altitude
    pub fn difficulty(&self, altitude: f64) -> f64 {
        altitude / self.altitude_per_difficulty
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("gravity", self.gravity)?;
        negative("jump_velocity", self.jump_velocity)?;
        negative("super_jump", self.super_jump)?;
        negative("weak_jump", self.weak_jump)?;
        positive("max_fall_speed", self.max_fall_speed)?;
        positive("player_radius", self.player_radius)?;
        non_negative("move_accel", self.move_accel)?;
        unit_interval("friction_air", self.friction_air)?;
        non_negative("hitbox_tolerance", self.hitbox_tolerance)?;
        non_negative("landing_epsilon", self.landing_epsilon)?;
        unit_interval("camera_lerp", self.camera_lerp)?;
        positive("scroll_line", self.scroll_line)?;
        positive("platform_w", self.platform_w)?;
        positive("platform_h", self.platform_h)?;
        positive("gap_min", self.gap_min)?;
        if !(self.gap_max >= self.gap_min) {
            return Err(Error::InvalidTuning {
                name: "gap_max",
                value: self.gap_max,
                expected: ">= gap_min",
            });
        }
        non_negative("gap_min_growth", self.gap_min_growth)?;
        non_negative("gap_min_growth_cap", self.gap_min_growth_cap)?;
        non_negative("gap_max_growth", self.gap_max_growth)?;
        non_negative("gap_max_growth_cap", self.gap_max_growth_cap)?;
        if self.platform_w > self.canvas_width {
            return Err(Error::InvalidTuning {
                name: "platform_w",
                value: self.platform_w,
                expected: "<= canvas_width",
            });
        }
        if self.initial_platforms == 0 {
            return Err(Error::InvalidTuning {
                name: "initial_platforms",
                value: 0.0,
                expected: ">= 1",
            });
        }
        non_negative("moving_platform_speed", self.moving_platform_speed)?;
        probability("spring_chance", self.spring_chance)?;
        probability("moving_chance", self.moving_chance)?;
        probability("breakable_chance", self.breakable_chance)?;
        for (name, scale) in [
            ("spring_scale", self.spring_scale),
            ("moving_scale", self.moving_scale),
            ("breakable_scale", self.breakable_scale),
        ] {
            non_negative(name, scale.floor)?;
            non_negative(name, scale.per_difficulty)?;
            if !(scale.cap >= scale.floor) {
                return Err(Error::InvalidTuning {
                    name,
                    value: scale.cap,
                    expected: "cap >= floor",
                });
            }
        }
        if !(self.max_special_total > 0.0 && self.max_special_total < 1.0) {
            return Err(Error::InvalidTuning {
                name: "max_special_total",
                value: self.max_special_total,
                expected: "in (0, 1)",
            });
        }
        non_negative("lookahead_margin", self.lookahead_margin)?;
        non_negative("cull_margin", self.cull_margin)?;
        if self.max_spawns_per_tick == 0 {
            return Err(Error::InvalidTuning {
                name: "max_spawns_per_tick",
                value: 0.0,
                expected: ">= 1",
            });
        }
        positive("altitude_per_camera", self.altitude_per_camera)?;
        positive("altitude_per_point", self.altitude_per_point)?;
        positive("altitude_per_difficulty", self.altitude_per_difficulty)?;
        if self.milestones.is_empty() {
            return Err(Error::InvalidTuning {
                name: "milestones",
                value: 0.0,
                expected: "at least one threshold",
            });
        }
        if let Some(pair) = self.milestones.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidTuning {
                name: "milestones",
                value: pair[1] as f64,
                expected: "strictly ascending thresholds",
            });
        }
        non_negative("game_over_margin", self.game_over_margin)?;
        non_negative("game_over_shake", self.game_over_shake)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    check(name, value, value > 0.0, "> 0")
}

fn negative(name: &'static str, value: f64) -> Result<()> {
    check(name, value, value < 0.0, "< 0 (upward)")
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    check(name, value, value >= 0.0, ">= 0")
}

fn unit_interval(name: &'static str, value: f64) -> Result<()> {
    check(name, value, value > 0.0 && value <= 1.0, "in (0, 1]")
}

fn probability(name: &'static str, value: f64) -> Result<()> {
    check(name, value, (0.0..=1.0).contains(&value), "in [0, 1]")
}

fn check(name: &'static str, value: f64, ok: bool, expected: &'static str) -> Result<()> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        log::warn!("Rejected tuning value {name} = {value}");
        Err(Error::InvalidTuning {
            name,
            value,
            expected,
        })
    }
}
