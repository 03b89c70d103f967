//! Procedural platform generation
//!
//! Builds the starting ladder, streams new platforms in above the camera as it
//! climbs, and drops platforms that have scrolled off the bottom. The live set
//! stays bounded by the visible window plus lookahead, however long the run.

use glam::DVec2;

use super::rng::RandomSource;
use super::state::{Platform, PlatformKind, Star};
use crate::consts::{GROUND_OFFSET, GROUND_WIDTH_SCALE};
use crate::tuning::Tuning;

/// Widths of the non-Normal probability bands at some difficulty.
///
/// `[0, 1)` is partitioned as Spring, Moving, Breakable, then Normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeBands {
    pub spring: f64,
    pub moving: f64,
    pub breakable: f64,
}

impl TypeBands {
    pub fn for_difficulty(tuning: &Tuning, difficulty: f64) -> Self {
        let mut bands = Self {
            spring: tuning.spring_chance * tuning.spring_scale.multiplier(difficulty),
            moving: tuning.moving_chance * tuning.moving_scale.multiplier(difficulty),
            breakable: tuning.breakable_chance * tuning.breakable_scale.multiplier(difficulty),
        };

        // Normal always keeps a share of the distribution
        let special = bands.special_total();
        if special > tuning.max_special_total {
            let k = tuning.max_special_total / special;
            bands.spring *= k;
            bands.moving *= k;
            bands.breakable *= k;
        }
        bands
    }

    pub fn special_total(&self) -> f64 {
        self.spring + self.moving + self.breakable
    }

    /// Probability of a Normal platform
    pub fn normal(&self) -> f64 {
        1.0 - self.special_total()
    }

    /// Map a uniform sample in `[0, 1)` to a platform kind
    pub fn pick(&self, r: f64) -> PlatformKind {
        if r < self.spring {
            PlatformKind::Spring
        } else if r < self.spring + self.moving {
            PlatformKind::Moving
        } else if r < self.special_total() {
            PlatformKind::Breakable
        } else {
            PlatformKind::Normal
        }
    }
}

/// Random platform centre x that keeps the slab on screen
pub fn random_x(tuning: &Tuning, rng: &mut impl RandomSource) -> f64 {
    let half = tuning.platform_w / 2.0;
    rng.range(half, tuning.canvas_width - half)
}

/// Create a platform with a difficulty-weighted random kind
pub fn make_platform(tuning: &Tuning, pos: DVec2, difficulty: f64, rng: &mut impl RandomSource) -> Platform {
    let kind = TypeBands::for_difficulty(tuning, difficulty).pick(rng.unit());
    let mut platform = Platform::new(pos, tuning.platform_w, tuning.platform_h, kind);
    match kind {
        PlatformKind::Moving => platform.vx = tuning.moving_platform_speed * rng.sign(),
        PlatformKind::Normal | PlatformKind::Breakable | PlatformKind::Spring => {}
    }
    platform
}

/// The wide starting platform
pub fn ground(tuning: &Tuning) -> Platform {
    Platform::new(
        DVec2::new(tuning.canvas_width / 2.0, tuning.canvas_height - GROUND_OFFSET),
        tuning.platform_w * GROUND_WIDTH_SCALE,
        tuning.platform_h,
        PlatformKind::Normal,
    )
}

/// Ground plus a ladder of platforms above it
pub fn initial_layout(tuning: &Tuning, rng: &mut impl RandomSource) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(tuning.initial_platforms);
    let ground = ground(tuning);
    let mut last_y = ground.pos.y;
    platforms.push(ground);

    for i in 1..tuning.initial_platforms {
        last_y -= rng.range(tuning.gap_min, tuning.gap_max);
        let x = random_x(tuning, rng);
        let pos = DVec2::new(x, last_y);
        if i <= tuning.safe_start_platforms {
            platforms.push(Platform::new(pos, tuning.platform_w, tuning.platform_h, PlatformKind::Normal));
        } else {
            platforms.push(make_platform(tuning, pos, 0.0, rng));
        }
    }
    platforms
}

/// Gap range between consecutive platforms at some difficulty
pub fn gap_range(tuning: &Tuning, difficulty: f64) -> (f64, f64) {
    let d = difficulty.max(0.0);
    (
        tuning.gap_min + (d * tuning.gap_min_growth).min(tuning.gap_min_growth_cap),
        tuning.gap_max + (d * tuning.gap_max_growth).min(tuning.gap_max_growth_cap),
    )
}

/// Add platforms above the topmost one until the lookahead margin above
/// `target_camera_y` is covered, at most `max_spawns_per_tick` at a time.
///
/// Returns how many were added. An empty collection needs no extension.
pub fn extend(
    platforms: &mut Vec<Platform>,
    target_camera_y: f64,
    difficulty: f64,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> usize {
    let Some(mut top) = platforms.iter().map(|p| p.pos.y).reduce(f64::min) else {
        return 0;
    };

    let horizon = target_camera_y - tuning.lookahead_margin;
    let (gap_lo, gap_hi) = gap_range(tuning, difficulty);
    let mut spawned = 0;
    while top > horizon && spawned < tuning.max_spawns_per_tick {
        let y = top - rng.range(gap_lo, gap_hi);
        let x = random_x(tuning, rng);
        platforms.push(make_platform(tuning, DVec2::new(x, y), difficulty, rng));
        top = y;
        spawned += 1;
    }

    if top > horizon {
        log::debug!("Terrain spawn cap hit ({spawned}); {:.1} units still uncovered", top - horizon);
    }
    spawned
}

/// Drop platforms below the visible window (plus margin) and spent debris.
///
/// Returns how many were removed.
pub fn cull(platforms: &mut Vec<Platform>, camera_y: f64, tuning: &Tuning) -> usize {
    let threshold = camera_y + tuning.canvas_height + tuning.cull_margin;
    let before = platforms.len();
    platforms.retain(|p| p.pos.y < threshold && !p.is_spent());
    before - platforms.len()
}

/// Background star field, generated once per world
pub fn generate_stars(tuning: &Tuning, rng: &mut impl RandomSource) -> Vec<Star> {
    (0..tuning.star_count)
        .map(|_| Star {
            pos: DVec2::new(
                rng.range(0.0, tuning.canvas_width),
                rng.range(0.0, tuning.canvas_height * 3.0),
            ),
            size: rng.range(0.5, 2.0),
            speed: rng.range(0.3, 1.0),
            alpha: rng.range(0.3, 1.0),
        })
        .collect()
}
