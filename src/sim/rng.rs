//! Single injectable source of randomness for terrain and effects
//!
//! Everything random in the simulation draws from one [`RandomSource`], so a
//! seeded [`Pcg32`] reproduces a run exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random numbers used by the simulation
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Uniform sample in `[min, max)`. Returns `min` when `min == max`; the
    /// bounds are not reordered, so `min > max` samples from `(max, min]`.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.unit() * (max - min)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// `+1.0` or `-1.0` with equal probability
    fn sign(&mut self) -> f64 {
        if self.chance(0.5) { -1.0 } else { 1.0 }
    }
}

impl RandomSource for Pcg32 {
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Seeded default generator
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Useful when a caller needs a specific platform type or position.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        Self {
            samples: samples.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let value = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
