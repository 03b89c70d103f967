//! Short-lived visual effects: particle bursts and landing rings
//!
//! Purely decorative; nothing in the simulation reads them back.

use glam::DVec2;

use super::rng::RandomSource;
use super::state::{LandingRing, Particle};

/// Burst colours (0xRRGGBB)
pub const JUMP_COLOR: u32 = 0x55efc4;
pub const SPRING_COLOR: u32 = 0xff6b6b;
pub const DEBRIS_COLOR: u32 = 0xb2bec3;
pub const DEBRIS_RING_COLOR: u32 = 0xdfe6e9;

/// Particles per burst
pub const JUMP_BURST: usize = 4;
pub const SPRING_BURST: usize = 8;
pub const DEBRIS_BURST: usize = 5;

const PARTICLE_GRAVITY: f64 = 0.06;
const PARTICLE_MIN_LIFE: u32 = 20;
const PARTICLE_MAX_LIFE: u32 = 35;
const RING_LIFE: u32 = 20;
const RING_START_RADIUS: f64 = 5.0;
const RING_GROWTH: f64 = 2.5;

/// Spray `count` particles from `at` in random directions, biased upward
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl RandomSource,
    at: DVec2,
    count: usize,
    color: u32,
) {
    particles.reserve(count);
    for _ in 0..count {
        let angle = rng.range(0.0, std::f64::consts::TAU);
        let speed = rng.range(1.0, 4.0);
        particles.push(Particle {
            pos: at,
            vel: DVec2::new(angle.cos() * speed, angle.sin() * speed - 1.5),
            life: rng.range(PARTICLE_MIN_LIFE as f64, PARTICLE_MAX_LIFE as f64) as u32,
            max_life: PARTICLE_MAX_LIFE,
            color,
            size: rng.range(1.5, 4.0),
        });
    }
}

pub fn spawn_ring(rings: &mut Vec<LandingRing>, at: DVec2, color: u32) {
    rings.push(LandingRing {
        pos: at,
        radius: RING_START_RADIUS,
        life: RING_LIFE,
        max_life: RING_LIFE,
        color,
    });
}

/// Advance every effect one tick and drop the expired ones
pub fn advance(particles: &mut Vec<Particle>, rings: &mut Vec<LandingRing>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life = p.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);

    for r in rings.iter_mut() {
        r.life = r.life.saturating_sub(1);
        r.radius += RING_GROWTH;
    }
    rings.retain(|r| r.life > 0);
}
