//! One-way platform landing detection
//!
//! Platforms only catch a falling player. The vertical test band scales with
//! the fall speed so a fast ball cannot tunnel through a thin slab in one tick.

use super::state::{Platform, Player};
use crate::tuning::Tuning;

/// A qualifying landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Index into the platform collection
    pub index: usize,
    /// Player centre y when resting on the surface
    pub rest_y: f64,
}

/// Whether `player` lands on `platform` this tick
pub fn lands_on(player: &Player, platform: &Platform, tuning: &Tuning) -> bool {
    if platform.is_spent() || player.vel.y <= 0.0 {
        return false;
    }
    let dx = (player.pos.x - platform.pos.x).abs();
    let reach = platform.width / 2.0 + player.radius * tuning.hitbox_tolerance;
    // How far the bottom of the ball has sunk past the surface
    let depth = player.pos.y + player.radius - platform.top();
    dx < reach && depth >= 0.0 && depth < player.vel.y + tuning.landing_epsilon
}

/// First platform in collection order the player lands on, if any
pub fn find_landing(player: &Player, platforms: &[Platform], tuning: &Tuning) -> Option<Landing> {
    if player.vel.y <= 0.0 {
        return None;
    }
    platforms
        .iter()
        .position(|p| lands_on(player, p, tuning))
        .map(|index| Landing {
            index,
            rest_y: platforms[index].top() - player.radius,
        })
}
