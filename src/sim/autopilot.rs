//! Demo/idle steering: aims the player at a reachable platform
//!
//! Used by the headless runner and soak tests. Plays well enough to climb,
//! not well enough to be interesting.

use super::state::{Platform, PlatformKind, World};

/// Vertical band above the player worth aiming for while rising
const REACH_ABOVE: f64 = 160.0;

/// Pick a steering target x for the current world, or `None` to let go
pub fn autopilot_target(world: &World) -> Option<f64> {
    let player = &world.player;
    let feet = player.pos.y + player.radius;

    let candidates = world.live_platforms().filter(|p| !p.broken);

    let best = if player.vel.y < 0.0 {
        // Rising: the highest platform we can still clear
        candidates
            .filter(|p| p.top() < feet && p.top() > feet - REACH_ABOVE)
            .min_by(|a, b| score(a).total_cmp(&score(b)))
    } else {
        // Falling: the nearest platform below
        candidates
            .filter(|p| p.top() >= feet)
            .min_by(|a, b| (a.top() - feet).total_cmp(&(b.top() - feet)))
    };

    best.map(|p| p.pos.x)
}

/// Lower is better: prefer height, then springs, avoid breakables
fn score(p: &Platform) -> f64 {
    let bias = match p.kind {
        PlatformKind::Spring => -40.0,
        PlatformKind::Breakable => 40.0,
        PlatformKind::Normal | PlatformKind::Moving => 0.0,
    };
    p.top() + bias
}
