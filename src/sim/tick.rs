//! Fixed-step simulation tick
//!
//! One call advances the world by one displayed frame. Steps run in a fixed
//! order; each reads what the previous one wrote.

use super::collision::{Landing, find_landing};
use super::effects::{self, DEBRIS_BURST, DEBRIS_COLOR, DEBRIS_RING_COLOR, JUMP_BURST, JUMP_COLOR, SPRING_BURST, SPRING_COLOR};
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, PlatformKind, World};
use super::terrain;
use crate::tuning::Tuning;
use crate::{approach, wrap_x};

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal steering target in world units (pointer/touch held)
    pub target_x: Option<f64>,
}

/// Landing screen-shake strengths
const BREAK_SHAKE: f64 = 0.12;
const SPRING_SHAKE: f64 = 0.18;
const SHAKE_DECAY: f64 = 0.03;

/// Squash/stretch impulses and relaxation rates
const LAUNCH_STRETCH: f64 = 0.5;
const BREAK_SQUASH: f64 = -0.25;
const JUMP_SQUASH: f64 = -0.2;
const STRETCH_RELAX: f64 = 0.03;
const SQUASH_RELAX: f64 = 0.04;

/// Speed lines appear past this vertical speed
const SPEED_LINE_THRESHOLD: f64 = 8.0;
const SPEED_LINE_RANGE: f64 = 12.0;
const SPEED_LINE_MAX: f64 = 0.6;
const SPEED_LINE_FADE: f64 = 0.03;

/// Combo levels from which a combo cue plays
const SPRING_COMBO_CUE: u32 = 2;
const JUMP_COMBO_CUE: u32 = 3;

/// Advance the world by one tick, appending any signals to `events`.
///
/// Does nothing unless the world is [`GamePhase::Playing`].
pub fn tick(
    world: &mut World,
    input: &TickInput,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) {
    if world.phase != GamePhase::Playing {
        return;
    }

    steer(world, input, tuning);
    fall(world, tuning);

    let landed = match find_landing(&world.player, &world.platforms, tuning) {
        Some(landing) => {
            land(world, landing, tuning, rng, events);
            true
        }
        None => false,
    };

    if !landed && world.combo_timer > 0 {
        world.combo_timer -= 1;
        if world.combo_timer == 0 {
            world.combo = 0;
        }
    }

    relax_visuals(world);
    actuate_platforms(world, tuning);
    follow_camera(world, tuning);
    update_progress(world, tuning, events);

    let difficulty = tuning.difficulty(world.altitude);
    terrain::extend(&mut world.platforms, world.target_camera_y, difficulty, tuning, rng);
    terrain::cull(&mut world.platforms, world.camera_y, tuning);

    effects::advance(&mut world.particles, &mut world.landing_rings);
    world.shake = (world.shake - SHAKE_DECAY).max(0.0);
    world.level_text_life = world.level_text_life.saturating_sub(1);

    if world.player_screen_y() > tuning.canvas_height + tuning.game_over_margin {
        game_over(world, tuning, events);
    }
}

/// Spring-like pull toward the pointer, air friction, horizontal wrap
fn steer(world: &mut World, input: &TickInput, tuning: &Tuning) {
    let player = &mut world.player;
    if let Some(target_x) = input.target_x {
        player.vel.x += (target_x - player.pos.x) * tuning.move_accel;
    }
    player.vel.x *= tuning.friction_air;
    player.pos.x = wrap_x(player.pos.x + player.vel.x, tuning.canvas_width, player.radius);
}

fn fall(world: &mut World, tuning: &Tuning) {
    let player = &mut world.player;
    player.vel.y = (player.vel.y + tuning.gravity).min(tuning.max_fall_speed);
    player.pos.y += player.vel.y;
}

fn land(
    world: &mut World,
    landing: Landing,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) {
    world.player.pos.y = landing.rest_y;
    let platform = &mut world.platforms[landing.index];
    let site = platform.pos;

    match platform.kind {
        PlatformKind::Breakable => {
            platform.break_apart(tuning.break_frames);
            world.player.vel.y = tuning.weak_jump;
            world.player.stretch = BREAK_SQUASH;
            world.shake = world.shake.max(BREAK_SHAKE);
            events.push(GameEvent::Break);
            events.push(GameEvent::WeakJump);
            effects::spawn_burst(&mut world.particles, rng, site, DEBRIS_BURST, DEBRIS_COLOR);
            effects::spawn_ring(&mut world.landing_rings, site, DEBRIS_RING_COLOR);
            if tuning.breakable_awards_combo {
                bump_combo(world, tuning, JUMP_COMBO_CUE, events);
            }
        }
        PlatformKind::Spring => {
            world.player.vel.y = tuning.super_jump;
            world.player.stretch = LAUNCH_STRETCH;
            world.shake = world.shake.max(SPRING_SHAKE);
            events.push(GameEvent::SuperJump);
            effects::spawn_burst(&mut world.particles, rng, site, SPRING_BURST, SPRING_COLOR);
            effects::spawn_ring(&mut world.landing_rings, site, SPRING_COLOR);
            bump_combo(world, tuning, SPRING_COMBO_CUE, events);
        }
        PlatformKind::Normal | PlatformKind::Moving => {
            world.player.vel.y = tuning.jump_velocity;
            world.player.stretch = JUMP_SQUASH;
            events.push(GameEvent::Jump);
            effects::spawn_burst(&mut world.particles, rng, site, JUMP_BURST, JUMP_COLOR);
            effects::spawn_ring(&mut world.landing_rings, site, JUMP_COLOR);
            bump_combo(world, tuning, JUMP_COMBO_CUE, events);
        }
    }
}

fn bump_combo(world: &mut World, tuning: &Tuning, cue_above: u32, events: &mut Vec<GameEvent>) {
    world.combo += 1;
    world.combo_timer = tuning.combo_decay_frames;
    if world.combo > cue_above {
        events.push(GameEvent::Combo(world.combo));
    }
}

/// Squash/stretch relaxes toward zero; speed lines track vertical speed
fn relax_visuals(world: &mut World) {
    let stretch = world.player.stretch;
    world.player.stretch = if stretch > 0.0 {
        (stretch - STRETCH_RELAX).max(0.0)
    } else {
        (stretch + SQUASH_RELAX).min(0.0)
    };

    let speed = world.player.vel.y.abs();
    world.speed_line_alpha = if speed > SPEED_LINE_THRESHOLD {
        ((speed - SPEED_LINE_THRESHOLD) / SPEED_LINE_RANGE).min(SPEED_LINE_MAX)
    } else {
        (world.speed_line_alpha - SPEED_LINE_FADE).max(0.0)
    };
}

/// Slide moving platforms between the edges and count down breaking ones
fn actuate_platforms(world: &mut World, tuning: &Tuning) {
    for p in &mut world.platforms {
        match p.kind {
            PlatformKind::Moving => {
                p.pos.x += p.vx;
                let half = p.width / 2.0;
                if p.pos.x < half {
                    p.vx = p.vx.abs();
                } else if p.pos.x > tuning.canvas_width - half {
                    p.vx = -p.vx.abs();
                }
            }
            PlatformKind::Normal | PlatformKind::Breakable | PlatformKind::Spring => {}
        }
        if p.broken && p.break_timer > 0 {
            p.break_timer -= 1;
        }
    }
}

/// Raise the camera target to keep the player below the scroll line, then ease toward it
fn follow_camera(world: &mut World, tuning: &Tuning) {
    let screen_y = world.player.pos.y - world.target_camera_y;
    if screen_y < tuning.scroll_line {
        world.target_camera_y = world.player.pos.y - tuning.scroll_line;
    }
    world.camera_y = approach(world.camera_y, world.target_camera_y, tuning.camera_lerp);
}

/// Ratchet altitude and score, announce newly crossed milestones.
///
/// Milestones must be strictly ascending ([`Tuning::normalize`]); the scan
/// stops at the first one still out of reach.
fn update_progress(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    world.altitude = world.altitude.max(-world.camera_y * tuning.altitude_per_camera);
    let score = (world.altitude / tuning.altitude_per_point).floor() as u64;
    world.score = world.score.max(score);

    for &m in &tuning.milestones {
        if world.altitude < m as f64 {
            break;
        }
        if world.milestones_passed.insert(m) {
            world.level_text = format!("{m}m!");
            world.level_text_life = tuning.banner_frames;
            events.push(GameEvent::Milestone(m));
            log::info!("Milestone {m}m reached");
        }
    }
}

fn game_over(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    world.phase = GamePhase::GameOver;
    world.shake = tuning.game_over_shake;
    events.push(GameEvent::GameOver {
        score: world.score,
        altitude: world.altitude,
    });
    log::info!(
        "Game over: score {} altitude {:.0} (best {})",
        world.score,
        world.altitude,
        world.best_score
    );

    if world.score > world.best_score {
        world.best_score = world.score;
        events.push(GameEvent::NewBest(world.score));
        log::info!("New best score {}", world.score);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::sim::rng::seeded;
    use crate::sim::state::Platform;

    fn playing_world(tuning: &Tuning) -> World {
        World::new_run(tuning, &mut seeded(12345), 0)
    }

    /// World with a single platform whose surface is at `top`
    fn world_with_slab(tuning: &Tuning, kind: PlatformKind, top: f64) -> World {
        let mut world = playing_world(tuning);
        world.platforms = vec![Platform::new(DVec2::new(200.0, top + tuning.platform_h / 2.0), 64.0, 12.0, kind)];
        world
    }

    fn run(world: &mut World, tuning: &Tuning, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        tick(world, input, tuning, &mut seeded(1), &mut events);
        events
    }

    #[test]
    fn title_and_game_over_are_frozen() {
        let tuning = Tuning::default();
        for phase in [GamePhase::Title, GamePhase::GameOver] {
            let mut world = playing_world(&tuning);
            world.phase = phase;
            let before = world.player.clone();
            let events = run(&mut world, &tuning, &TickInput::default());
            assert!(events.is_empty());
            assert_eq!(world.player, before);
        }
    }

    #[test]
    fn first_tick_in_clear_air_applies_gravity() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        // Nothing under the player
        world.player.pos = DVec2::new(200.0, 300.0);
        world.player.vel = DVec2::ZERO;
        world.platforms.retain(|p| p.pos.y < 0.0);
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.player.vel.y, tuning.gravity);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn new_run_launches_without_landing() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        let events = run(&mut world, &tuning, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(world.combo, 0);
        assert_eq!(world.player.vel.y, tuning.jump_velocity + tuning.gravity);
        assert!(world.particles.is_empty() && world.landing_rings.is_empty());
        assert!(world.player.stretch > 0.0);
    }

    #[test]
    fn normal_landing_snaps_and_jumps() {
        let tuning = Tuning::default();
        let mut world = world_with_slab(&tuning, PlatformKind::Normal, 105.0);
        // Ball bottom at 100, falling at 5
        world.player.pos = DVec2::new(200.0, 100.0 - tuning.player_radius);
        world.player.vel = DVec2::new(0.0, 5.0);

        let events = run(&mut world, &tuning, &TickInput::default());

        assert_eq!(world.player.pos.y, 105.0 - tuning.player_radius);
        assert_eq!(world.player.vel.y, tuning.jump_velocity);
        assert_eq!(world.combo, 1);
        assert_eq!(world.combo_timer, tuning.combo_decay_frames);
        assert_eq!(events, vec![GameEvent::Jump]);
        assert_eq!(world.landing_rings.len(), 1);
        assert!(world.player.stretch < 0.0);
    }

    #[test]
    fn spring_always_super_jumps() {
        let tuning = Tuning::default();
        for vy in [0.5, 4.0, 9.0, 13.0] {
            let mut world = world_with_slab(&tuning, PlatformKind::Spring, 300.0);
            world.player.pos = DVec2::new(200.0, 299.9 - tuning.player_radius);
            world.player.vel = DVec2::new(0.0, vy);
            let events = run(&mut world, &tuning, &TickInput::default());
            assert_eq!(world.player.vel.y, tuning.super_jump, "prior vy {vy}");
            assert!(events.contains(&GameEvent::SuperJump));
            assert_eq!(world.combo, 1);
        }
    }

    #[test]
    fn breakable_gives_weak_bounce_and_crumbles() {
        let tuning = Tuning::default();
        let mut world = world_with_slab(&tuning, PlatformKind::Breakable, 300.0);
        world.player.pos = DVec2::new(200.0, 299.0 - tuning.player_radius);
        world.player.vel = DVec2::new(0.0, 3.0);

        let events = run(&mut world, &tuning, &TickInput::default());

        assert_eq!(world.player.vel.y, tuning.weak_jump);
        assert_eq!(events, vec![GameEvent::Break, GameEvent::WeakJump]);
        assert!(world.platforms[0].broken);
        // Countdown already ticked once this frame
        assert_eq!(world.platforms[0].break_timer, tuning.break_frames - 1);
        assert_eq!(world.combo, 0);
        assert!(world.shake > 0.0);
    }

    #[test]
    fn breakable_combo_policy_flag() {
        let tuning = Tuning {
            breakable_awards_combo: true,
            ..Tuning::default()
        };
        let mut world = world_with_slab(&tuning, PlatformKind::Breakable, 300.0);
        world.player.pos = DVec2::new(200.0, 299.0 - tuning.player_radius);
        world.player.vel = DVec2::new(0.0, 3.0);
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.combo, 1);
    }

    #[test]
    fn crumbled_platform_is_removed() {
        let tuning = Tuning::default();
        let mut world = world_with_slab(&tuning, PlatformKind::Breakable, 300.0);
        world.platforms[0].break_apart(1);
        world.player.pos = DVec2::new(20.0, 100.0);
        run(&mut world, &tuning, &TickInput::default());
        assert!(world.platforms.iter().all(|p| !p.is_spent()));
        assert!(world.platforms.iter().all(|p| p.pos.y != 306.0));
    }

    #[test]
    fn combo_lapses_after_decay_window() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.platforms.clear();
        world.player.pos = DVec2::new(200.0, 200.0);
        world.player.vel.y = -20.0;
        world.combo = 4;
        world.combo_timer = 2;
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.combo, 4);
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.combo, 0);
    }

    #[test]
    fn combo_cue_thresholds() {
        let tuning = Tuning::default();
        let mut world = world_with_slab(&tuning, PlatformKind::Normal, 300.0);
        world.combo = 3;
        world.player.pos = DVec2::new(200.0, 299.0 - tuning.player_radius);
        world.player.vel = DVec2::new(0.0, 3.0);
        let events = run(&mut world, &tuning, &TickInput::default());
        assert_eq!(events, vec![GameEvent::Jump, GameEvent::Combo(4)]);
    }

    #[test]
    fn pointer_pulls_player_sideways() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        let x0 = world.player.pos.x;
        run(&mut world, &tuning, &TickInput { target_x: Some(x0 + 100.0) });
        let expected_vx = 100.0 * tuning.move_accel * tuning.friction_air;
        assert!((world.player.vel.x - expected_vx).abs() < 1e-9);
        assert!(world.player.pos.x > x0);
    }

    #[test]
    fn released_pointer_decays_velocity() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.player.vel.x = 10.0;
        run(&mut world, &tuning, &TickInput::default());
        assert!((world.player.vel.x - 10.0 * tuning.friction_air).abs() < 1e-12);
    }

    #[test]
    fn fall_speed_is_capped() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.platforms.clear();
        world.player.pos = DVec2::new(200.0, 0.0);
        world.player.vel.y = 12.9;
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.player.vel.y, tuning.max_fall_speed);
    }

    #[test]
    fn moving_platform_reflects_at_edge() {
        let tuning = Tuning::default();
        let mut world = world_with_slab(&tuning, PlatformKind::Moving, -100.0);
        world.platforms[0].pos.x = 32.5;
        world.platforms[0].vx = -1.2;
        world.player.pos = DVec2::new(300.0, 200.0);
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.platforms[0].vx, 1.2);
    }

    #[test]
    fn camera_follows_upward_only() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.player.pos = DVec2::new(200.0, 100.0);
        world.player.vel.y = -10.0;
        run(&mut world, &tuning, &TickInput::default());
        let target = world.target_camera_y;
        assert!((target - (world.player.pos.y - tuning.scroll_line)).abs() < 1e-9);
        assert!(world.camera_y < 0.0 && world.camera_y > target);

        // Falling back down leaves the target alone
        world.player.vel.y = 10.0;
        world.player.pos.y += 200.0;
        run(&mut world, &tuning, &TickInput::default());
        assert_eq!(world.target_camera_y, target);
    }

    #[test]
    fn milestones_fire_once_in_order() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.platforms.clear();
        world.player.pos = DVec2::new(200.0, -10_000.0);
        world.player.vel.y = -5.0;
        // One camera step carries altitude past three thresholds at once
        world.camera_y = -4_200.0;
        world.target_camera_y = -4_200.0;
        let events = run(&mut world, &tuning, &TickInput::default());
        let milestones: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Milestone(m) => Some(*m),
                _ => None,
            })
            .collect();
        assert_eq!(milestones, vec![500, 1000, 2000]);
        assert_eq!(world.level_text, "2000m!");
        assert_eq!(world.level_text_life, tuning.banner_frames - 1);

        let again = run(&mut world, &tuning, &TickInput::default());
        assert!(!again.iter().any(|e| matches!(e, GameEvent::Milestone(_))));
    }

    #[test]
    fn falling_off_screen_ends_the_run() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.platforms.clear();
        world.best_score = 3;
        world.score = 7;
        world.player.pos = DVec2::new(200.0, tuning.canvas_height + tuning.game_over_margin);
        world.player.vel.y = 1.0;

        let events = run(&mut world, &tuning, &TickInput::default());

        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.shake, tuning.game_over_shake);
        assert_eq!(world.best_score, 7);
        assert!(events.contains(&GameEvent::NewBest(7)));
        assert!(matches!(events.last(), Some(GameEvent::NewBest(7))));
    }

    #[test]
    fn game_over_without_record_skips_write() {
        let tuning = Tuning::default();
        let mut world = playing_world(&tuning);
        world.platforms.clear();
        world.best_score = 50;
        world.score = 7;
        world.player.pos = DVec2::new(200.0, tuning.canvas_height + tuning.game_over_margin);
        world.player.vel.y = 1.0;

        let events = run(&mut world, &tuning, &TickInput::default());

        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.best_score, 50);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBest(_))));
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = World::new_run(&tuning, &mut seeded(99), 0);
        let mut b = World::new_run(&tuning, &mut seeded(99), 0);
        let mut rng_a = seeded(5);
        let mut rng_b = seeded(5);
        let mut events = Vec::new();
        for i in 0..600 {
            let input = TickInput {
                target_x: (i % 90 < 45).then_some(120.0 + (i % 7) as f64 * 20.0),
            };
            tick(&mut a, &input, &tuning, &mut rng_a, &mut events);
            tick(&mut b, &input, &tuning, &mut rng_b, &mut events);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.score, b.score);
    }
}
