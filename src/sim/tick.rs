//! Simulation tick
//!
//! Advances the playfield by one step: paddle, falling power-ups, balls and
//! their collisions, then the level-clear and life-loss checks, then
//! particles. Speeds are in units per tick, so the step is frame-locked.

use glam::Vec2;
use rand::Rng;

use super::collision::{Aabb, contact_offset, paddle_bounce, reflect, reflect_axis};
use super::state::{
    BrickKind, GameEvent, GamePhase, GameState, HitKind, MULTIBALL_COLORS, PowerUp, PowerUpKind,
};
use crate::consts::*;
use crate::{launch_speed, max_ball_speed};

/// Held inputs and one-shot actions for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move-left is held (keyboard or touch)
    pub move_left: bool,
    /// Move-right is held
    pub move_right: bool,
    /// Launch docked balls (space/tap)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Terminal condition observed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickOutcome {
    #[default]
    Continue,
    /// No breakable brick has health left
    LevelCleared,
    /// Every ball fell out, a life was spent and a new ball docked
    LifeLost,
    /// Every ball fell out on the last life; phase is now `Dying`
    PlayerDied,
}

/// What happened during a tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
}

/// Advance the game state by one tick
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, rng: &mut R) -> TickReport {
    let mut report = TickReport::default();

    match state.phase {
        GamePhase::Playing => {
            move_paddle(state, input);
            update_power_ups(state, &mut report.events);
            let active = update_balls(state, rng, &mut report.events);

            if state.remaining_bricks() == 0 {
                report.outcome = TickOutcome::LevelCleared;
                return report;
            }

            if active == 0 {
                if state.lives > 1 {
                    state.lives -= 1;
                    state.reset_ball();
                    report.events.push(GameEvent::LifeLost);
                    report.outcome = TickOutcome::LifeLost;
                } else {
                    state.lives = 0;
                    state.phase = GamePhase::Dying;
                    report.events.push(GameEvent::GameOverTriggered);
                    spawn_death_burst(state, rng);
                    report.outcome = TickOutcome::PlayerDied;
                    return report;
                }
            }

            update_particles(state);
        }
        // Paddle, balls and bricks are frozen while the death sequence plays
        GamePhase::Dying => update_particles(state),
        _ => {}
    }

    report
}

/// Send every docked ball off. Returns true if any ball was launched.
pub fn launch<R: Rng>(state: &mut GameState, rng: &mut R) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }

    let speed = launch_speed(state.level);
    let mut launched = false;
    for ball in state.balls.iter_mut().filter(|b| b.active && b.is_docked()) {
        let dx = rng.random::<f32>() * 4.0 - 2.0;
        ball.vel = Vec2::new(dx, -speed);
        launched = true;
    }
    launched
}

/// Apply a collected power-up. Out-of-range results are clamped.
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    let paddle = &mut state.paddle;
    match kind {
        PowerUpKind::Expand => paddle.set_width(paddle.width + EXPAND_AMOUNT),
        PowerUpKind::Shrink => paddle.set_width(paddle.width - SHRINK_AMOUNT),
        PowerUpKind::ExtraLife => state.lives += 1,
        PowerUpKind::SpeedUp => paddle.set_speed(paddle.speed + SPEED_UP_AMOUNT),
        PowerUpKind::MultiBall => spawn_multiball(state),
    }
}

/// Split two extra balls off an active ball (or the first ball if none are active)
pub fn spawn_multiball(state: &mut GameState) {
    let Some(donor) = state
        .balls
        .iter()
        .find(|b| b.active)
        .or_else(|| state.balls.first())
        .cloned()
    else {
        return;
    };

    // A near-stationary donor would hand out balls that crawl sideways
    let mut dy = donor.vel.y;
    if dy.abs() < 1.0 {
        dy = -launch_speed(state.level);
    }

    for (sign, color) in [(1.0, MULTIBALL_COLORS[0]), (-1.0, MULTIBALL_COLORS[1])] {
        let mut ball = donor.clone();
        ball.id = state.next_entity_id();
        ball.vel = Vec2::new(donor.vel.x + sign * MULTIBALL_SPREAD, dy);
        ball.color = color;
        ball.active = true;
        ball.trail.clear();
        state.balls.push(ball);
    }
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let paddle = &mut state.paddle;
    if input.move_left {
        paddle.shift(-paddle.speed);
    }
    if input.move_right {
        paddle.shift(paddle.speed);
    }

    for ball in state.balls.iter_mut().filter(|b| b.active && b.is_docked()) {
        ball.follow(&state.paddle);
    }
}

fn update_power_ups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let paddle_box = Aabb::from_pos_size(state.paddle.pos, state.paddle.size());

    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.power_ups.retain_mut(|power_up| {
        power_up.pos.y += power_up.fall_speed;
        if Aabb::from_pos_size(power_up.pos, power_up.size).overlaps(&paddle_box) {
            collected.push(power_up.kind);
            false
        } else {
            power_up.pos.y <= PLAYFIELD_HEIGHT
        }
    });

    for kind in collected {
        log::debug!("Power-up collected: {:?}", kind);
        apply_power_up(state, kind);
        events.push(GameEvent::PowerUpCollected(kind));
    }
}

/// Move and collide every live ball. Returns how many balls are still in play.
fn update_balls<R: Rng>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) -> usize {
    let max_speed = max_ball_speed(state.level);
    let paddle = state.paddle.clone();
    let paddle_box = Aabb::from_pos_size(paddle.pos, paddle.size());

    // Deferred so the ball loop only borrows balls and bricks
    let mut bursts: Vec<(Vec2, u32)> = Vec::new();
    let mut drops: Vec<Vec2> = Vec::new();
    let mut active = 0;

    for ball in state.balls.iter_mut().filter(|b| b.active) {
        if ball.is_docked() {
            ball.follow(&paddle);
            active += 1;
            continue;
        }

        ball.record_trail();
        ball.pos += ball.vel;

        // --- WALLS ---
        if ball.pos.x + ball.radius > PLAYFIELD_WIDTH {
            ball.pos.x = PLAYFIELD_WIDTH - ball.radius;
            ball.vel.x = -ball.vel.x;
            events.push(GameEvent::Hit(HitKind::Wall));
        }
        if ball.pos.x - ball.radius < 0.0 {
            ball.pos.x = ball.radius;
            ball.vel.x = -ball.vel.x;
            events.push(GameEvent::Hit(HitKind::Wall));
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.vel.y = -ball.vel.y;
            events.push(GameEvent::Hit(HitKind::Wall));
        }

        if ball.vel.y.abs() < MIN_VERTICAL_SPEED {
            ball.vel.y = if ball.vel.y >= 0.0 { 1.0 } else { -1.0 };
        }

        if ball.pos.y - ball.radius > PLAYFIELD_HEIGHT {
            ball.active = false;
            continue;
        }
        active += 1;

        // --- PADDLE ---
        if Aabb::around(ball.pos, ball.radius).overlaps(&paddle_box) {
            let offset = contact_offset(ball.pos.x, paddle.center_x(), paddle.width);
            ball.vel = paddle_bounce(ball.vel, offset, PADDLE_BOOST, max_speed);
            // Sit on the surface so the next tick doesn't hit again
            ball.pos.y = paddle.pos.y - ball.radius;
            events.push(GameEvent::Hit(HitKind::Paddle));
        }

        // --- BRICKS (first overlap wins) ---
        let ball_box = Aabb::around(ball.pos, ball.radius);
        let hit = state.bricks.iter_mut().find(|brick| {
            brick.is_live() && ball_box.overlaps(&Aabb::from_pos_size(brick.pos, brick.size))
        });
        if let Some(brick) = hit {
            let brick_box = Aabb::from_pos_size(brick.pos, brick.size);
            ball.vel = reflect(ball.vel, reflect_axis(&ball_box, &brick_box));
            events.push(GameEvent::Hit(HitKind::Brick));

            if brick.kind != BrickKind::Unbreakable {
                let cleared = brick.damage();
                bursts.push((brick.center(), brick.color));
                if cleared {
                    state.score += brick.value;
                    if rng.random::<f32>() < POWER_UP_DROP_CHANCE {
                        drops.push(brick.center());
                    }
                }
            }
        }
    }

    for (at, color) in bursts {
        state.spawn_particles(at, color, rng);
    }
    for center in drops {
        let kind = PowerUpKind::from_roll(rng.random());
        let id = state.next_entity_id();
        let pos = center - Vec2::splat(POWER_UP_SIZE / 2.0);
        state.power_ups.push(PowerUp::new(id, kind, pos));
    }

    active
}

/// The paddle blows apart when the last ball is lost
fn spawn_death_burst<R: Rng>(state: &mut GameState, rng: &mut R) {
    let center = state.paddle.center();
    let pieces = [
        (0.0, 0xec4899),
        (0.0, 0xfbcfe8),
        (0.0, 0x000000),
        (20.0, 0xec4899),
        (-20.0, 0xec4899),
    ];
    for (dx, color) in pieces {
        state.spawn_particles(center + Vec2::new(dx, 0.0), color, rng);
    }
}

fn update_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, Brick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    /// Playing state with one docked ball and a single brick tucked in the top-left
    fn playing_state() -> GameState {
        let mut state = GameState::new();
        state.phase = GamePhase::Playing;
        state.bricks.push(Brick::new(
            99,
            Vec2::new(8.0, 88.0),
            Vec2::new(80.0, 30.0),
            BrickKind::Normal,
        ));
        state.reset_ball();
        state
    }

    fn free_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
        let id = state.next_entity_id();
        let mut ball = Ball::new(id);
        ball.pos = pos;
        ball.vel = vel;
        state.balls.clear();
        state.balls.push(ball);
    }

    fn count_hits(events: &[GameEvent], kind: HitKind) -> usize {
        events.iter().filter(|e| **e == GameEvent::Hit(kind)).count()
    }

    #[test]
    fn test_tick_noop_outside_play() {
        let mut state = playing_state();
        for phase in [GamePhase::Menu, GamePhase::Paused, GamePhase::LoadingLevel, GamePhase::GameOver] {
            state.phase = phase;
            let x = state.paddle.pos.x;
            let report = tick(&mut state, &TickInput { move_left: true, ..Default::default() }, &mut rng());
            assert_eq!(report.outcome, TickOutcome::Continue);
            assert!(report.events.is_empty());
            assert_eq!(state.paddle.pos.x, x);
        }
    }

    #[test]
    fn test_paddle_moves_and_docked_ball_follows() {
        let mut state = playing_state();
        let start = state.paddle.pos.x;
        tick(&mut state, &TickInput { move_left: true, ..Default::default() }, &mut rng());
        assert_eq!(state.paddle.pos.x, start - DEFAULT_PADDLE_SPEED);
        assert_eq!(state.balls[0].pos.x, state.paddle.center_x());
        assert!(state.balls[0].is_docked());

        // Both held: moves cancel out
        let x = state.paddle.pos.x;
        let both = TickInput { move_left: true, move_right: true, ..Default::default() };
        tick(&mut state, &both, &mut rng());
        assert_eq!(state.paddle.pos.x, x);
    }

    #[test]
    fn test_paddle_clamped_to_playfield() {
        let mut state = playing_state();
        let right = TickInput { move_right: true, ..Default::default() };
        for _ in 0..200 {
            tick(&mut state, &right, &mut rng());
        }
        assert_eq!(state.paddle.pos.x, PLAYFIELD_WIDTH - state.paddle.width);
    }

    #[test]
    fn test_launch_only_while_playing() {
        let mut state = playing_state();
        state.phase = GamePhase::Paused;
        assert!(!launch(&mut state, &mut rng()));
        assert!(state.balls[0].is_docked());

        state.phase = GamePhase::Playing;
        assert!(launch(&mut state, &mut rng()));
        let vel = state.balls[0].vel;
        assert_eq!(vel.y, -5.0);
        assert!(vel.x.abs() <= 2.0);

        // Nothing left docked
        assert!(!launch(&mut state, &mut rng()));
    }

    #[test]
    fn test_wall_bounce() {
        let mut state = playing_state();
        free_ball(&mut state, Vec2::new(795.0, 300.0), Vec2::new(4.0, -3.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        let ball = &state.balls[0];
        assert_eq!(ball.pos.x, PLAYFIELD_WIDTH - ball.radius);
        assert_eq!(ball.vel.x, -4.0);
        assert_eq!(count_hits(&report.events, HitKind::Wall), 1);

        free_ball(&mut state, Vec2::new(300.0, 12.0), Vec2::new(1.0, -5.0));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.balls[0].pos.y, 10.0);
        assert_eq!(state.balls[0].vel.y, 5.0);
    }

    #[test]
    fn test_vertical_speed_floor() {
        let mut state = playing_state();
        free_ball(&mut state, Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.1));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.balls[0].vel.y, 1.0);

        free_ball(&mut state, Vec2::new(400.0, 300.0), Vec2::new(5.0, -0.1));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.balls[0].vel.y, -1.0);

        free_ball(&mut state, Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.balls[0].vel.y, 1.0);
    }

    #[test]
    fn test_trail_recorded_while_moving() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default(), &mut rng());
        assert!(state.balls[0].trail.is_empty());

        free_ball(&mut state, Vec2::new(400.0, 300.0), Vec2::new(1.0, -3.0));
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), &mut rng());
        }
        assert_eq!(state.balls[0].trail.len(), TRAIL_LENGTH);
    }

    #[test]
    fn test_paddle_bounce_center() {
        let mut state = playing_state();
        free_ball(&mut state, Vec2::new(400.0, 548.0), Vec2::new(0.0, 5.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        let ball = &state.balls[0];
        assert!(ball.vel.x.abs() < 1e-4);
        assert!(ball.vel.y < 0.0);
        assert!((ball.speed() - 5.1).abs() < 1e-4);
        assert_eq!(ball.pos.y, state.paddle.pos.y - ball.radius);
        assert_eq!(count_hits(&report.events, HitKind::Paddle), 1);
    }

    #[test]
    fn test_paddle_bounce_edges_and_speed_cap() {
        let mut state = playing_state();
        free_ball(&mut state, Vec2::new(340.0, 548.0), Vec2::new(0.0, 9.9));
        tick(&mut state, &TickInput::default(), &mut rng());
        let left = state.balls[0].vel;

        free_ball(&mut state, Vec2::new(460.0, 548.0), Vec2::new(0.0, 9.9));
        tick(&mut state, &TickInput::default(), &mut rng());
        let right = state.balls[0].vel;

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!(left.length() <= 10.0 + 1e-4);
        assert!(right.length() <= 10.0 + 1e-4);
    }

    #[test]
    fn test_ball_hits_normal_brick_from_below() {
        let mut state = playing_state();
        state.bricks.clear();
        state.bricks.push(Brick::new(
            1,
            Vec2::new(360.0, 200.0),
            Vec2::new(80.0, 30.0),
            BrickKind::Normal,
        ));
        free_ball(&mut state, Vec2::new(400.0, 244.0), Vec2::new(0.0, -5.0));

        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.balls[0].vel, Vec2::new(0.0, 5.0));
        assert_eq!(state.bricks[0].health, 0);
        assert_eq!(state.score, 100);
        assert!(state.power_ups.len() <= 1);
        assert_eq!(state.particles.len(), PARTICLE_BURST);
        assert_eq!(count_hits(&report.events, HitKind::Brick), 1);
        // It was the only brick
        assert_eq!(report.outcome, TickOutcome::LevelCleared);
    }

    #[test]
    fn test_hard_brick_needs_two_hits() {
        let mut state = playing_state();
        state.bricks.push(Brick::new(
            1,
            Vec2::new(360.0, 200.0),
            Vec2::new(80.0, 30.0),
            BrickKind::Hard,
        ));
        free_ball(&mut state, Vec2::new(400.0, 244.0), Vec2::new(0.0, -5.0));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.bricks[1].health, 1);
        assert_eq!(state.score, 0);

        free_ball(&mut state, Vec2::new(400.0, 244.0), Vec2::new(0.0, -5.0));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.bricks[1].health, 0);
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_unbreakable_brick_reflects_without_damage() {
        let mut state = playing_state();
        state.bricks.push(Brick::new(
            1,
            Vec2::new(360.0, 200.0),
            Vec2::new(80.0, 30.0),
            BrickKind::Unbreakable,
        ));
        free_ball(&mut state, Vec2::new(400.0, 244.0), Vec2::new(0.0, -5.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.bricks[1].health, 999);
        assert_eq!(state.balls[0].vel.y, 5.0);
        assert!(state.particles.is_empty());
        assert_eq!(count_hits(&report.events, HitKind::Brick), 1);
    }

    #[test]
    fn test_only_first_overlapping_brick_resolved() {
        let mut state = playing_state();
        // Two bricks side by side, the ball straddles the seam
        for (id, x) in [(1, 320.0), (2, 400.0)] {
            state.bricks.push(Brick::new(id, Vec2::new(x, 200.0), Vec2::new(80.0, 30.0), BrickKind::Normal));
        }
        free_ball(&mut state, Vec2::new(400.0, 244.0), Vec2::new(0.0, -5.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.bricks[1].health, 0);
        assert_eq!(state.bricks[2].health, 1);
        assert_eq!(count_hits(&report.events, HitKind::Brick), 1);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_cleared_brick_is_skipped() {
        let mut state = playing_state();
        let mut ghost = Brick::new(1, Vec2::new(360.0, 200.0), Vec2::new(80.0, 30.0), BrickKind::Normal);
        ghost.health = 0;
        state.bricks.push(ghost);
        free_ball(&mut state, Vec2::new(400.0, 244.0), Vec2::new(0.0, -5.0));
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.balls[0].vel.y, -5.0);
    }

    #[test]
    fn test_life_lost_respawns_docked_ball() {
        let mut state = playing_state();
        free_ball(&mut state, Vec2::new(400.0, 608.0), Vec2::new(0.0, 5.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(report.outcome, TickOutcome::LifeLost);
        assert_eq!(state.lives, 2);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].active && state.balls[0].is_docked());
        assert!(report.events.contains(&GameEvent::LifeLost));
    }

    #[test]
    fn test_last_life_starts_dying() {
        let mut state = playing_state();
        state.lives = 1;
        free_ball(&mut state, Vec2::new(400.0, 608.0), Vec2::new(0.0, 5.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(report.outcome, TickOutcome::PlayerDied);
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(state.lives, 0);
        assert_eq!(state.particles.len(), 5 * PARTICLE_BURST);
        assert_eq!(report.events, vec![GameEvent::GameOverTriggered]);
    }

    #[test]
    fn test_dying_only_updates_particles() {
        let mut state = playing_state();
        state.lives = 1;
        free_ball(&mut state, Vec2::new(400.0, 608.0), Vec2::new(0.0, 5.0));
        tick(&mut state, &TickInput::default(), &mut rng());

        let x = state.paddle.pos.x;
        let input = TickInput { move_right: true, ..Default::default() };
        tick(&mut state, &input, &mut rng());
        assert_eq!(state.paddle.pos.x, x);
        assert!(state.particles.iter().all(|p| (p.life - 0.95).abs() < 1e-5));

        for _ in 0..20 {
            tick(&mut state, &input, &mut rng());
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_level_clear_short_circuits_life_loss() {
        let mut state = playing_state();
        state.bricks.clear();
        free_ball(&mut state, Vec2::new(400.0, 608.0), Vec2::new(0.0, 5.0));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(report.outcome, TickOutcome::LevelCleared);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_unbreakable_bricks_do_not_block_clear() {
        let mut state = playing_state();
        state.bricks.clear();
        state.bricks.push(Brick::new(1, Vec2::new(8.0, 88.0), Vec2::new(80.0, 30.0), BrickKind::Unbreakable));
        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(report.outcome, TickOutcome::LevelCleared);
    }

    #[test]
    fn test_power_up_pickup_and_miss() {
        let mut state = playing_state();
        let pos = Vec2::new(state.paddle.center_x() - 15.0, state.paddle.pos.y - 31.0);
        state.power_ups.push(PowerUp::new(50, PowerUpKind::Expand, pos));
        state.power_ups.push(PowerUp::new(51, PowerUpKind::ExtraLife, Vec2::new(10.0, 599.0)));

        let report = tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.paddle.width, PADDLE_START_WIDTH + EXPAND_AMOUNT);
        assert!(report.events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Expand)));
        // The extra life fell past the bottom without effect
        assert!(state.power_ups.is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_power_up_effects_clamped() {
        let mut state = playing_state();
        for _ in 0..10 {
            apply_power_up(&mut state, PowerUpKind::Expand);
            apply_power_up(&mut state, PowerUpKind::SpeedUp);
        }
        assert_eq!(state.paddle.width, PADDLE_MAX_WIDTH);
        assert_eq!(state.paddle.speed, PADDLE_MAX_SPEED);
        assert!(state.paddle.pos.x + state.paddle.width <= PLAYFIELD_WIDTH);

        for _ in 0..20 {
            apply_power_up(&mut state, PowerUpKind::Shrink);
        }
        assert_eq!(state.paddle.width, PADDLE_MIN_WIDTH);

        apply_power_up(&mut state, PowerUpKind::ExtraLife);
        assert_eq!(state.lives, 4);
    }

    #[test]
    fn test_multiball_spawns_two_offset_balls() {
        let mut state = playing_state();
        free_ball(&mut state, Vec2::new(400.0, 300.0), Vec2::new(1.5, -6.0));
        apply_power_up(&mut state, PowerUpKind::MultiBall);
        assert_eq!(state.active_ball_count(), 3);
        assert_eq!(state.balls[1].vel, Vec2::new(3.5, -6.0));
        assert_eq!(state.balls[2].vel, Vec2::new(-0.5, -6.0));
        assert_eq!(state.balls[1].color, MULTIBALL_COLORS[0]);
        assert_eq!(state.balls[2].color, MULTIBALL_COLORS[1]);
        assert!(state.balls[1].trail.is_empty());
        assert_ne!(state.balls[1].id, state.balls[2].id);
    }

    #[test]
    fn test_multiball_from_docked_donor_uses_launch_speed() {
        let mut state = playing_state();
        state.level = 6;
        apply_power_up(&mut state, PowerUpKind::MultiBall);
        assert_eq!(state.balls.len(), 3);
        assert_eq!(state.balls[1].vel, Vec2::new(2.0, -8.0));
        assert_eq!(state.balls[2].vel, Vec2::new(-2.0, -8.0));
        assert!(state.balls[0].is_docked());
    }

    #[test]
    fn test_multiball_without_balls_is_noop() {
        let mut state = playing_state();
        state.balls.clear();
        apply_power_up(&mut state, PowerUpKind::MultiBall);
        assert!(state.balls.is_empty());
    }
}
