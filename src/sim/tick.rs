//! Per-frame simulation tick
//!
//! The host calls [`tick`] once per frame with a monotonic clock reading.
//! Motion is per tick (velocities are pixels per tick); only timers look at
//! the clock, which keeps replays deterministic for a given `now` sequence.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    WallContact, ball_overlaps_rect, ball_rect_overlap, ball_touches_rect, bounce_off_walls,
    paddle_bounce_angle, reflect,
};
use super::state::{GameEvent, GamePhase, GameState, PowerUp, PowerUpKind};
use crate::consts::PADDLE_BOUNCE_ANGLE;

/// Advance the game by one frame.
///
/// Order: timers and speed ramp, power-up drop, pickup motion, paddle,
/// balls and walls, paddle bounce, bricks, victory, effect expiry. Losing
/// the last ball ends the tick early.
pub fn tick(state: &mut GameState, now_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    update_timer(state, now_ms);
    maybe_spawn_power_up(state);
    update_power_ups(state, now_ms);
    state.paddle.step(state.tuning.field_width);

    if !move_balls(state) {
        state.lose_life();
        return;
    }

    paddle_collisions(state);
    brick_collisions(state);

    if state.grid.is_cleared() {
        state.end_round(true);
        return;
    }

    state.expire_power_up(now_ms);
}

/// Track elapsed time and apply any speed ramp steps that came due
fn update_timer(state: &mut GameState, now_ms: f64) {
    state.elapsed_ms = (now_ms - state.round_start_ms).max(0.0);

    let intervals = (state.elapsed_ms / state.tuning.ball_speed_interval_ms).floor() as u32;
    if intervals > state.completed_speed_intervals {
        let steps = intervals - state.completed_speed_intervals;
        state.increase_ball_speed(steps as f32 * state.tuning.ball_speed_increment);
        state.completed_speed_intervals = intervals;
    }
}

fn maybe_spawn_power_up(state: &mut GameState) {
    if state.elapsed_ms - state.last_power_up_drop_ms < state.tuning.power_up_drop_interval_ms {
        return;
    }

    let kind = PowerUpKind::random(&mut state.rng);
    let size = state.tuning.power_up_size;
    let x = state.rng.random::<f32>() * (state.tuning.field_width - size);
    state.power_ups.push(PowerUp {
        kind,
        pos: Vec2::new(x, state.tuning.bricks.top_offset),
        fall_speed: state.tuning.power_up_fall_speed,
        size,
    });
    state.last_power_up_drop_ms = state.elapsed_ms;
    state.events.push(GameEvent::PowerUpSpawned(kind));
}

/// Drop pickups, discard ones that left the field, activate caught ones
fn update_power_ups(state: &mut GameState, now_ms: f64) {
    let field_height = state.tuning.field_height;
    let paddle = state.paddle.rect();
    let mut caught = Vec::new();

    state.power_ups.retain_mut(|power_up| {
        power_up.pos.y += power_up.fall_speed;
        if power_up.pos.y > field_height {
            return false;
        }
        if power_up.rect().touches(&paddle) {
            caught.push(power_up.kind);
            return false;
        }
        true
    });

    for kind in caught {
        state.activate_power_up(kind, now_ms);
    }
}

/// Move every ball and bounce it off the walls. Returns false when no ball
/// is left in play.
fn move_balls(state: &mut GameState) -> bool {
    let (width, height) = (state.tuning.field_width, state.tuning.field_height);

    state.balls.retain_mut(|ball| {
        ball.pos += ball.vel;
        let contact = bounce_off_walls(&mut ball.pos, &mut ball.vel, ball.radius, width, height);
        contact == WallContact::InPlay
    });

    !state.balls.is_empty()
}

/// Send descending balls that touch the paddle back up, angled by where they
/// struck
fn paddle_collisions(state: &mut GameState) {
    let paddle = state.paddle.rect();

    for ball in &mut state.balls {
        if ball.vel.y <= 0.0 || !ball_touches_rect(ball.pos, ball.radius, &paddle) {
            continue;
        }

        let angle = paddle_bounce_angle(ball.pos.x, &paddle, PADDLE_BOUNCE_ANGLE);
        ball.vel = Vec2::new(ball.speed * angle.sin(), -ball.speed * angle.cos());
        ball.pos.y = paddle.y - ball.radius - 1.0;
        state.events.push(GameEvent::PaddleHit);
    }
}

/// Destroy bricks the balls overlap.
///
/// A normal ball breaks at most one brick per tick (the first in storage
/// order) and rebounds off the axis of least overlap. A piercing ball breaks
/// everything it overlaps and keeps its heading.
fn brick_collisions(state: &mut GameState) {
    let piercing = state.effects.piercing;
    let points = state.tuning.brick_score;

    for ball in &mut state.balls {
        for (index, brick) in state.grid.bricks.iter_mut().enumerate() {
            if brick.destroyed || !ball_overlaps_rect(ball.pos, ball.radius, &brick.rect) {
                continue;
            }

            brick.destroyed = true;
            state.score += points;
            state.events.push(GameEvent::BrickDestroyed {
                index,
                score: state.score,
            });

            if !piercing {
                let axis = ball_rect_overlap(ball.pos, ball.radius, &brick.rect).least_axis();
                ball.vel = reflect(ball.vel, axis);
                ball.normalize_velocity();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::grid::{Brick, BrickGrid, BrickStatus};
    use crate::sim::state::Ball;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Playing state with the wall pushed out of the way
    fn open_field() -> GameState {
        let mut state = GameState::new(Tuning::default(), 42);
        state.start_round(0.0);
        // One brick tucked in the top-left corner so the round can't be won
        // by accident
        state.grid = grid_of(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        state.drain_events();
        state
    }

    fn grid_of(rects: Vec<Rect>) -> BrickGrid {
        let columns = rects.len() as u32;
        BrickGrid {
            rows: 1,
            columns,
            bricks: rects
                .into_iter()
                .enumerate()
                .map(|(i, rect)| Brick {
                    row: 0,
                    col: i as u32,
                    rect,
                    status: BrickStatus::Above,
                    destroyed: false,
                })
                .collect(),
        }
    }

    fn ball(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::new(dx, dy),
            speed: Vec2::new(dx, dy).length(),
            radius: 8.0,
        }
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let mut state = GameState::new(Tuning::default(), 1);
        let before = state.balls[0].pos;
        tick(&mut state, 1_000.0);
        assert_eq!(state.balls[0].pos, before);
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_ball_moves_by_velocity() {
        let mut state = open_field();
        state.balls = vec![ball(500.0, 400.0, 3.0, 0.0)];
        tick(&mut state, 16.0);
        assert_eq!(state.balls[0].pos, Vec2::new(503.0, 400.0));
    }

    #[test]
    fn test_dead_center_paddle_hit_goes_straight_up() {
        let mut state = open_field();
        let center = state.paddle.center_x();
        let paddle_y = state.paddle.y;
        state.balls = vec![ball(center, paddle_y - 9.0, 0.0, 3.0)];

        tick(&mut state, 16.0);
        let b = &state.balls[0];
        assert!(b.vel.x.abs() < 1e-5);
        assert!((b.vel.y + 3.0).abs() < 1e-5);
        assert_eq!(b.pos.y, paddle_y - 8.0 - 1.0);
        assert!(state.drain_events().contains(&GameEvent::PaddleHit));
    }

    #[test]
    fn test_edge_paddle_hit_deflects_sixty_degrees() {
        let mut state = open_field();
        let right_edge = state.paddle.x + state.paddle.width;
        let paddle_y = state.paddle.y;
        state.balls = vec![ball(right_edge + 2.0, paddle_y - 9.0, 0.0, 3.0)];

        tick(&mut state, 16.0);
        let b = &state.balls[0];
        let angle_from_vertical = b.vel.x.atan2(-b.vel.y);
        assert!((angle_from_vertical - std::f32::consts::FRAC_PI_3).abs() < 1e-5);
        assert!((b.vel.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rising_ball_ignores_paddle() {
        let mut state = open_field();
        let center = state.paddle.center_x();
        let paddle_y = state.paddle.y;
        state.balls = vec![ball(center, paddle_y + 4.0, 1.0, -3.0)];
        tick(&mut state, 16.0);
        assert_eq!(state.balls[0].vel, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn test_brick_hit_scores_and_rebounds() {
        let mut state = open_field();
        state.grid = grid_of(vec![
            Rect::new(480.0, 300.0, 40.0, 24.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        ]);
        // Rising into the brick's underside
        state.balls = vec![ball(500.0, 334.0, 0.0, -3.0)];

        tick(&mut state, 16.0);
        assert!(state.grid.bricks[0].destroyed);
        assert_eq!(state.score, 50);
        assert_eq!(state.balls[0].vel, Vec2::new(0.0, 3.0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_normal_ball_breaks_one_brick_per_tick() {
        let mut state = open_field();
        state.grid = grid_of(vec![
            Rect::new(480.0, 300.0, 40.0, 24.0),
            Rect::new(490.0, 300.0, 40.0, 24.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        ]);
        state.balls = vec![ball(505.0, 334.0, 0.0, -3.0)];

        tick(&mut state, 16.0);
        assert!(state.grid.bricks[0].destroyed);
        assert!(!state.grid.bricks[1].destroyed);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_piercing_ball_breaks_everything_it_overlaps() {
        let mut state = open_field();
        state.grid = grid_of(vec![
            Rect::new(480.0, 300.0, 40.0, 24.0),
            Rect::new(490.0, 305.0, 40.0, 24.0),
            Rect::new(500.0, 310.0, 40.0, 24.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        ]);
        state.activate_power_up(PowerUpKind::Piercing, 0.0);
        state.balls = vec![ball(505.0, 321.0, 1.0, -3.0)];

        tick(&mut state, 16.0);
        assert!(state.grid.bricks[..3].iter().all(|b| b.destroyed));
        assert!(!state.grid.bricks[3].destroyed);
        assert_eq!(state.score, 150);
        assert_eq!(state.balls[0].vel, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn test_clearing_the_wall_is_victory_once() {
        let mut state = open_field();
        state.grid = grid_of(vec![Rect::new(480.0, 300.0, 40.0, 24.0)]);
        state.balls = vec![ball(500.0, 334.0, 0.0, -3.0)];

        tick(&mut state, 16.0);
        tick(&mut state, 32.0);
        assert_eq!(state.phase, GamePhase::Victory);
        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded(s) if s.victory))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_losing_last_ball_with_one_life_is_defeat() {
        let mut state = open_field();
        state.lives = 1;
        let floor = state.tuning.field_height;
        state.balls = vec![ball(100.0, floor - 9.0, 0.0, 3.0), ball(900.0, floor - 8.5, 1.0, 3.0)];

        tick(&mut state, 16.0);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Defeat);
    }

    #[test]
    fn test_life_loss_skips_collisions_for_the_rest_of_the_tick() {
        let mut state = open_field();
        let center = state.paddle.center_x();
        let paddle_y = state.paddle.y;
        // Sits right where the replacement ball is served
        state.grid = grid_of(vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(center - 20.0, paddle_y - 20.0, 40.0, 12.0),
        ]);
        let floor = state.tuning.field_height;
        state.balls = vec![ball(100.0, floor - 9.0, 0.0, 3.0)];

        tick(&mut state, 16.0);
        assert_eq!(state.lives, 2);
        assert_eq!(state.balls.len(), 1);
        assert!(ball_overlaps_rect(
            state.balls[0].pos,
            state.balls[0].radius,
            &state.grid.bricks[1].rect
        ));
        assert!(!state.grid.bricks[1].destroyed);
        assert_eq!(state.score, 0);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
        );
    }

    #[test]
    fn test_losing_one_of_several_balls_keeps_life() {
        let mut state = open_field();
        let floor = state.tuning.field_height;
        state.balls = vec![ball(100.0, floor - 9.0, 0.0, 3.0), ball(500.0, 400.0, 0.0, -3.0)];

        tick(&mut state, 16.0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_life_loss_clears_power_ups_and_respawns() {
        let mut state = open_field();
        state.activate_power_up(PowerUpKind::BigBall, 0.0);
        state.power_ups.push(PowerUp {
            kind: PowerUpKind::Piercing,
            pos: Vec2::new(10.0, 100.0),
            fall_speed: 3.0,
            size: 24.0,
        });
        let floor = state.tuning.field_height;
        state.balls = vec![ball(100.0, floor - 9.0, 0.0, 3.0)];

        tick(&mut state, 16.0);
        assert_eq!(state.lives, 2);
        assert!(state.power_ups.is_empty());
        assert!(state.active_effect().is_none());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].radius, 8.0);
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn test_speed_ramps_every_interval() {
        let mut state = open_field();
        state.balls = vec![ball(500.0, 400.0, 3.0, 0.0)];

        tick(&mut state, 14_999.0);
        assert_eq!(state.ball_speed, 3.0);
        tick(&mut state, 15_000.0);
        assert_eq!(state.ball_speed, 4.0);
        // Two intervals at once (e.g. after a stall)
        tick(&mut state, 45_500.0);
        assert_eq!(state.ball_speed, 6.0);
        assert_eq!(state.completed_speed_intervals, 3);
        assert!((state.balls[0].vel.length() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_power_up_drops_every_interval() {
        let mut state = open_field();
        state.balls = vec![ball(500.0, 400.0, 3.0, 0.0)];

        tick(&mut state, 19_999.0);
        assert!(state.power_ups.is_empty());
        tick(&mut state, 20_000.0);
        assert_eq!(state.power_ups.len(), 1);
        let p = &state.power_ups[0];
        // Spawned at the wall's top offset, then fell one step this tick
        assert_eq!(p.pos.y, 60.0 + 3.0);
        assert!(p.pos.x >= 0.0 && p.pos.x < 1080.0 - 24.0);
        assert_eq!(state.last_power_up_drop_ms, 20_000.0);
    }

    #[test]
    fn test_paddle_catches_power_up() {
        let mut state = open_field();
        state.balls = vec![ball(500.0, 400.0, 3.0, 0.0)];
        let paddle = state.paddle.rect();
        state.power_ups.push(PowerUp {
            kind: PowerUpKind::BigBall,
            pos: Vec2::new(paddle.center_x(), paddle.y - 25.0),
            fall_speed: 3.0,
            size: 24.0,
        });

        tick(&mut state, 16.0);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.active_effect().unwrap().kind, PowerUpKind::BigBall);
        assert_eq!(state.balls[0].radius, 14.0);
    }

    #[test]
    fn test_missed_power_up_falls_away() {
        let mut state = open_field();
        state.balls = vec![ball(500.0, 400.0, 3.0, 0.0)];
        let floor = state.tuning.field_height;
        state.power_ups.push(PowerUp {
            kind: PowerUpKind::Piercing,
            pos: Vec2::new(5.0, floor - 1.0),
            fall_speed: 3.0,
            size: 24.0,
        });
        tick(&mut state, 16.0);
        assert!(state.power_ups.is_empty());
        assert!(state.active_effect().is_none());
    }

    #[test]
    fn test_effect_expires_during_tick() {
        let mut state = open_field();
        state.balls = vec![ball(500.0, 400.0, 3.0, 0.0)];
        state.activate_power_up(PowerUpKind::Piercing, 0.0);
        tick(&mut state, 4_999.0);
        assert!(state.effects.piercing);
        tick(&mut state, 5_000.0);
        assert!(!state.effects.piercing);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_field(moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..300)) {
            let mut state = open_field();
            for (i, (left, right)) in moves.into_iter().enumerate() {
                state.paddle.moving_left = left;
                state.paddle.moving_right = right;
                tick(&mut state, i as f64 * 16.0);
                let max_x = state.tuning.field_width - state.paddle.width;
                prop_assert!(state.paddle.x >= 0.0 && state.paddle.x <= max_x);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_balls_keep_current_speed(seed in any::<u64>(), frames in 1usize..1500) {
            let mut state = GameState::new(Tuning::default(), seed);
            state.start_round(0.0);
            for frame in 0..frames {
                // Track the lowest ball so rounds run long enough to matter
                if let Some(target) = state.balls.iter().map(|b| b.pos).max_by(|a, b| a.y.total_cmp(&b.y)) {
                    state.paddle.moving_left = target.x < state.paddle.center_x() - 10.0;
                    state.paddle.moving_right = target.x > state.paddle.center_x() + 10.0;
                }
                tick(&mut state, frame as f64 * 50.0);
                if state.phase != GamePhase::Playing {
                    break;
                }
                for ball in &state.balls {
                    prop_assert!((ball.vel.length() - state.ball_speed).abs() < 1e-3);
                    prop_assert!(ball.pos.x - ball.radius >= 0.0);
                    prop_assert!(ball.pos.x + ball.radius <= state.tuning.field_width);
                }
            }
        }
    }
}
