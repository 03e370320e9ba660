//! Round lifecycle and the host-facing surface
//!
//! [`Game`] owns the simulation and gates it with the coarse phase machine:
//! `NotStarted → Playing → {Victory, Defeat}`, with restarts going back to
//! `Playing` through a full reset. Hosts forward key events, call
//! [`Game::update`] once per frame with the clock, and read a [`Snapshot`]
//! to draw.

use serde::Serialize;

use crate::sim::{
    self, ActiveEffect, Ball, Brick, GameEvent, GamePhase, GameState, Paddle, PowerUp,
};
use crate::tuning::Tuning;

pub use crate::sim::RoundSummary;

/// Discrete input from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeftStart,
    MoveLeftEnd,
    MoveRightStart,
    MoveRightEnd,
    StartRequested,
    RestartRequested,
}

/// Read-only view of a frame for rendering
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub bricks: &'a [Brick],
    pub power_ups: &'a [PowerUp],
    pub score: u64,
    pub lives: u8,
    pub elapsed_seconds: u64,
    pub active_effect: Option<ActiveEffect>,
}

/// A game session
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
}

impl Game {
    /// Tuning is taken as-is; run it through [`Tuning::validate`] first
    /// (`Tuning::from_json` and `Tuning::load_from_path` already do).
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::new(tuning, seed),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Replace both movement flags at once
    pub fn set_paddle_input(&mut self, left: bool, right: bool) {
        self.state.paddle.moving_left = left;
        self.state.paddle.moving_right = right;
    }

    /// Leave the start screen. Ignored once a round has been played.
    pub fn request_start(&mut self, now_ms: f64) -> bool {
        if self.state.phase != GamePhase::NotStarted {
            return false;
        }
        self.state.start_round(now_ms);
        true
    }

    /// Play again after a victory or defeat. Ignored mid-round.
    pub fn request_restart(&mut self, now_ms: f64) -> bool {
        if !self.state.phase.is_terminal() {
            return false;
        }
        self.state.start_round(now_ms);
        true
    }

    /// Route a host input event. Returns true if a round was (re)started.
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) -> bool {
        match event {
            InputEvent::MoveLeftStart => self.state.paddle.moving_left = true,
            InputEvent::MoveLeftEnd => self.state.paddle.moving_left = false,
            InputEvent::MoveRightStart => self.state.paddle.moving_right = true,
            InputEvent::MoveRightEnd => self.state.paddle.moving_right = false,
            InputEvent::StartRequested => return self.request_start(now_ms),
            InputEvent::RestartRequested => return self.request_restart(now_ms),
        }
        false
    }

    /// Run one frame and hand back everything that happened since the last
    /// call (including start/end events raised by input)
    pub fn update(&mut self, now_ms: f64) -> Vec<GameEvent> {
        sim::tick(&mut self.state, now_ms);
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let state = &self.state;
        Snapshot {
            phase: state.phase,
            paddle: &state.paddle,
            balls: &state.balls,
            bricks: &state.grid.bricks,
            power_ups: &state.power_ups,
            score: state.score,
            lives: state.lives,
            elapsed_seconds: state.elapsed_seconds(),
            active_effect: state.active_effect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    fn game() -> Game {
        Game::new(Tuning::default(), 3)
    }

    #[test]
    fn test_start_only_from_start_screen() {
        let mut game = game();
        assert!(!game.request_restart(0.0));
        assert!(game.request_start(0.0));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(!game.request_start(10.0));
        assert!(!game.request_restart(10.0));
        assert_eq!(game.update(16.0).first(), Some(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_input_events_drive_paddle_flags() {
        let mut game = game();
        game.handle_input(InputEvent::MoveLeftStart, 0.0);
        assert!(game.state().paddle.moving_left);
        game.handle_input(InputEvent::MoveRightStart, 0.0);
        game.handle_input(InputEvent::MoveLeftEnd, 0.0);
        assert!(!game.state().paddle.moving_left);
        assert!(game.state().paddle.moving_right);
        game.set_paddle_input(false, false);
        assert!(!game.state().paddle.moving_right);
    }

    #[test]
    fn test_restart_after_defeat_fully_resets() {
        let mut game = game();
        assert!(game.handle_input(InputEvent::StartRequested, 0.0));
        game.update(16.0);

        game.state.score = 900;
        game.state.ball_speed = 7.0;
        game.state.grid.bricks[0].destroyed = true;
        game.state.activate_power_up(PowerUpKind::Piercing, 16.0);
        game.state.lives = 1;
        game.state.balls.clear();
        game.state.lose_life();
        assert_eq!(game.phase(), GamePhase::Defeat);
        assert!(game.state().active_effect().is_none());

        let events = game.update(32.0);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::RoundEnded(RoundSummary { victory: false, final_score: 900, .. })
        )));
        // Frozen until restart
        assert!(game.update(48.0).is_empty());

        assert!(game.handle_input(InputEvent::RestartRequested, 1_000.0));
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.ball_speed, 3.0);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.grid.remaining(), 18 * 21);
        assert_eq!(state.round_start_ms, 1_000.0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = game();
        game.request_start(0.0);
        game.update(2_500.0);
        let snap = game.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.elapsed_seconds, 2);
        assert_eq!(snap.bricks.len(), 18 * 21);
        assert_eq!(snap.lives, 3);
        assert!(snap.active_effect.is_none());

        let json = serde_json::to_value(&snap).expect("snapshot serializes");
        assert_eq!(json["score"], 0);
        assert_eq!(json["phase"], "Playing");
    }

    #[test]
    fn test_same_seed_same_round() {
        let mut a = Game::new(Tuning::default(), 99);
        let mut b = Game::new(Tuning::default(), 99);
        a.request_start(0.0);
        b.request_start(0.0);
        for frame in 1..600 {
            let now = frame as f64 * 16.0;
            a.set_paddle_input(frame % 90 < 45, frame % 90 >= 45);
            b.set_paddle_input(frame % 90 < 45, frame % 90 >= 45);
            assert_eq!(a.update(now), b.update(now));
        }
        assert_eq!(a.state().score, b.state().score);
        assert_eq!(a.state().balls.len(), b.state().balls.len());
        assert_eq!(a.state().paddle.x, b.state().paddle.x);
    }
}
