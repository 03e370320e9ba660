//! Game state and core simulation types
//!
//! Everything a round needs lives on [`GameState`]; the tick and the
//! power-up state machine mutate it in place.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::effects::{ActiveEffect, EffectSlot};
use super::grid::BrickGrid;
use crate::tuning::Tuning;
use crate::{rescale_to_speed, velocity_from_angle};

/// Coarse round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start screen
    NotStarted,
    /// Active gameplay
    Playing,
    /// Every brick destroyed
    Victory,
    /// Out of lives
    Defeat,
}

impl GamePhase {
    /// Round is over and waiting for a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick
    pub speed: f32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Paddle {
    /// Centered paddle for the given tuning
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: (tuning.field_width - tuning.paddle_width) / 2.0,
            y: tuning.paddle_y(),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            speed: tuning.paddle_speed,
            moving_left: false,
            moving_right: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Back to center with no movement intent
    pub fn recenter(&mut self, field_width: f32) {
        self.x = (field_width - self.width) / 2.0;
        self.moving_left = false;
        self.moving_right = false;
    }

    /// Apply one tick of movement from the input flags, clamped to the field
    pub fn step(&mut self, field_width: f32) {
        if self.moving_left {
            self.x -= self.speed;
        }
        if self.moving_right {
            self.x += self.speed;
        }
        // A paddle wider than the field pins to the left edge
        self.x = self.x.clamp(0.0, (field_width - self.width).max(0.0));
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Magnitude of `vel`, kept in sync on every velocity change
    pub speed: f32,
    pub radius: f32,
}

impl Ball {
    /// Ball heading along `angle` at `speed`
    pub fn with_angle(pos: Vec2, angle: f32, speed: f32, radius: f32) -> Self {
        Self {
            pos,
            vel: velocity_from_angle(angle, speed),
            speed,
            radius,
        }
    }

    /// Replace the speed, keeping the direction
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.normalize_velocity();
    }

    /// Snap the velocity magnitude back onto `speed`
    pub fn normalize_velocity(&mut self) {
        self.vel = rescale_to_speed(self.vel, self.speed);
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Enlarges every ball
    BigBall,
    /// Splits the ball into three
    MultiBall,
    /// Balls plough through bricks without rebounding
    Piercing,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::BigBall,
        PowerUpKind::MultiBall,
        PowerUpKind::Piercing,
    ];

    /// Uniformly random kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per tick
    pub fall_speed: f32,
    pub size: f32,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Final numbers of a round, handed to the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub victory: bool,
    pub final_score: u64,
    pub final_elapsed_seconds: u64,
}

/// Things that happened during a tick, for audio/HUD/persistence hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    BrickDestroyed { index: usize, score: u64 },
    PaddleHit,
    SpeedIncreased { speed: f32 },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    LifeLost { lives_left: u8 },
    RoundEnded(RoundSummary),
}

/// Complete state of a game session
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// +`brick_score` per destroyed brick, never decreases within a round
    pub score: u64,
    pub lives: u8,
    /// Global ball speed baseline (pixels per tick)
    pub ball_speed: f32,
    /// Clock reading when the round started
    pub round_start_ms: f64,
    /// Elapsed round time as of the last tick
    pub elapsed_ms: f64,
    /// Speed ramp intervals already applied
    pub completed_speed_intervals: u32,
    /// Elapsed time of the last power-up drop
    pub last_power_up_drop_ms: f64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub grid: BrickGrid,
    pub power_ups: Vec<PowerUp>,
    pub effects: EffectSlot,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session on the start screen
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let paddle = Paddle::new(&tuning);
        let grid = BrickGrid::build(&tuning.bricks);
        let mut state = Self {
            phase: GamePhase::NotStarted,
            score: 0,
            lives: tuning.starting_lives,
            ball_speed: tuning.ball_start_speed,
            round_start_ms: 0.0,
            elapsed_ms: 0.0,
            completed_speed_intervals: 0,
            last_power_up_drop_ms: 0.0,
            paddle,
            balls: Vec::new(),
            grid,
            power_ups: Vec::new(),
            effects: EffectSlot::default(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            tuning,
        };

        let ball = state.serve_ball();
        state.balls.push(ball);
        state
    }

    /// Radius every ball should currently have
    pub fn ball_radius(&self) -> f32 {
        self.tuning.ball_radius * self.effects.radius_multiplier
    }

    /// Whole seconds since the round started
    pub fn elapsed_seconds(&self) -> u64 {
        (self.elapsed_ms / 1000.0).floor() as u64
    }

    pub fn active_effect(&self) -> Option<ActiveEffect> {
        self.effects.active
    }

    /// New ball resting above the paddle center, heading upward at a random
    /// angle between 30° and 90° from horizontal
    pub fn serve_ball(&mut self) -> Ball {
        use std::f32::consts::{FRAC_PI_3, FRAC_PI_6};

        let pos = Vec2::new(
            self.paddle.center_x(),
            self.paddle.y - self.tuning.ball_radius - crate::consts::BALL_SERVE_GAP,
        );
        let elevation = self.rng.random::<f32>() * FRAC_PI_3 + FRAC_PI_6;
        let direction = if self.rng.random_bool(0.5) { -1.0 } else { 1.0 };
        let vel = Vec2::new(
            self.ball_speed * elevation.cos() * direction,
            -self.ball_speed * elevation.sin(),
        );

        Ball {
            pos,
            vel,
            speed: self.ball_speed,
            radius: self.ball_radius(),
        }
    }

    /// Raise the global ball speed and carry every live ball along with it
    pub fn increase_ball_speed(&mut self, amount: f32) {
        self.ball_speed += amount;
        for ball in &mut self.balls {
            ball.set_speed(self.ball_speed);
        }
        self.events.push(GameEvent::SpeedIncreased {
            speed: self.ball_speed,
        });
        log::debug!("Ball speed now {}", self.ball_speed);
    }

    /// Clear the round back to its opening layout (score, lives, speed,
    /// timers, power-ups, paddle, one ball, new wall)
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.ball_speed = self.tuning.ball_start_speed;
        self.round_start_ms = 0.0;
        self.elapsed_ms = 0.0;
        self.completed_speed_intervals = 0;
        self.last_power_up_drop_ms = 0.0;
        self.power_ups.clear();
        self.effects = EffectSlot::default();
        self.paddle.recenter(self.tuning.field_width);
        self.balls.clear();
        let ball = self.serve_ball();
        self.balls.push(ball);
        self.grid = BrickGrid::build(&self.tuning.bricks);
    }

    /// Reset everything and begin play at `now_ms`
    pub fn start_round(&mut self, now_ms: f64) {
        self.reset();
        self.round_start_ms = now_ms;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RoundStarted);
        log::info!("Round started ({} bricks)", self.grid.bricks.len());
    }

    /// Enter Victory or Defeat. Clears power-up state so nothing fires later.
    pub fn end_round(&mut self, victory: bool) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.deactivate_power_up();
        self.power_ups.clear();
        self.phase = if victory {
            GamePhase::Victory
        } else {
            GamePhase::Defeat
        };

        let summary = RoundSummary {
            victory,
            final_score: self.score,
            final_elapsed_seconds: self.elapsed_seconds(),
        };
        self.events.push(GameEvent::RoundEnded(summary));
        log::info!(
            "Round ended: {} with {} points in {}s",
            if victory { "victory" } else { "defeat" },
            summary.final_score,
            summary.final_elapsed_seconds
        );
    }

    /// Every ball left the field
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        self.deactivate_power_up();
        self.power_ups.clear();
        self.last_power_up_drop_ms = self.elapsed_ms;

        if self.lives == 0 {
            self.end_round(false);
        } else {
            log::debug!("Life lost, {} remaining", self.lives);
            self.paddle.recenter(self.tuning.field_width);
            self.balls.clear();
            let ball = self.serve_ball();
            self.balls.push(ball);
        }
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
