//! Attainment Breakout - a breakout game over an attainment grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, power-ups)
//! - `game`: Round lifecycle, input events and render snapshots
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard ranking and player names
//! - `session`: Named player, name gate and score submission
//! - `ui`: HUD text helpers

pub mod game;
pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{Game, InputEvent, RoundSummary, Snapshot};
pub use highscores::HighScores;
pub use session::Session;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 1080.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 140.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Distance from the paddle's top edge to the bottom of the field
    pub const PADDLE_BOTTOM_GAP: f32 = 40.0;
    /// Pixels per tick
    pub const PADDLE_SPEED: f32 = 7.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Pixels per tick
    pub const BALL_START_SPEED: f32 = 3.0;
    pub const BALL_SPEED_INCREMENT: f32 = 1.0;
    pub const BALL_SPEED_INTERVAL_MS: f64 = 15_000.0;
    /// Gap between a freshly served ball and the paddle
    pub const BALL_SERVE_GAP: f32 = 4.0;
    /// Max paddle deflection from vertical (60°)
    pub const PADDLE_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid defaults
    pub const BRICK_COLUMNS: u32 = 18;
    pub const BRICK_ROWS: u32 = 21;
    pub const BRICK_WIDTH: f32 = 40.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_TOP_OFFSET: f32 = 60.0;
    pub const BRICK_LEFT_OFFSET: f32 = 138.0;
    pub const BRICK_SCORE: u64 = 50;

    /// Power-up defaults
    pub const POWER_UP_DROP_INTERVAL_MS: f64 = 20_000.0;
    pub const POWER_UP_DURATION_MS: f64 = 5_000.0;
    pub const POWER_UP_FALL_SPEED: f32 = 3.0;
    pub const POWER_UP_SIZE: f32 = 24.0;
    pub const BIG_BALL_MULTIPLIER: f32 = 1.75;
    /// Angular spread of the extra multi-ball balls (radians)
    pub const MULTI_BALL_SPREAD: f32 = 0.3;

    pub const STARTING_LIVES: u8 = 3;
}

/// Rescale a velocity to the given speed, keeping its direction.
///
/// A zero vector has no direction, so it falls back to the up-right
/// diagonal `(speed, -speed)`.
#[inline]
pub fn rescale_to_speed(vel: Vec2, speed: f32) -> Vec2 {
    let magnitude = vel.length();
    if magnitude == 0.0 {
        return Vec2::new(speed, -speed);
    }
    vel / magnitude * speed
}

/// Velocity pointing along `angle` (radians, screen coordinates) at `speed`
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::from_angle(angle) * speed
}

/// Heading of a velocity in radians (`atan2(dy, dx)`)
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}
