//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a round can be replayed or
//! rebalanced without touching code. Defaults reproduce the classic game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Brick wall layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickLayout {
    pub rows: u32,
    pub columns: u32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub padding: f32,
    pub top_offset: f32,
    pub left_offset: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            rows: BRICK_ROWS,
            columns: BRICK_COLUMNS,
            cell_width: BRICK_WIDTH,
            cell_height: BRICK_HEIGHT,
            padding: BRICK_PADDING,
            top_offset: BRICK_TOP_OFFSET,
            left_offset: BRICK_LEFT_OFFSET,
        }
    }
}

/// Full set of balance knobs for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_gap: f32,
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start_speed: f32,
    pub ball_speed_increment: f32,
    pub ball_speed_interval_ms: f64,

    // === Bricks ===
    pub bricks: BrickLayout,
    pub brick_score: u64,

    // === Power-ups ===
    pub power_up_drop_interval_ms: f64,
    pub power_up_duration_ms: f64,
    pub power_up_fall_speed: f32,
    pub power_up_size: f32,
    pub big_ball_multiplier: f32,
    pub multi_ball_spread: f32,

    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_gap: PADDLE_BOTTOM_GAP,
            paddle_speed: PADDLE_SPEED,

            ball_radius: BALL_RADIUS,
            ball_start_speed: BALL_START_SPEED,
            ball_speed_increment: BALL_SPEED_INCREMENT,
            ball_speed_interval_ms: BALL_SPEED_INTERVAL_MS,

            bricks: BrickLayout::default(),
            brick_score: BRICK_SCORE,

            power_up_drop_interval_ms: POWER_UP_DROP_INTERVAL_MS,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            power_up_fall_speed: POWER_UP_FALL_SPEED,
            power_up_size: POWER_UP_SIZE,
            big_ball_multiplier: BIG_BALL_MULTIPLIER,
            multi_ball_spread: MULTI_BALL_SPREAD,

            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document; missing keys keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a JSON tuning file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(TuningError::Invalid("field must have a positive size".into()));
        }
        if self.paddle_width <= 0.0 || self.paddle_width > self.field_width {
            return Err(TuningError::Invalid(format!(
                "paddle width {} does not fit a field {} wide",
                self.paddle_width, self.field_width
            )));
        }
        if self.paddle_bottom_gap < 0.0 || self.paddle_bottom_gap > self.field_height {
            return Err(TuningError::Invalid("paddle sits outside the field".into()));
        }
        if self.bricks.rows == 0 || self.bricks.columns == 0 {
            return Err(TuningError::Invalid("brick grid needs at least one row and column".into()));
        }
        if self.ball_radius <= 0.0 || self.ball_start_speed <= 0.0 {
            return Err(TuningError::Invalid("ball radius and speed must be positive".into()));
        }
        if self.ball_speed_increment < 0.0 {
            return Err(TuningError::Invalid("ball speed increment cannot be negative".into()));
        }
        if self.paddle_speed < 0.0 {
            return Err(TuningError::Invalid("paddle speed cannot be negative".into()));
        }
        if self.power_up_fall_speed <= 0.0 {
            return Err(TuningError::Invalid("power-ups must fall".into()));
        }
        if self.big_ball_multiplier <= 0.0 {
            return Err(TuningError::Invalid("big ball multiplier must be positive".into()));
        }
        if self.ball_speed_interval_ms <= 0.0 || self.power_up_drop_interval_ms <= 0.0 {
            return Err(TuningError::Invalid("timer intervals must be positive".into()));
        }
        if self.power_up_size >= self.field_width {
            return Err(TuningError::Invalid("power-up wider than the field".into()));
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid("starting lives must be at least 1".into()));
        }
        Ok(())
    }

    /// Paddle top edge
    pub fn paddle_y(&self) -> f32 {
        self.field_height - self.paddle_bottom_gap
    }
}
