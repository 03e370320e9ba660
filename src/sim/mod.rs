//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock readings are passed in, never sampled
//! - Seeded RNG only
//! - Stable iteration order (storage order for balls and bricks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{Rect, ReboundAxis};
pub use effects::{ActiveEffect, EffectSlot};
pub use grid::{Brick, BrickGrid, BrickStatus};
pub use state::{
    Ball, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind, RoundSummary,
};
pub use tick::tick;
