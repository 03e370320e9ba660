//! HUD and overlay text
//!
//! Strings and palette entries the host needs to draw the HUD, bricks and
//! pickups. Layout and styling beyond these belong to the renderer.

use crate::sim::{BrickStatus, GamePhase, PowerUpKind};

/// Format whole seconds as `m:ss`
pub fn format_clock(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Overlay title for a finished round
pub fn end_title(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Victory => Some("Level Cleared!"),
        GamePhase::Defeat => Some("Out of Lives"),
        GamePhase::NotStarted | GamePhase::Playing => None,
    }
}

/// Caption printed on the banner above the wall
pub const BANNER: &str = "Reception → Year 6 | Autumn • Spring • Summer";

impl BrickStatus {
    /// Label drawn on the brick (may span two lines)
    pub fn label(&self) -> &'static str {
        match self {
            BrickStatus::Above => "Above",
            BrickStatus::Expected => "Expected",
            BrickStatus::JustBelow => "Just\nBelow",
            BrickStatus::Below => "Below",
        }
    }

    /// Fill color as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            BrickStatus::Above => "#1d4ed8",
            BrickStatus::Expected => "#22c55e",
            BrickStatus::JustBelow => "#facc15",
            BrickStatus::Below => "#ef4444",
        }
    }
}

impl PowerUpKind {
    /// Single-letter badge drawn on the pickup
    pub fn badge(&self) -> char {
        match self {
            PowerUpKind::BigBall => 'B',
            PowerUpKind::MultiBall => 'M',
            PowerUpKind::Piercing => 'P',
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PowerUpKind::BigBall => "#f97316",
            PowerUpKind::MultiBall => "#a855f7",
            PowerUpKind::Piercing => "#22c55e",
        }
    }
}

/// One-line HUD readout
pub fn hud_line(score: u64, lives: u8, elapsed_seconds: u64) -> String {
    format!(
        "Score {}  Lives {}  Time {}",
        score,
        lives,
        format_clock(elapsed_seconds)
    )
}
