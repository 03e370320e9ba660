//! High score leaderboard
//!
//! Ranked by score (highest first), then by time (fastest first), then by
//! submission order. Persisted to LocalStorage on the web, in-memory on
//! native. The simulation never waits on it: the host submits after a round
//! ends and logs any failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::RoundSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest accepted player name (characters, after trimming)
pub const MAX_NAME_LEN: usize = 16;

/// Why a player name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name is longer than {} characters", MAX_NAME_LEN)]
    TooLong,
    #[error("name contains '{0}'; use letters, digits, spaces, '-' or '_'")]
    InvalidChar(char),
}

/// Check a player name before starting a round. Returns the trimmed name.
pub fn validate_player_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, ' ' | '-' | '_')))
    {
        return Err(NameError::InvalidChar(bad));
    }
    Ok(name.to_string())
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Round time in whole seconds
    pub elapsed_seconds: u64,
    /// Submission counter, breaks ties in favor of the earlier run
    pub sequence: u64,
}

impl HighScoreEntry {
    /// True if `self` ranks above `other`
    fn outranks(&self, other: &HighScoreEntry) -> bool {
        (other.score, self.elapsed_seconds, self.sequence)
            < (self.score, other.elapsed_seconds, other.sequence)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Next submission sequence number
    #[serde(default)]
    next_sequence: u64,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "attainment_breakout_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    fn candidate(&self, score: u64, elapsed_seconds: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: String::new(),
            score,
            elapsed_seconds,
            sequence: self.next_sequence,
        }
    }

    /// Rank a run would achieve (1-indexed, None if it wouldn't make the board)
    pub fn potential_rank(&self, score: u64, elapsed_seconds: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let candidate = self.candidate(score, elapsed_seconds);
        let pos = self
            .entries
            .iter()
            .position(|e| candidate.outranks(e))
            .unwrap_or(self.entries.len());
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, elapsed_seconds: u64) -> bool {
        self.potential_rank(score, elapsed_seconds).is_some()
    }

    /// Record a finished round. Returns the rank achieved (1-indexed) or None
    /// if it didn't qualify.
    pub fn submit(&mut self, name: &str, summary: &RoundSummary) -> Option<usize> {
        let rank = self.potential_rank(summary.final_score, summary.final_elapsed_seconds)?;

        let mut entry = self.candidate(summary.final_score, summary.final_elapsed_seconds);
        entry.name = name.to_string();
        self.next_sequence += 1;

        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top entry (if any)
    pub fn top(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, high scores not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write high scores");
                } else {
                    log::info!("High scores saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::warn!("Failed to encode high scores: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
