//! A named player's run of rounds
//!
//! Wraps a [`Game`] with the player name gate and the leaderboard it reports
//! to, so the browser and native drivers credit finished rounds the same way.

use crate::game::{Game, RoundSummary};
use crate::highscores::{HighScores, NameError, validate_player_name};
use crate::sim::{GameEvent, GamePhase};

#[derive(Debug, Clone)]
pub struct Session {
    game: Game,
    high_scores: HighScores,
    player: Option<String>,
    last_summary: Option<RoundSummary>,
    last_rank: Option<usize>,
}

impl Session {
    pub fn new(game: Game, high_scores: HighScores) -> Self {
        Self {
            game,
            high_scores,
            player: None,
            last_summary: None,
            last_rank: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Name the current round is credited to
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Final numbers of the last round, if it has ended
    pub fn last_summary(&self) -> Option<RoundSummary> {
        self.last_summary
    }

    /// Leaderboard rank of the last round (1-indexed), if it placed
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Start, or restart after a finished round, under `name`. The name is
    /// only taken over when a round actually begins; mid-round calls leave
    /// the current player in place.
    pub fn start(&mut self, name: &str, now_ms: f64) -> Result<bool, NameError> {
        let name = validate_player_name(name)?;
        let started = match self.game.phase() {
            GamePhase::NotStarted => self.game.request_start(now_ms),
            _ => self.game.request_restart(now_ms),
        };
        if started {
            self.player = Some(name);
            self.clear_result();
        }
        Ok(started)
    }

    /// Play again under the name already accepted
    pub fn replay(&mut self, now_ms: f64) -> bool {
        if self.player.is_none() || !self.game.request_restart(now_ms) {
            return false;
        }
        self.clear_result();
        true
    }

    /// Run one frame; a finished round is submitted to the leaderboard
    pub fn update(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let events = self.game.update(now_ms);
        for event in &events {
            if let GameEvent::RoundEnded(summary) = event {
                self.record(*summary);
            }
        }
        events
    }

    fn clear_result(&mut self) {
        self.last_summary = None;
        self.last_rank = None;
    }

    fn record(&mut self, summary: RoundSummary) {
        self.last_summary = Some(summary);
        let Some(name) = self.player.as_deref() else {
            log::warn!("Round ended without a player name, score not recorded");
            return;
        };
        self.last_rank = self.high_scores.submit(name, &summary);
        if self.last_rank.is_some() {
            self.high_scores.save();
        }
    }
}
