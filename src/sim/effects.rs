//! Power-up effect state machine
//!
//! One effect may be active at a time. Activating replaces whatever was
//! running (reverting it first), and deactivation is idempotent: calling it
//! with nothing active still restores the radius and clears piercing.

use serde::{Deserialize, Serialize};

use super::state::{Ball, GameEvent, GameState, PowerUpKind};
use crate::heading;

/// The running effect and when it wears off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Absolute clock reading (ms)
    pub expires_at_ms: f64,
}

/// Effect slot plus the modifiers it drives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSlot {
    pub active: Option<ActiveEffect>,
    pub radius_multiplier: f32,
    pub piercing: bool,
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self {
            active: None,
            radius_multiplier: 1.0,
            piercing: false,
        }
    }
}

impl GameState {
    /// Start `kind`, replacing any running effect
    pub fn activate_power_up(&mut self, kind: PowerUpKind, now_ms: f64) {
        if self.effects.active.is_some() {
            self.deactivate_power_up();
        }

        self.effects.active = Some(ActiveEffect {
            kind,
            expires_at_ms: now_ms + self.tuning.power_up_duration_ms,
        });

        match kind {
            PowerUpKind::BigBall => {
                self.effects.radius_multiplier = self.tuning.big_ball_multiplier;
                self.refresh_ball_radii();
            }
            PowerUpKind::MultiBall => self.split_balls(),
            PowerUpKind::Piercing => self.effects.piercing = true,
        }

        self.events.push(GameEvent::PowerUpCollected(kind));
        log::debug!("Power-up {:?} active until {}ms", kind, now_ms + self.tuning.power_up_duration_ms);
    }

    /// Revert the running effect. Safe to call with nothing active.
    ///
    /// Returns the kind that was running, if any.
    pub fn deactivate_power_up(&mut self) -> Option<PowerUpKind> {
        let previous = self.effects.active.take();

        if let Some(ActiveEffect {
            kind: PowerUpKind::MultiBall,
            ..
        }) = previous
        {
            self.collapse_to_lowest_ball();
        }

        self.effects.radius_multiplier = 1.0;
        self.refresh_ball_radii();
        self.effects.piercing = false;

        previous.map(|effect| effect.kind)
    }

    /// Deactivate the running effect once its time is up
    pub fn expire_power_up(&mut self, now_ms: f64) {
        let Some(effect) = self.effects.active else {
            return;
        };
        if now_ms >= effect.expires_at_ms {
            self.deactivate_power_up();
            self.events.push(GameEvent::PowerUpExpired(effect.kind));
            log::debug!("Power-up {:?} expired", effect.kind);
        }
    }

    fn refresh_ball_radii(&mut self) {
        let radius = self.ball_radius();
        for ball in &mut self.balls {
            ball.radius = radius;
        }
    }

    /// Add two balls fanned out either side of the first ball's heading
    fn split_balls(&mut self) {
        let Some(reference) = self.balls.first().cloned() else {
            let ball = self.serve_ball();
            self.balls.push(ball);
            return;
        };

        let base = heading(reference.vel);
        let spread = self.tuning.multi_ball_spread;
        let radius = self.ball_radius();
        for offset in [-spread, spread] {
            self.balls.push(Ball::with_angle(
                reference.pos,
                base + offset,
                self.ball_speed,
                radius,
            ));
        }
    }

    /// Keep only the ball furthest down the field (first one wins ties)
    fn collapse_to_lowest_ball(&mut self) {
        if self.balls.is_empty() {
            return;
        }
        let mut keeper = 0;
        for (i, ball) in self.balls.iter().enumerate().skip(1) {
            if ball.pos.y > self.balls[keeper].pos.y {
                keeper = i;
            }
        }
        let ball = self.balls.swap_remove(keeper);
        self.balls.clear();
        self.balls.push(ball);
    }
}
