//! Attainment Breakout entry point
//!
//! The browser build is driven from JavaScript through `attainment_breakout::web`.
//! Native builds play a headless round with an autopilot paddle on a
//! synthetic 60 Hz clock and print the result.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use attainment_breakout::sim::{GameEvent, GamePhase, GameState};
    use attainment_breakout::{Game, HighScores, Session, Tuning, ui};

    /// Synthetic frame length (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten minutes of game time
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    fn load_tuning() -> Tuning {
        match std::env::var("BREAKOUT_TUNING") {
            Ok(path) => Tuning::load_from_path(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }),
            Err(_) => Tuning::default(),
        }
    }

    fn load_seed() -> u64 {
        std::env::var("BREAKOUT_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random)
    }

    /// Chase the lowest descending ball; with nothing falling, go for a pickup
    fn autopilot(state: &GameState) -> (bool, bool) {
        let paddle_center = state.paddle.center_x();
        let falling = state
            .balls
            .iter()
            .filter(|b| b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let target = match falling {
            Some(ball) => Some(ball.pos.x),
            None => state
                .power_ups
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|p| p.pos.x + p.size / 2.0),
        };

        match target {
            Some(x) if x < paddle_center - state.paddle.speed => (true, false),
            Some(x) if x > paddle_center + state.paddle.speed => (false, true),
            _ => (false, false),
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Attainment Breakout (headless) starting...");

        let tuning = load_tuning();
        let seed = load_seed();
        log::info!("Seed {}", seed);

        let mut session = Session::new(Game::new(tuning, seed), HighScores::load());
        let player = std::env::var("BREAKOUT_PLAYER").unwrap_or_else(|_| "Autopilot".into());
        if let Err(e) = session.start(&player, 0.0) {
            eprintln!("Cannot start: {}", e);
            std::process::exit(2);
        }

        for frame in 1..=MAX_FRAMES {
            let now = frame as f64 * FRAME_MS;
            let (left, right) = autopilot(session.game().state());
            session.game_mut().set_paddle_input(left, right);

            for event in session.update(now) {
                match event {
                    GameEvent::RoundEnded(summary) => {
                        println!(
                            "{}  score {}  time {}",
                            ui::end_title(session.game().phase()).unwrap_or("Round over"),
                            summary.final_score,
                            ui::format_clock(summary.final_elapsed_seconds)
                        );
                        match session.last_rank() {
                            Some(rank) => println!(
                                "{} placed #{} on the leaderboard",
                                session.player().unwrap_or_default(),
                                rank
                            ),
                            None => println!("No leaderboard placing this time"),
                        }
                    }
                    GameEvent::LifeLost { lives_left } => {
                        log::info!("Life lost ({} left)", lives_left)
                    }
                    other => log::trace!("{:?}", other),
                }
            }

            if frame % (60 * 15) == 0 {
                let snap = session.game().snapshot();
                log::info!("{}", ui::hud_line(snap.score, snap.lives, snap.elapsed_seconds));
            }
            if session.game().phase() != GamePhase::Playing {
                return;
            }
        }

        let snap = session.game().snapshot();
        println!(
            "Stopped after {} with {} bricks left, {}",
            ui::format_clock(snap.elapsed_seconds),
            session.game().state().grid.remaining(),
            ui::hud_line(snap.score, snap.lives, snap.elapsed_seconds)
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
