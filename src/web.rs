//! Browser bindings
//!
//! JavaScript owns the canvas and the frame callback. Each
//! `requestAnimationFrame` it calls [`WebGame::frame`] with
//! `performance.now()` and draws the returned JSON snapshot. Key events and
//! the start button are forwarded as-is.

use wasm_bindgen::prelude::*;

use crate::game::{Game, InputEvent};
use crate::highscores::HighScores;
use crate::session::Session;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Attainment Breakout starting...");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Map a `KeyboardEvent.key` to a paddle event
fn movement(key: &str, pressed: bool) -> Option<InputEvent> {
    match (key, pressed) {
        ("ArrowLeft" | "a", true) => Some(InputEvent::MoveLeftStart),
        ("ArrowLeft" | "a", false) => Some(InputEvent::MoveLeftEnd),
        ("ArrowRight" | "d", true) => Some(InputEvent::MoveRightStart),
        ("ArrowRight" | "d", false) => Some(InputEvent::MoveRightEnd),
        _ => None,
    }
}

/// Game instance handed to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// Build a game for a canvas of the given size. `tuning_json` may
    /// override any other balance value.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let mut tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_err)?,
            None => Tuning::default(),
        };
        tuning.field_width = width;
        tuning.field_height = height;
        tuning.validate().map_err(js_err)?;

        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        Ok(WebGame {
            session: Session::new(Game::new(tuning, seed), HighScores::load()),
        })
    }

    /// Start (or restart) under a player name. Rejects invalid names.
    pub fn start(&mut self, name: &str, now: f64) -> Result<bool, JsValue> {
        self.session.start(name, now).map_err(js_err)
    }

    pub fn key_down(&mut self, key: &str, now: f64) {
        if let Some(event) = movement(key, true) {
            self.session.game_mut().handle_input(event, now);
        } else if key == " " {
            // Space replays under the name already entered
            self.session.replay(now);
        }
    }

    pub fn key_up(&mut self, key: &str, now: f64) {
        if let Some(event) = movement(key, false) {
            self.session.game_mut().handle_input(event, now);
        }
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn frame(&mut self, now: f64) -> Result<String, JsValue> {
        self.session.update(now);
        serde_json::to_string(&self.session.game().snapshot()).map_err(js_err)
    }

    /// Final numbers of the last round, if it has ended
    pub fn summary(&self) -> Option<String> {
        self.session
            .last_summary()
            .and_then(|s| serde_json::to_string(&s).ok())
    }

    /// Leaderboard rank of the last round (1-indexed), if it placed
    pub fn rank(&self) -> Option<usize> {
        self.session.last_rank()
    }

    pub fn high_scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.high_scores().entries).map_err(js_err)
    }
}
