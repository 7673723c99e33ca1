//! wasm-bindgen surface for the host page
//!
//! The page owns the canvas, the requestAnimationFrame loop and the avatar
//! image. It forwards key/touch events here, calls `frame` once per display
//! refresh, and calls `stop` when it unmounts.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::InputState;
use crate::sim::{RaceSession, TrackOptions, generate_daily_track};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Today's track as JSON (center, normals, width, pickups, seed)
#[wasm_bindgen(js_name = dailyTrack)]
pub fn daily_track(identifier: &str) -> Result<String, JsValue> {
    let track = generate_daily_track(identifier, &TrackOptions::default()).map_err(to_js)?;
    serde_json::to_string(&track).map_err(to_js)
}

#[wasm_bindgen]
pub struct RaceHandle {
    session: RaceSession,
    input: InputState,
}

#[wasm_bindgen]
impl RaceHandle {
    /// Start a run on today's track. `tuning_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(identifier: &str, tuning_json: &str) -> Result<RaceHandle, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json_str(tuning_json).map_err(to_js)?
        };
        let track = generate_daily_track(identifier, &TrackOptions::default()).map_err(to_js)?;
        let session = RaceSession::new(Rc::new(track), tuning).map_err(to_js)?;
        Ok(Self {
            session,
            input: InputState::new(),
        })
    }

    /// Returns true when the key steers and the default should be prevented
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        let handled = self.input.key(key, down);
        self.session.set_steering(self.input.steering());
        handled
    }

    /// Current touch x positions (client coordinates)
    pub fn touches(&mut self, xs: &[f32], canvas_left: f32, canvas_width: f32) {
        self.input.touches(xs, canvas_left, canvas_width);
        self.session.set_steering(self.input.steering());
    }

    #[wasm_bindgen(js_name = clearTouches)]
    pub fn clear_touches(&mut self) {
        self.input.clear();
        self.session.set_steering(self.input.steering());
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.session.set_autopilot(enabled);
    }

    /// Advance one display frame. Returns the result JSON on the frame the
    /// run ends, otherwise undefined.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<Option<String>, JsValue> {
        self.session
            .advance_frame(timestamp_ms)
            .map(|result| serde_json::to_string(&result))
            .transpose()
            .map_err(to_js)
    }

    /// Race state JSON for drawing
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.state()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn restart(&mut self) {
        self.input.clear();
        self.session.restart();
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
