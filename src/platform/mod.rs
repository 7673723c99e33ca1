//! Platform abstraction layer
//!
//! Handles the host's side of the loop:
//! - Time: display-refresh timestamps to clamped tick deltas
//! - Input: keyboard and touch events to a steering pair
//! - Web: the wasm-bindgen handle the host page drives (wasm32 only)

use crate::sim::Steering;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Turns frame timestamps (ms) into tick deltas (s)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]`.
    /// The first frame after a reset yields 0.
    pub fn delta(&mut self, timestamp_ms: f64, max_dt: f32) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        if dt > max_dt {
            log::trace!("Slow frame: {:.1} ms clamped", dt * 1000.0);
        }
        dt.clamp(0.0, max_dt)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Held steering keys, written by event handlers between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key event. Returns true when the key steers (caller should
    /// suppress the browser default).
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => {
                self.left = down;
                true
            }
            "ArrowRight" | "d" | "D" => {
                self.right = down;
                true
            }
            _ => false,
        }
    }

    /// Replace steering from the current touch points: left of the canvas
    /// midline steers left, right of it steers right.
    pub fn touches(&mut self, touch_xs: &[f32], canvas_left: f32, canvas_width: f32) {
        let mid = canvas_left + canvas_width / 2.0;
        self.left = touch_xs.iter().any(|&x| x < mid);
        self.right = touch_xs.iter().any(|&x| x >= mid);
    }

    /// Touch end / cancel
    pub fn clear(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn steering(&self) -> Steering {
        Steering::new(self.left, self.right)
    }
}
