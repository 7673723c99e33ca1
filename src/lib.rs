//! Daily Racer - A top-down racing mini-game on a track that changes every day
//!
//! Core modules:
//! - `sim`: Deterministic track generation and race simulation
//! - `tuning`: Data-driven physics, lap and run balance
//! - `platform`: Frame clock and input mapping (plus the wasm binding)
//! - `view`: Framework-agnostic drawing helpers for the host page

pub mod error;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod view;

pub use error::ConfigError;
pub use tuning::{LapTuning, PhysicsTuning, RunTuning, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Run length (one minute countdown)
    pub const RUN_DURATION_MS: f32 = 60_000.0;
    /// Largest timestep a single tick may consume (seconds)
    pub const MAX_TICK_DT: f32 = 0.033;

    /// Forward thrust (units/s²)
    pub const CAR_ACCEL: f32 = 32.0;
    /// Baseline drag (units/s²)
    pub const CAR_DRAG: f32 = 12.0;
    /// Top speed (units/s)
    pub const CAR_MAX_SPEED: f32 = 85.0;
    /// Steering rate at full lock and top speed (rad/s)
    pub const CAR_STEER_RATE: f32 = 2.8;
    /// Car sprite length; the collision radius is half of it
    pub const CAR_LENGTH: f32 = 28.0;
    pub const CAR_HALF_WIDTH: f32 = 18.0;

    /// Fraction of speed kept when fully off the road
    pub const OFFROAD_RETENTION: f32 = 0.25;
    /// Proportional pull back toward the road edge (per second)
    pub const WALL_PULL: f32 = 1.2;
    /// How far past the edge the car may hang, as a multiple of half-width
    pub const OVERHANG_TOLERANCE: f32 = 1.2;

    pub const PICKUP_RADIUS: f32 = 3.2;

    /// Nearest-point search window (indices either side of the hint)
    pub const SEARCH_WINDOW: usize = 35;

    /// Lap credit guards
    pub const LAP_PROGRESS_THRESHOLD: f32 = 0.15;
    pub const LAP_DISTANCE_RATIO: f32 = 0.7;
    pub const LAP_COOLDOWN_MS: f32 = 8_000.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing along a heading
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}
