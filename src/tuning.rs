//! Data-driven game balance
//!
//! Every physics constant and every lap-detection threshold lives here so
//! designers can retune a track day without touching the simulation. Partial
//! JSON documents are accepted: anything left out keeps its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, require_positive, require_range};

/// Car dynamics and track interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub accel: f32,
    pub drag: f32,
    pub max_speed: f32,
    /// Steering rate in rad/s at full speed (half of it at rest)
    pub steer_rate: f32,
    /// Speed multiplier once the car is a full half-width outside the edge
    pub offroad_retention: f32,
    /// Fraction of the distance back to the edge closed per second
    pub wall_pull: f32,
    /// Hard limit on how far off the road the car may be, in half-widths
    pub overhang_tolerance: f32,
    pub car_radius: f32,
    pub pickup_radius: f32,
    /// Minimum nearest-point search window (indices either side of the hint)
    pub search_window: usize,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            accel: CAR_ACCEL,
            drag: CAR_DRAG,
            max_speed: CAR_MAX_SPEED,
            steer_rate: CAR_STEER_RATE,
            offroad_retention: OFFROAD_RETENTION,
            wall_pull: WALL_PULL,
            overhang_tolerance: OVERHANG_TOLERANCE,
            car_radius: CAR_LENGTH / 2.0,
            pickup_radius: PICKUP_RADIUS,
            search_window: SEARCH_WINDOW,
        }
    }
}

/// Finish-line heuristics. All three guards must pass for a lap to count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapTuning {
    /// Progress fraction the car must drop below after wrapping past the start
    pub progress_threshold: f32,
    /// Distance since the last lap, as a fraction of the track length
    pub distance_ratio: f32,
    /// Minimum run time between two credited laps
    pub cooldown_ms: f32,
}

impl Default for LapTuning {
    fn default() -> Self {
        Self {
            progress_threshold: LAP_PROGRESS_THRESHOLD,
            distance_ratio: LAP_DISTANCE_RATIO,
            cooldown_ms: LAP_COOLDOWN_MS,
        }
    }
}

/// Run clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTuning {
    pub duration_ms: f32,
    /// Slow frames are clamped to this many seconds
    pub max_dt: f32,
}

impl Default for RunTuning {
    fn default() -> Self {
        Self {
            duration_ms: RUN_DURATION_MS,
            max_dt: MAX_TICK_DT,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub laps: LapTuning,
    pub run: RunTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate the result
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        require_range("physics.accel", p.accel, 0.0, f32::MAX)?;
        require_range("physics.drag", p.drag, 0.0, f32::MAX)?;
        require_positive("physics.max_speed", p.max_speed)?;
        require_range("physics.steer_rate", p.steer_rate, 0.0, f32::MAX)?;
        require_range("physics.offroad_retention", p.offroad_retention, 0.0, 1.0)?;
        require_range("physics.wall_pull", p.wall_pull, 0.0, f32::MAX)?;
        require_range("physics.overhang_tolerance", p.overhang_tolerance, 1.0, f32::MAX)?;
        require_range("physics.car_radius", p.car_radius, 0.0, f32::MAX)?;
        require_range("physics.pickup_radius", p.pickup_radius, 0.0, f32::MAX)?;

        let l = &self.laps;
        require_range("laps.progress_threshold", l.progress_threshold, 0.0, 1.0)?;
        require_range("laps.distance_ratio", l.distance_ratio, 0.0, f32::MAX)?;
        require_range("laps.cooldown_ms", l.cooldown_ms, 0.0, f32::MAX)?;

        require_positive("run.duration_ms", self.run.duration_ms)?;
        require_positive("run.max_dt", self.run.max_dt)?;
        Ok(())
    }

    /// Search window wide enough to cover the furthest a car can travel in one tick
    pub fn search_window(&self, spacing: f32) -> usize {
        let per_tick = self.physics.max_speed * self.run.max_dt;
        let needed = (per_tick / spacing).ceil() as usize + 2;
        self.physics.search_window.max(needed)
    }
}
