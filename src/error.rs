//! Configuration errors
//!
//! Everything that can go wrong happens before a run starts: bad track
//! options, bad tuning, or a tuning file that does not parse. Ticks never fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("control point range {min}..={max} is invalid (need at least 3 points and min <= max)")]
    ControlPoints { min: usize, max: usize },

    #[error("spline_samples must be at least 1")]
    SplineSamples,

    #[error("track for seed {seed:?} resampled to {points} points; at least 3 are required")]
    DegenerateTrack { seed: String, points: usize },

    #[error("track would need about {estimated} centerline points; at most {max} are allowed")]
    TooManyPoints { estimated: f32, max: usize },

    #[error("{field} would place about {count} pickups; at most {max} are allowed")]
    TooManyPickups {
        field: &'static str,
        count: f32,
        max: usize,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fail unless `value` is finite and strictly positive
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Fail unless `min <= value <= max`
pub(crate) fn require_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
