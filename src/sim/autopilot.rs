//! Idle/demo driver: chases a point a little way down the centerline

use super::state::{CarState, Steering};
use super::track::TrackData;
use crate::normalize_angle;

/// How far ahead of the car the target point sits (world units)
pub const LOOKAHEAD_DISTANCE: f32 = 24.0;
/// Heading errors smaller than this are left alone (radians)
pub const DEADBAND: f32 = 0.04;

/// Steering that turns the car toward the centerline ahead
pub fn steer(track: &TrackData, car: &CarState) -> Steering {
    let n = track.len();
    let ahead = (LOOKAHEAD_DISTANCE / track.spacing()).ceil() as usize;
    let target = track.center()[(car.nearest_index + ahead) % n];
    let to_target = target - car.position;
    let desired = to_target.y.atan2(to_target.x);
    let error = normalize_angle(desired - car.heading);

    // Positive axis turns the heading counter-clockwise
    Steering::new(error < -DEADBAND, error > DEADBAND)
}
