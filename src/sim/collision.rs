//! Track-relative collision: where is the car, is it on the road, what did it hit
//!
//! The road is a band of varying width around the centerline. Instead of
//! polygons we work in (index, lateral offset) coordinates: the nearest
//! centerline point and the signed distance along its normal.

use glam::Vec2;

use super::track::TrackData;
use crate::tuning::PhysicsTuning;

/// Nearest centerline point within `window` indices of `hint` (cyclic)
pub fn nearest_index(track: &TrackData, pos: Vec2, hint: usize, window: usize) -> usize {
    let center = track.center();
    let n = center.len();
    let hint = hint % n;
    let window = window.min(n / 2);

    let mut best = hint;
    let mut best_dist = f32::MAX;
    for k in 0..=2 * window {
        let i = (hint + n + k - window) % n;
        let d = pos.distance_squared(center[i]);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Car position relative to the road at one centerline point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadContact {
    pub index: usize,
    /// Signed distance along the normal (+ left of travel)
    pub offset: f32,
    pub half_width: f32,
}

impl RoadContact {
    pub fn at(track: &TrackData, pos: Vec2, index: usize) -> Self {
        let offset = (pos - track.center()[index]).dot(track.normals()[index]);
        Self {
            index,
            offset,
            half_width: track.half_width(index),
        }
    }

    /// Distance past the road edge (0 when on the road)
    #[inline]
    pub fn overshoot(&self) -> f32 {
        (self.offset.abs() - self.half_width).max(0.0)
    }

    #[inline]
    pub fn on_road(&self) -> bool {
        self.overshoot() == 0.0
    }
}

/// Speed multiplier for a car `overshoot` past the edge.
///
/// 1.0 at the edge, falling linearly to `retention` one half-width out.
pub fn offroad_speed_factor(overshoot: f32, half_width: f32, retention: f32) -> f32 {
    if overshoot <= 0.0 {
        return 1.0;
    }
    let depth = if half_width > 0.0 {
        (overshoot / half_width).min(1.0)
    } else {
        1.0
    };
    1.0 - (1.0 - retention) * depth
}

/// Push an off-road car back toward the road.
///
/// Beyond `overhang_tolerance` half-widths the car snaps to that boundary;
/// closer in it is pulled a fraction of the way to the edge each tick.
pub fn wall_correction(
    track: &TrackData,
    pos: Vec2,
    contact: &RoadContact,
    physics: &PhysicsTuning,
    dt: f32,
) -> Vec2 {
    if contact.on_road() {
        return pos;
    }
    let center = track.center()[contact.index];
    let normal = track.normals()[contact.index];
    let side = contact.offset.signum();
    let max_offset = contact.half_width * physics.overhang_tolerance;

    if contact.offset.abs() > max_offset {
        center + normal * (side * max_offset)
    } else {
        let edge = center + normal * (side * contact.half_width);
        let pull = (physics.wall_pull * dt).min(1.0);
        pos + (edge - pos) * pull
    }
}

/// Circle-circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::track::{TrackOptions, generate_track_from_seed};

    /// Index distance on a ring of `n`, shortest way round
    fn cyclic_distance(a: usize, b: usize, n: usize) -> usize {
        let d = a.abs_diff(b) % n;
        d.min(n - d)
    }

    fn track() -> TrackData {
        generate_track_from_seed("collision-test", &TrackOptions::default()).unwrap()
    }

    #[test]
    fn test_nearest_index_exact_point() {
        let track = track();
        let n = track.len();
        for &i in &[0, 1, n / 3, n - 1] {
            let hint = (i + 10) % n;
            assert_eq!(nearest_index(&track, track.center()[i], hint, 35), i);
        }
    }

    #[test]
    fn test_nearest_index_wraps_around_start() {
        let track = track();
        let n = track.len();
        assert_eq!(nearest_index(&track, track.center()[n - 2], 3, 10), n - 2);
        assert_eq!(nearest_index(&track, track.center()[2], n - 3, 10), 2);
    }

    #[test]
    fn test_nearest_index_limited_to_window() {
        let track = track();
        let n = track.len();
        let far = track.center()[n / 2];
        let found = nearest_index(&track, far, 0, 5);
        assert!(cyclic_distance(found, 0, n) <= 5);
    }

    #[test]
    fn test_road_contact_sign_and_overshoot() {
        let track = track();
        let i = 40;
        let half = track.half_width(i);
        let normal = track.normals()[i];
        let center = track.center()[i];

        let left = RoadContact::at(&track, center + normal * (half * 0.5), i);
        assert!((left.offset - half * 0.5).abs() < 1e-3);
        assert!(left.on_road());

        let right = RoadContact::at(&track, center - normal * (half * 1.5), i);
        assert!((right.offset + half * 1.5).abs() < 1e-3);
        assert!((right.overshoot() - half * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_offroad_speed_factor() {
        assert_eq!(offroad_speed_factor(0.0, 10.0, 0.25), 1.0);
        assert!((offroad_speed_factor(5.0, 10.0, 0.25) - 0.625).abs() < 1e-6);
        assert!((offroad_speed_factor(10.0, 10.0, 0.25) - 0.25).abs() < 1e-6);
        assert!((offroad_speed_factor(40.0, 10.0, 0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_wall_correction_snaps_far_outside() {
        let track = track();
        let physics = PhysicsTuning::default();
        let i = 100;
        let half = track.half_width(i);
        let pos = track.center()[i] + track.normals()[i] * (half * 2.0);
        let contact = RoadContact::at(&track, pos, i);

        let corrected = wall_correction(&track, pos, &contact, &physics, 1.0 / 60.0);
        let after = RoadContact::at(&track, corrected, i);
        assert!((after.offset - half * physics.overhang_tolerance).abs() < 1e-3);
    }

    #[test]
    fn test_wall_correction_pulls_gently_inside_tolerance() {
        let track = track();
        let physics = PhysicsTuning::default();
        let i = 100;
        let half = track.half_width(i);
        let pos = track.center()[i] - track.normals()[i] * (half * 1.1);
        let contact = RoadContact::at(&track, pos, i);

        let corrected = wall_correction(&track, pos, &contact, &physics, 1.0 / 60.0);
        let after = RoadContact::at(&track, corrected, i);
        assert!(after.offset < -half, "still outside after one tick");
        assert!(after.offset > contact.offset, "moved toward the road");
    }

    #[test]
    fn test_wall_correction_ignores_on_road() {
        let track = track();
        let pos = track.center()[7];
        let contact = RoadContact::at(&track, pos, 7);
        assert_eq!(
            wall_correction(&track, pos, &contact, &PhysicsTuning::default(), 0.1),
            pos
        );
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 14.0, Vec2::new(17.0, 0.0), 3.2));
        assert!(!circles_overlap(Vec2::ZERO, 14.0, Vec2::new(17.5, 0.0), 3.2));
    }

    #[test]
    fn test_cyclic_distance() {
        assert_eq!(cyclic_distance(1, 99, 100), 2);
        assert_eq!(cyclic_distance(10, 20, 100), 10);
        assert_eq!(cyclic_distance(0, 50, 100), 50);
    }
}
