//! Spline geometry for closed tracks
//!
//! A handful of control points become a smooth, evenly spaced centerline:
//! - `catmull_rom`: uniform Catmull-Rom interpolation between p1 and p2
//! - `resample_closed`: walk the closed spline by arc length
//! - `compute_normals`: left-hand unit normals from central differences

use glam::Vec2;

/// Upper bound on resampled points; finer spacings yield an empty result
pub const MAX_RESAMPLE_POINTS: usize = 1 << 20;

/// Uniform Catmull-Rom point between `p1` (t = 0) and `p2` (t = 1)
pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Dense polyline along the closed spline through `points`.
///
/// Each control segment contributes `samples_per_segment` points; the last
/// point coincides with the first, so consecutive pairs cover the whole loop.
pub fn sample_closed_spline(points: &[Vec2], samples_per_segment: usize) -> Vec<Vec2> {
    let n = points.len();
    if n == 0 || samples_per_segment == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(n * samples_per_segment + 1);
    out.push(points[0]);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];
        for k in 1..=samples_per_segment {
            let t = k as f32 / samples_per_segment as f32;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out
}

/// Length of an open polyline
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Resample the closed spline through `points` at (near) fixed arc-length `spacing`.
///
/// The spacing is nudged so a whole number of steps fits the loop: the
/// closing pair `out[n-1] → out[0]` is as long as every other pair. Points
/// land exactly on step boundaries by interpolating back along the sample
/// segment that overshot. Returns an empty vec for degenerate input or when
/// more than `MAX_RESAMPLE_POINTS` points would be needed.
pub fn resample_closed(points: &[Vec2], spacing: f32, samples_per_segment: usize) -> Vec<Vec2> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }

    let dense = sample_closed_spline(points, samples_per_segment);
    let total = polyline_length(&dense);
    if !(total.is_finite() && total > 0.0) {
        return Vec::new();
    }

    let steps = (total / spacing).round().max(1.0);
    if !(steps <= MAX_RESAMPLE_POINTS as f32) {
        return Vec::new();
    }
    let count = steps as usize;
    let step = total / count as f32;

    let mut out = Vec::with_capacity(count);
    out.push(dense[0]);

    let mut walked = 0.0;
    let mut next = step;
    for w in dense.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg = a.distance(b);
        while out.len() < count && walked + seg >= next {
            let t = if seg > 0.0 { (next - walked) / seg } else { 0.0 };
            out.push(a.lerp(b, t));
            next += step;
        }
        walked += seg;
    }
    out
}

/// Left-hand unit normal of the central-difference tangent at each point
pub fn compute_normals(center: &[Vec2]) -> Vec<Vec2> {
    let n = center.len();
    (0..n)
        .map(|i| {
            let prev = center[(i + n - 1) % n];
            let next = center[(i + 1) % n];
            (next - prev).normalize_or_zero().perp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use std::f32::consts::TAU;

    fn ring(count: usize, radius: f32) -> Vec<Vec2> {
        (0..count)
            .map(|i| polar_to_cartesian(radius, i as f32 / count as f32 * TAU))
            .collect()
    }

    #[test]
    fn test_catmull_rom_endpoints() {
        let p0 = Vec2::new(-1.0, 0.0);
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(1.0, 1.0);
        let p3 = Vec2::new(2.0, 1.0);
        assert!(catmull_rom(p0, p1, p2, p3, 0.0).distance(p1) < 1e-6);
        assert!(catmull_rom(p0, p1, p2, p3, 1.0).distance(p2) < 1e-6);
    }

    #[test]
    fn test_catmull_rom_collinear_is_linear() {
        let pts = [0.0, 1.0, 2.0, 3.0].map(|x| Vec2::new(x, 0.0));
        let mid = catmull_rom(pts[0], pts[1], pts[2], pts[3], 0.5);
        assert!(mid.distance(Vec2::new(1.5, 0.0)) < 1e-6);
    }

    #[test]
    fn test_resample_even_spacing_including_closure() {
        let center = resample_closed(&ring(12, 100.0), 3.0, 50);
        let n = center.len();
        // Circumference ~628 -> ~209 points
        assert!((200..220).contains(&n), "{n}");
        for i in 0..n {
            let d = center[i].distance(center[(i + 1) % n]);
            assert!((d - 3.0).abs() < 0.05, "gap {i}: {d}");
        }
    }

    #[test]
    fn test_resample_starts_at_first_control_point() {
        let controls = ring(8, 50.0);
        let center = resample_closed(&controls, 2.0, 50);
        assert_eq!(center[0], controls[0]);
    }

    #[test]
    fn test_resample_degenerate_inputs() {
        assert!(resample_closed(&[], 3.0, 50).is_empty());
        assert!(resample_closed(&ring(8, 50.0), 0.0, 50).is_empty());
        assert!(resample_closed(&ring(8, 50.0), -1.0, 50).is_empty());
        assert!(resample_closed(&ring(8, 50.0), 3.0, 0).is_empty());
        assert!(resample_closed(&[Vec2::ONE; 5], 3.0, 50).is_empty());
        assert!(resample_closed(&ring(8, 50.0), 1e-20, 50).is_empty());
    }

    #[test]
    fn test_normals_point_left_of_travel() {
        // Counter-clockwise circle: left of travel is toward the center
        let center = resample_closed(&ring(16, 100.0), 2.0, 50);
        let normals = compute_normals(&center);
        for (p, n) in center.iter().zip(&normals) {
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.dot(-p.normalize()) > 0.99);
        }
    }

    #[test]
    fn test_normals_of_repeated_point_are_zero() {
        let normals = compute_normals(&[Vec2::ONE; 3]);
        assert!(normals.iter().all(|n| *n == Vec2::ZERO));
    }
}
