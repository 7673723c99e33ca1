//! Procedural daily track
//!
//! A track is a pure function of (identifier, UTC date, options): everyone who
//! plays on the same day races the same loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::rc::Rc;

use chrono::{NaiveDate, Utc};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{compute_normals, polyline_length, resample_closed, sample_closed_spline};
use super::noise::ValueNoise1D;
use super::rng::TrackRng;
use crate::error::{ConfigError, require_positive, require_range};
use crate::polar_to_cartesian;

/// Most centerline points a track may have
pub const MAX_TRACK_POINTS: usize = 100_000;
/// Most pickups of one kind a track may carry
pub const MAX_PICKUPS: usize = 10_000;

/// Shape and pickup density knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackOptions {
    /// Mean control-point radius
    pub radius: f32,
    /// Target distance between centerline points
    pub spacing: f32,
    pub base_width: f32,
    /// Noise amplitude added to `base_width`
    pub width_amp: f32,
    /// Width never drops below `base_width * width_floor`
    pub width_floor: f32,
    /// Noise cycles over one lap (in table units)
    pub noise_frequency: f32,
    pub noise_dampening: f32,
    pub min_control_points: usize,
    pub max_control_points: usize,
    /// Angular jitter per control point, as a fraction of the angular spacing
    pub angle_jitter: f32,
    /// Radius varies within `radius * (1 ± radius_variation)`
    pub radius_variation: f32,
    /// Spline samples per control segment while measuring arc length
    pub spline_samples: usize,
    /// Distance between consecutive "up" pickups
    pub ups_every: f32,
    /// "Down" pickups per 100 units of track
    pub downs_per_100: f32,
    /// Up sway as a fraction of the local half-width
    pub up_sway: f32,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            radius: 200.0,
            spacing: 3.0,
            base_width: 35.0,
            width_amp: 8.0,
            width_floor: 0.8,
            noise_frequency: 4.0,
            noise_dampening: 0.7,
            min_control_points: 16,
            max_control_points: 23,
            angle_jitter: 0.4,
            radius_variation: 0.2,
            spline_samples: 50,
            ups_every: 22.0,
            downs_per_100: 3.0,
            up_sway: 0.25,
        }
    }
}

impl TrackOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("radius", self.radius)?;
        require_positive("spacing", self.spacing)?;
        require_positive("base_width", self.base_width)?;
        require_range("width_amp", self.width_amp, 0.0, f32::MAX)?;
        require_range("width_floor", self.width_floor, f32::MIN_POSITIVE, 1.0)?;
        require_range("noise_frequency", self.noise_frequency, 0.0, f32::MAX)?;
        require_range("noise_dampening", self.noise_dampening, 0.0, f32::MAX)?;
        require_range("angle_jitter", self.angle_jitter, 0.0, 0.9)?;
        require_range("radius_variation", self.radius_variation, 0.0, 0.9)?;
        require_positive("ups_every", self.ups_every)?;
        require_range("downs_per_100", self.downs_per_100, 0.0, f32::MAX)?;
        require_range("up_sway", self.up_sway, 0.0, 1.0)?;
        if self.min_control_points < 3 || self.max_control_points < self.min_control_points {
            return Err(ConfigError::ControlPoints {
                min: self.min_control_points,
                max: self.max_control_points,
            });
        }
        if self.spline_samples == 0 {
            return Err(ConfigError::SplineSamples);
        }
        Ok(())
    }

    /// Bit-exact identity for memoization
    fn cache_key(&self) -> [u32; 15] {
        [
            self.radius.to_bits(),
            self.spacing.to_bits(),
            self.base_width.to_bits(),
            self.width_amp.to_bits(),
            self.width_floor.to_bits(),
            self.noise_frequency.to_bits(),
            self.noise_dampening.to_bits(),
            self.min_control_points as u32,
            self.max_control_points as u32,
            self.angle_jitter.to_bits(),
            self.radius_variation.to_bits(),
            self.spline_samples as u32,
            self.ups_every.to_bits(),
            self.downs_per_100.to_bits(),
            self.up_sway.to_bits(),
        ]
    }
}

/// Pickup flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupKind {
    /// Reward, scattered along the racing line
    Up,
    /// Penalty, sitting on the road edge
    Down,
}

/// A collectible on the track template
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pickup {
    pub position: Vec2,
    pub kind: PickupKind,
}

/// Generated track geometry. Immutable once built.
///
/// `center`, `normals` and `width` are index-aligned and cyclic. Only the
/// generator can build one, so every instance has at least 3 points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackData {
    center: Vec<Vec2>,
    normals: Vec<Vec2>,
    width: Vec<f32>,
    pickups: Vec<Pickup>,
    seed: String,
    /// Effective distance between consecutive centerline points
    spacing: f32,
}

impl TrackData {
    pub fn center(&self) -> &[Vec2] {
        &self.center
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn widths(&self) -> &[f32] {
        &self.width
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Number of centerline points
    pub fn len(&self) -> usize {
        self.center.len()
    }

    /// Always false for a generated track
    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    /// Closed centerline length
    pub fn length(&self) -> f32 {
        self.center.len() as f32 * self.spacing
    }

    #[inline]
    pub fn half_width(&self, index: usize) -> f32 {
        self.width[index] * 0.5
    }

    /// Start pose: first centerline point, facing the second
    pub fn start_pose(&self) -> (Vec2, f32) {
        let dir = self.center[1] - self.center[0];
        (self.center[0], dir.y.atan2(dir.x))
    }
}

/// `identifier-YYYY-MM-DD`
pub fn daily_seed(identifier: &str, date: NaiveDate) -> String {
    format!("{}-{}", identifier, date.format("%Y-%m-%d"))
}

/// Today's (UTC) track for `identifier`
pub fn generate_daily_track(identifier: &str, options: &TrackOptions) -> Result<TrackData, ConfigError> {
    generate_track(identifier, Utc::now().date_naive(), options)
}

/// Track for `identifier` on a given UTC date
pub fn generate_track(
    identifier: &str,
    date: NaiveDate,
    options: &TrackOptions,
) -> Result<TrackData, ConfigError> {
    generate_track_from_seed(&daily_seed(identifier, date), options)
}

/// Build a track from a raw seed string
pub fn generate_track_from_seed(seed: &str, options: &TrackOptions) -> Result<TrackData, ConfigError> {
    options.validate()?;
    let mut rng = TrackRng::from_seed_str(seed);

    // Rough loop around a circle. Jitter stays below the angular spacing so
    // neighbours never swap order and the loop cannot cross itself.
    let spread = options.max_control_points - options.min_control_points + 1;
    let count = options.min_control_points + rng.next_index(spread);
    let slot = TAU / count as f32;
    let controls: Vec<Vec2> = (0..count)
        .map(|i| {
            let theta = i as f32 * slot + rng.next_f32() * options.angle_jitter * slot;
            let r = options.radius * (1.0 + rng.next_signed() * options.radius_variation);
            polar_to_cartesian(r, theta)
        })
        .collect();

    let loop_length = polyline_length(&sample_closed_spline(&controls, options.spline_samples));
    let estimated = loop_length / options.spacing;
    if !(estimated <= MAX_TRACK_POINTS as f32) {
        return Err(ConfigError::TooManyPoints {
            estimated,
            max: MAX_TRACK_POINTS,
        });
    }

    let center = resample_closed(&controls, options.spacing, options.spline_samples);
    if center.len() < 3 {
        return Err(ConfigError::DegenerateTrack {
            seed: seed.to_string(),
            points: center.len(),
        });
    }
    let spacing = center[0].distance(center[1]);
    let normals = compute_normals(&center);

    let noise = ValueNoise1D::new(&mut rng);
    let n = center.len();
    let floor = options.base_width * options.width_floor;
    let width: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let variation =
                options.width_amp * noise.sample(t * options.noise_frequency) * options.noise_dampening;
            (options.base_width + variation).max(floor)
        })
        .collect();

    let track_length = n as f32 * spacing;
    let ups = pickup_count("ups_every", (track_length / options.ups_every).ceil())?;
    let downs = pickup_count(
        "downs_per_100",
        ((track_length / 100.0) * options.downs_per_100).floor(),
    )?;
    let mut pickups = Vec::with_capacity(ups + downs);

    // Ups every fixed distance, swaying a little off the centerline
    let index_step = options.ups_every / spacing;
    for k in 0..ups {
        let i = (k as f32 * index_step) as usize % n;
        let sway = rng.next_signed() * options.up_sway * width[i] * 0.5;
        pickups.push(Pickup {
            position: center[i] + normals[i] * sway,
            kind: PickupKind::Up,
        });
    }

    // Downs on the road edge at random points
    for _ in 0..downs {
        let i = rng.next_index(n);
        let side = if rng.coin() { -1.0 } else { 1.0 };
        pickups.push(Pickup {
            position: center[i] + normals[i] * (width[i] * 0.5 * side),
            kind: PickupKind::Down,
        });
    }

    log::info!(
        "Track {}: {} control points, {} centerline points, length {:.0}, {} pickups",
        seed,
        count,
        n,
        track_length,
        pickups.len()
    );

    Ok(TrackData {
        center,
        normals,
        width,
        pickups,
        seed: seed.to_string(),
        spacing,
    })
}

fn pickup_count(field: &'static str, count: f32) -> Result<usize, ConfigError> {
    if count <= MAX_PICKUPS as f32 {
        Ok(count.max(0.0) as usize)
    } else {
        Err(ConfigError::TooManyPickups {
            field,
            count,
            max: MAX_PICKUPS,
        })
    }
}

/// Memoized tracks keyed by (seed, options)
#[derive(Debug, Default)]
pub struct TrackCache {
    tracks: RefCell<HashMap<(String, [u32; 15]), Rc<TrackData>>>,
}

impl TrackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track for `identifier` on `date`, generated at most once per key
    pub fn get(
        &self,
        identifier: &str,
        date: NaiveDate,
        options: &TrackOptions,
    ) -> Result<Rc<TrackData>, ConfigError> {
        let seed = daily_seed(identifier, date);
        let key = (seed, options.cache_key());
        if let Some(track) = self.tracks.borrow().get(&key) {
            return Ok(Rc::clone(track));
        }
        let track = Rc::new(generate_track_from_seed(&key.0, options)?);
        self.tracks.borrow_mut().insert(key, Rc::clone(&track));
        Ok(track)
    }

    /// Drop tracks from other days
    pub fn retain_date(&self, date: NaiveDate) {
        let suffix = date.format("-%Y-%m-%d").to_string();
        self.tracks
            .borrow_mut()
            .retain(|(seed, _), _| seed.ends_with(&suffix));
    }

    pub fn len(&self) -> usize {
        self.tracks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn default_track() -> TrackData {
        generate_track("sub", new_year(), &TrackOptions::default()).unwrap()
    }

    #[test]
    fn test_daily_seed_format() {
        assert_eq!(daily_seed("sub", new_year()), "sub-2024-01-01");
        let date = NaiveDate::from_ymd_opt(2025, 11, 9).unwrap();
        assert_eq!(daily_seed("racing", date), "racing-2025-11-09");
    }

    #[test]
    fn test_default_track_is_deterministic() {
        let a = default_track();
        let b = default_track();
        assert!(!a.is_empty());
        assert_eq!(a.seed(), "sub-2024-01-01");
        assert_eq!(a, b);
        assert_eq!(a, generate_track_from_seed("sub-2024-01-01", &TrackOptions::default()).unwrap());
    }

    #[test]
    fn test_next_day_differs() {
        let a = default_track();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let b = generate_track("sub", date, &TrackOptions::default()).unwrap();
        assert_ne!(a.center(), b.center());
    }

    #[test]
    fn test_aligned_arrays() {
        let track = default_track();
        assert_eq!(track.center().len(), track.normals().len());
        assert_eq!(track.center().len(), track.widths().len());
    }

    #[test]
    fn test_pickup_mix() {
        let options = TrackOptions::default();
        let track = default_track();
        let ups = track.pickups().iter().filter(|p| p.kind == PickupKind::Up).count();
        let downs = track.pickups().len() - ups;
        let expected_ups = (track.length() / options.ups_every).ceil() as usize;
        assert_eq!(ups, expected_ups);
        assert_eq!(downs, (track.length() / 100.0 * options.downs_per_100).floor() as usize);
        assert!(downs > 0);
    }

    #[test]
    fn test_ups_near_centerline_downs_on_edge() {
        let track = default_track();
        let max_half = track.widths().iter().cloned().fold(0.0, f32::max) * 0.5;
        for pickup in track.pickups() {
            let offset = track
                .center()
                .iter()
                .map(|c| c.distance(pickup.position))
                .fold(f32::MAX, f32::min);
            match pickup.kind {
                PickupKind::Up => assert!(offset <= 0.25 * max_half + 1e-3, "{offset}"),
                PickupKind::Down => assert!(offset <= max_half + 1e-3, "{offset}"),
            }
        }
    }

    #[test]
    fn test_start_pose_faces_second_point() {
        let track = default_track();
        let (pos, heading) = track.start_pose();
        assert_eq!(pos, track.center()[0]);
        let dir = (track.center()[1] - track.center()[0]).normalize();
        assert!((heading.cos() - dir.x).abs() < 1e-5);
        assert!((heading.sin() - dir.y).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_options_fail() {
        let bad = [
            TrackOptions { spacing: 0.0, ..Default::default() },
            TrackOptions { spacing: -3.0, ..Default::default() },
            TrackOptions { radius: 0.0, ..Default::default() },
            TrackOptions { base_width: f32::NAN, ..Default::default() },
            TrackOptions { min_control_points: 0, max_control_points: 0, ..Default::default() },
            TrackOptions { min_control_points: 10, max_control_points: 5, ..Default::default() },
            TrackOptions { spline_samples: 0, ..Default::default() },
            TrackOptions { ups_every: 0.0, ..Default::default() },
            TrackOptions { angle_jitter: 1.0, ..Default::default() },
        ];
        for options in &bad {
            assert!(generate_track("sub", new_year(), options).is_err(), "{options:?}");
        }
    }

    #[test]
    fn test_fine_spacing_is_rejected() {
        for spacing in [1e-20, 1e-3] {
            let options = TrackOptions { spacing, ..Default::default() };
            assert!(options.validate().is_ok());
            let err = generate_track_from_seed("sub-2024-01-01", &options).unwrap_err();
            assert!(matches!(err, ConfigError::TooManyPoints { .. }), "{err}");
        }
    }

    #[test]
    fn test_dense_pickups_are_rejected() {
        let options = TrackOptions { ups_every: 1e-6, ..Default::default() };
        assert!(options.validate().is_ok());
        let err = generate_track_from_seed("sub-2024-01-01", &options).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyPickups { field: "ups_every", .. }), "{err}");

        let options = TrackOptions { downs_per_100: 1e12, ..Default::default() };
        let err = generate_track_from_seed("sub-2024-01-01", &options).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyPickups { field: "downs_per_100", .. }), "{err}");
    }

    #[test]
    fn test_spacing_larger_than_track_is_degenerate() {
        let options = TrackOptions { radius: 1.0, spacing: 50.0, ..Default::default() };
        let err = generate_track("sub", new_year(), &options).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateTrack { .. }));
    }

    #[test]
    fn test_cache_memoizes() {
        let cache = TrackCache::new();
        let options = TrackOptions::default();
        let a = cache.get("sub", new_year(), &options).unwrap();
        let b = cache.get("sub", new_year(), &options).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let wider = TrackOptions { base_width: 40.0, ..Default::default() };
        let c = cache.get("sub", new_year(), &wider).unwrap();
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);

        let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        cache.get("sub", tomorrow, &options).unwrap();
        cache.retain_date(tomorrow);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_options_json_roundtrip_with_defaults() {
        let options: TrackOptions = serde_json::from_str(r#"{ "spacing": 4.0 }"#).unwrap();
        assert_eq!(options.spacing, 4.0);
        assert_eq!(options.radius, 200.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_track_invariants(ident in "[a-z]{1,12}", day in 1u32..=28, spacing in 2.0f32..6.0) {
            let options = TrackOptions { spacing, ..Default::default() };
            let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
            let track = generate_track(&ident, date, &options).unwrap();
            let n = track.len();
            prop_assert!(n >= 3);

            for i in 0..n {
                let gap = track.center()[i].distance(track.center()[(i + 1) % n]);
                prop_assert!((gap - spacing).abs() < 0.05 * spacing, "gap {} at {}", gap, i);
                prop_assert!((track.normals()[i].length() - 1.0).abs() < 1e-6);
                prop_assert!(track.widths()[i] >= options.base_width * options.width_floor);
            }

            let again = generate_track(&ident, date, &options).unwrap();
            prop_assert_eq!(track, again);
        }
    }
}
