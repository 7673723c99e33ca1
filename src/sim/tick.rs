//! Simulation tick
//!
//! Advances one run by one frame: timer, car dynamics, road contact,
//! pickups, then the finish line.

use super::autopilot;
use super::collision::{
    RoadContact, circles_overlap, nearest_index, offroad_speed_factor, wall_correction,
};
use super::state::{RaceState, RunPhase, RunResult, Steering};
use super::track::{PickupKind, TrackData};
use crate::tuning::{LapTuning, Tuning};
use crate::{heading_vector, normalize_angle};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Keys held (from keyboard or touch)
    pub steering: Steering,
    /// Idle/demo mode - the autopilot drives
    pub autopilot: bool,
}

impl TickInput {
    pub fn steer(left: bool, right: bool) -> Self {
        Self {
            steering: Steering::new(left, right),
            autopilot: false,
        }
    }
}

/// Advance the run by `dt` seconds (clamped to `tuning.run.max_dt`).
///
/// Returns the final result on the tick the countdown reaches zero, and
/// `None` on every other tick, including all ticks after the run ended.
pub fn tick(
    state: &mut RaceState,
    track: &TrackData,
    input: &TickInput,
    dt: f32,
    tuning: &Tuning,
) -> Option<RunResult> {
    if state.phase == RunPhase::Ended {
        return None;
    }

    let dt = if dt > 0.0 { dt.min(tuning.run.max_dt) } else { 0.0 };
    state.ticks += 1;

    state.timer_ms -= dt * 1000.0;
    if state.timer_ms <= 0.0 {
        state.timer_ms = 0.0;
        state.phase = RunPhase::Ended;
        let result = state.result();
        log::info!(
            "Run over on {}: up {} down {} laps {} distance {:.0}",
            track.seed(),
            result.up,
            result.down,
            state.laps,
            result.distance
        );
        return Some(result);
    }

    state.car.steering = if input.autopilot {
        autopilot::steer(track, &state.car)
    } else {
        input.steering
    };

    drive(state, dt, tuning);
    keep_on_road(state, track, dt, tuning);
    collect_pickups(state, tuning);
    check_lap(state, track, &tuning.laps);
    None
}

/// Thrust, drag, steering and integration
fn drive(state: &mut RaceState, dt: f32, tuning: &Tuning) {
    let physics = &tuning.physics;
    let car = &mut state.car;

    // Forward-only arcade model
    car.speed = (car.speed + (physics.accel - physics.drag) * dt).clamp(0.0, physics.max_speed);

    // Half steering authority at rest, full at top speed
    let authority = 0.5 + 0.5 * car.speed / physics.max_speed;
    car.heading =
        normalize_angle(car.heading + car.steering.axis() * physics.steer_rate * authority * dt);

    let old = car.position;
    car.position += heading_vector(car.heading) * car.speed * dt;
    state.distance += car.position.distance(old);
}

/// Localize against the centerline and apply the off-road penalty
fn keep_on_road(state: &mut RaceState, track: &TrackData, dt: f32, tuning: &Tuning) {
    let physics = &tuning.physics;
    let car = &mut state.car;

    let window = tuning.search_window(track.spacing());
    car.nearest_index = nearest_index(track, car.position, car.nearest_index, window);

    let contact = RoadContact::at(track, car.position, car.nearest_index);
    if contact.on_road() {
        return;
    }
    car.speed *= offroad_speed_factor(
        contact.overshoot(),
        contact.half_width,
        physics.offroad_retention,
    );
    car.position = wall_correction(track, car.position, &contact, physics, dt);
}

/// Mark every pickup the car overlaps as taken
fn collect_pickups(state: &mut RaceState, tuning: &Tuning) {
    let car_pos = state.car.position;
    let car_radius = tuning.physics.car_radius;
    let pickup_radius = tuning.physics.pickup_radius;

    for pickup in state.pickups.iter_mut().filter(|p| !p.taken) {
        if circles_overlap(car_pos, car_radius, pickup.position, pickup_radius) {
            pickup.taken = true;
            match pickup.kind {
                PickupKind::Up => state.up += 1,
                PickupKind::Down => state.down += 1,
            }
        }
    }
}

/// Credit a lap when the car is just past the start line, has driven most
/// of a lap since the last one, and the cooldown has run out. A credited
/// lap respawns every pickup. Returns true when a lap was credited.
pub fn check_lap(state: &mut RaceState, track: &TrackData, laps: &LapTuning) -> bool {
    state.progress = state.car.nearest_index as f32 / track.len() as f32;

    let just_past_start = state.progress > 0.0 && state.progress < laps.progress_threshold;
    let driven = state.distance - state.last_lap_distance > laps.distance_ratio * track.length();
    let cooled = state.elapsed_ms() - state.last_lap_ms > laps.cooldown_ms;
    if !(just_past_start && driven && cooled) {
        return false;
    }

    state.laps += 1;
    state.last_lap_ms = state.elapsed_ms();
    state.last_lap_distance = state.distance;
    state.respawn_pickups();
    log::debug!(
        "Lap {} at {:.1}s, pickups respawned",
        state.laps,
        state.last_lap_ms / 1000.0
    );
    true
}
