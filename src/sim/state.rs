//! Race state and core simulation types
//!
//! One `RaceState` per run. It is created from a track template at run start,
//! mutated by `tick`, and thrown away when the run ends or the host remounts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::track::{PickupKind, TrackData};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Countdown running, car moving
    Running,
    /// Timer hit zero; final result already emitted
    Ended,
}

/// Steering keys held this tick. Left and right together cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

impl Steering {
    pub fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// -1 (left), 0, or +1 (right)
    #[inline]
    pub fn axis(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarState {
    pub position: Vec2,
    /// Radians, 0 = +x
    pub heading: f32,
    pub speed: f32,
    /// Last nearest centerline index (search starts here)
    pub nearest_index: usize,
    pub steering: Steering,
}

impl CarState {
    /// Car parked on the start line facing along the track
    pub fn on_start_line(track: &TrackData) -> Self {
        let (position, heading) = track.start_pose();
        Self {
            position,
            heading,
            speed: 0.0,
            nearest_index: 0,
            steering: Steering::default(),
        }
    }
}

/// A pickup in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupState {
    pub id: u32,
    pub position: Vec2,
    pub kind: PickupKind,
    pub taken: bool,
}

/// Build a fresh pickup field from the track template
pub fn spawn_pickups(track: &TrackData) -> Vec<PickupState> {
    track
        .pickups()
        .iter()
        .enumerate()
        .map(|(i, p)| PickupState {
            id: i as u32,
            position: p.position,
            kind: p.kind,
            taken: false,
        })
        .collect()
}

/// Final tally handed to the score service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub up: u32,
    pub down: u32,
    pub time_ms: f32,
    pub distance: f32,
}

/// Complete per-run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    pub car: CarState,
    /// Active pickups (sorted by id)
    pub pickups: Vec<PickupState>,
    pub phase: RunPhase,
    /// Countdown remaining (ms)
    pub timer_ms: f32,
    /// Countdown length this run started with (ms)
    pub duration_ms: f32,
    pub up: u32,
    pub down: u32,
    /// Total path length driven
    pub distance: f32,
    pub laps: u32,
    /// nearest_index / track length, in [0, 1)
    pub progress: f32,
    /// Run time (ms) when the last lap was credited
    pub last_lap_ms: f32,
    /// `distance` when the last lap was credited
    pub last_lap_distance: f32,
    /// Simulation tick counter
    pub ticks: u64,
}

impl RaceState {
    /// Create a new run on `track`
    pub fn new(track: &TrackData, tuning: &Tuning) -> Self {
        Self {
            car: CarState::on_start_line(track),
            pickups: spawn_pickups(track),
            phase: RunPhase::Running,
            timer_ms: tuning.run.duration_ms,
            duration_ms: tuning.run.duration_ms,
            up: 0,
            down: 0,
            distance: 0.0,
            laps: 0,
            progress: 0.0,
            last_lap_ms: 0.0,
            last_lap_distance: 0.0,
            ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Run time consumed so far (ms)
    pub fn elapsed_ms(&self) -> f32 {
        self.duration_ms - self.timer_ms
    }

    /// Pickups still on the track
    pub fn remaining_pickups(&self) -> impl Iterator<Item = &PickupState> {
        self.pickups.iter().filter(|p| !p.taken)
    }

    /// Put every pickup back
    pub fn respawn_pickups(&mut self) {
        for pickup in &mut self.pickups {
            pickup.taken = false;
        }
    }

    pub fn result(&self) -> RunResult {
        RunResult {
            up: self.up,
            down: self.down,
            time_ms: self.elapsed_ms(),
            distance: self.distance,
        }
    }
}
