//! One race on one track, driven by the host's frame loop
//!
//! The session owns the per-run state and the latest steering input. It
//! emits the result exactly once and can be stopped explicitly, after which
//! frames are ignored even if the host keeps calling.

use std::rc::Rc;

use super::state::{RaceState, RunResult, Steering};
use super::tick::{TickInput, tick};
use super::track::TrackData;
use crate::error::ConfigError;
use crate::platform::FrameClock;
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct RaceSession {
    track: Rc<TrackData>,
    tuning: Tuning,
    state: RaceState,
    clock: FrameClock,
    input: TickInput,
    result: Option<RunResult>,
    stopped: bool,
}

impl RaceSession {
    pub fn new(track: Rc<TrackData>, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let state = RaceState::new(&track, &tuning);
        log::info!(
            "Race started on {} ({:.0}s, {} pickups)",
            track.seed(),
            tuning.run.duration_ms / 1000.0,
            state.pickups.len()
        );
        Ok(Self {
            track,
            tuning,
            state,
            clock: FrameClock::new(),
            input: TickInput::default(),
            result: None,
            stopped: false,
        })
    }

    /// Latest held keys; read at the start of the next tick
    pub fn set_steering(&mut self, steering: Steering) {
        self.input.steering = steering;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Advance using a display-refresh timestamp (ms)
    pub fn advance_frame(&mut self, timestamp_ms: f64) -> Option<RunResult> {
        if !self.is_active() {
            return None;
        }
        let dt = self.clock.delta(timestamp_ms, self.tuning.run.max_dt);
        self.step(dt)
    }

    /// Advance by an explicit `dt` in seconds
    pub fn step(&mut self, dt: f32) -> Option<RunResult> {
        if self.stopped {
            log::warn!("Tick after stop ignored");
            return None;
        }
        let result = tick(&mut self.state, &self.track, &self.input, dt, &self.tuning);
        if result.is_some() {
            self.result = result;
        }
        result
    }

    /// Tear down: no further ticks will touch the state
    pub fn stop(&mut self) {
        if !self.stopped {
            log::info!("Race on {} stopped after {} ticks", self.track.seed(), self.state.ticks);
        }
        self.stopped = true;
    }

    /// Fresh car and pickups on the same track
    pub fn restart(&mut self) {
        self.state = RaceState::new(&self.track, &self.tuning);
        self.clock.reset();
        self.input = TickInput::default();
        self.result = None;
        self.stopped = false;
    }

    /// True while frames still advance the run
    pub fn is_active(&self) -> bool {
        !self.stopped && self.state.is_running()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn track(&self) -> &TrackData {
        &self.track
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Final result, once the countdown has run out
    pub fn result(&self) -> Option<RunResult> {
        self.result
    }
}
