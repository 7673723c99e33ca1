//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Track is a function of (identifier, date, options) only
//! - Seeded RNG only, owned per generator
//! - Stable iteration order (pickups by id)
//! - No rendering or platform dependencies beyond the frame clock

pub mod autopilot;
pub mod collision;
pub mod geom;
pub mod noise;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{RoadContact, nearest_index};
pub use geom::{catmull_rom, compute_normals, resample_closed};
pub use noise::ValueNoise1D;
pub use rng::TrackRng;
pub use session::RaceSession;
pub use state::{CarState, PickupState, RaceState, RunPhase, RunResult, Steering};
pub use tick::{TickInput, tick};
pub use track::{
    Pickup, PickupKind, TrackCache, TrackData, TrackOptions, daily_seed, generate_daily_track,
    generate_track, generate_track_from_seed,
};
