//! Drawing helpers for the host page
//!
//! Turns simulation state into canvas-space primitives. Nothing here feeds
//! back into the simulation; the host can draw with whatever it likes.

use glam::Vec2;

use crate::consts::{CAR_HALF_WIDTH, CAR_LENGTH};
use crate::heading_vector;
use crate::sim::{PickupKind, RaceState, TrackData};

pub const CANVAS_PADDING: f32 = 24.0;

/// Color palette (CSS strings)
pub mod palette {
    pub const BACKGROUND: &str = "#1a1a1a";
    pub const ROAD: &str = "#3b3b3b";
    pub const CENTERLINE: &str = "rgba(255,255,255,0.18)";
    pub const HUD: &str = "rgba(255,255,255,0.9)";
    pub const CAR: &str = "#ff5700";
    pub const CAR_NOSE: &str = "#FFFFFF";
    pub const UP: &str = "#4CAF50";
    pub const DOWN: &str = "#E53935";
}

/// Uniform world-to-canvas transform that fits a point set into a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: Vec2,
}

impl Viewport {
    /// Fit the bounding box of `points` into `width` x `height`, centered,
    /// leaving `padding` on every side
    pub fn fit(points: &[Vec2], width: f32, height: f32, padding: f32) -> Self {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let size = (max - min).max(Vec2::splat(f32::EPSILON));
        let sx = (width - padding * 2.0) / size.x;
        let sy = (height - padding * 2.0) / size.y;
        let scale = sx.min(sy).max(0.0);
        let offset = (Vec2::new(width, height) - size * scale) / 2.0 - min * scale;
        Self { scale, offset }
    }

    #[inline]
    pub fn to_canvas(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }
}

/// Road edges, index-aligned with the centerline
#[derive(Debug, Clone)]
pub struct RoadOutline {
    pub left: Vec<Vec2>,
    pub right: Vec<Vec2>,
}

impl RoadOutline {
    pub fn new(track: &TrackData) -> Self {
        let edge = |sign: f32| -> Vec<Vec2> {
            (0..track.len())
                .map(|i| track.center()[i] + track.normals()[i] * (sign * track.half_width(i)))
                .collect()
        };
        Self {
            left: edge(1.0),
            right: edge(-1.0),
        }
    }

    /// Closed polygon: left edge forward, right edge back
    pub fn polygon(&self) -> Vec<Vec2> {
        self.left
            .iter()
            .chain(self.right.iter().rev())
            .copied()
            .collect()
    }
}

/// Finish line across the road at the first centerline point (left, right)
pub fn finish_line(track: &TrackData) -> (Vec2, Vec2) {
    let half = track.half_width(0);
    let c = track.center()[0];
    let n = track.normals()[0];
    (c + n * half, c - n * half)
}

/// Alternating black/white pieces of the finish line
pub fn finish_line_checkers(track: &TrackData, segments: usize) -> Vec<(Vec2, Vec2, bool)> {
    let (a, b) = finish_line(track);
    (0..segments)
        .map(|i| {
            let t0 = i as f32 / segments as f32;
            let t1 = (i + 1) as f32 / segments as f32;
            (a.lerp(b, t0), a.lerp(b, t1), i % 2 == 0)
        })
        .collect()
}

/// How to draw the car
#[derive(Debug, Clone, PartialEq)]
pub enum CarSprite {
    /// Circular avatar image centered on the car, plus a nose dot
    Avatar {
        center: Vec2,
        radius: f32,
        heading: f32,
        nose: Vec2,
    },
    /// Fallback triangle when no avatar is available
    Triangle { points: [Vec2; 3], nose: Vec2 },
}

/// Car sprite in world space
pub fn car_sprite(position: Vec2, heading: f32, has_avatar: bool) -> CarSprite {
    let forward = heading_vector(heading);
    if has_avatar {
        return CarSprite::Avatar {
            center: position,
            radius: CAR_LENGTH / 2.0,
            heading,
            nose: position + forward * (CAR_LENGTH * 0.6),
        };
    }
    let left = forward.perp();
    let rear = position - forward * (CAR_LENGTH * 0.6);
    CarSprite::Triangle {
        points: [
            position + forward * CAR_LENGTH,
            rear + left * CAR_HALF_WIDTH,
            rear - left * CAR_HALF_WIDTH,
        ],
        nose: position + forward * (CAR_LENGTH + 1.5),
    }
}

/// Visible pickups with their colors
pub fn visible_pickups(state: &RaceState) -> impl Iterator<Item = (Vec2, &'static str)> + '_ {
    state.remaining_pickups().map(|p| {
        let color = match p.kind {
            PickupKind::Up => palette::UP,
            PickupKind::Down => palette::DOWN,
        };
        (p.position, color)
    })
}

/// HUD text, top to bottom
pub fn hud_lines(state: &RaceState) -> Vec<String> {
    vec![
        format!("Time: {:.1}s", (state.timer_ms / 1000.0).max(0.0)),
        format!("↑ {}  ↓ {}", state.up, state.down),
        format!("Laps: {}", state.laps),
        format!("Speed: {:.1}", state.car.speed),
        format!("Distance: {:.0}m", state.distance),
    ]
}
