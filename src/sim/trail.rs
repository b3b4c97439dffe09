//! Pointer trail tracking
//!
//! Turns press/move/release samples into a time-ordered trail. Only points
//! younger than `TRAIL_LIFETIME_MS` are live, so a held pointer's trail
//! fades even mid-gesture.

use glam::Vec2;

use crate::consts::TRAIL_LIFETIME_MS;

/// One pointer sample in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub time_ms: f64,
}

impl TrailPoint {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            pos: Vec2::new(x, y),
            time_ms,
        }
    }
}

/// Pair of consecutive live trail points, oldest first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Default)]
pub struct InputTracker {
    gesture: Gesture,
    points: Vec<TrailPoint>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture == Gesture::Active
    }

    fn accept(x: f32, y: f32) -> bool {
        if x.is_finite() && y.is_finite() {
            return true;
        }
        log::debug!("Dropping non-finite pointer sample ({x}, {y})");
        false
    }

    /// Pointer down: start a fresh gesture at this point
    pub fn press(&mut self, x: f32, y: f32, time_ms: f64) {
        self.gesture = Gesture::Active;
        self.points.clear();
        if Self::accept(x, y) {
            self.points.push(TrailPoint::new(x, y, time_ms));
        }
    }

    /// Pointer move: append while a gesture is active. Returns whether the sample was kept.
    pub fn move_to(&mut self, x: f32, y: f32, time_ms: f64) -> bool {
        if self.gesture != Gesture::Active || !Self::accept(x, y) {
            return false;
        }
        self.points.push(TrailPoint::new(x, y, time_ms));
        true
    }

    /// Pointer up/cancel: clear the buffer. Returns true if a gesture was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.gesture == Gesture::Active;
        self.gesture = Gesture::Idle;
        self.points.clear();
        was_active
    }

    /// Every buffered point, including stale ones
    pub fn buffered(&self) -> &[TrailPoint] {
        &self.points
    }

    /// Points younger than the trail lifetime, oldest first
    pub fn live_trail(&self, now_ms: f64) -> &[TrailPoint] {
        let first_live = self
            .points
            .partition_point(|p| now_ms - p.time_ms >= TRAIL_LIFETIME_MS);
        &self.points[first_live..]
    }

    /// Consecutive pairs of the live trail, oldest first
    pub fn live_segments(&self, now_ms: f64) -> Vec<Segment> {
        self.live_trail(now_ms)
            .windows(2)
            .map(|w| Segment {
                start: w[0].pos,
                end: w[1].pos,
            })
            .collect()
    }
}
