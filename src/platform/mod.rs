//! Platform abstraction layer
//!
//! The engine never touches the browser directly. It asks a
//! `FrameScheduler` for the clock and the next frame, and holds
//! `InputBinding`s it must release on teardown.

use glam::Vec2;

/// Map a client-space pointer position onto the canvas backing store.
///
/// `rect_origin`/`rect_size` are the element's bounding rect in client
/// pixels, `canvas_size` its drawing-buffer size.
pub fn client_to_canvas(client: Vec2, rect_origin: Vec2, rect_size: Vec2, canvas_size: Vec2) -> Vec2 {
    let local = client - rect_origin;
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return local;
    }
    local * (canvas_size / rect_size)
}

/// Host frame loop (requestAnimationFrame on the web)
pub trait FrameScheduler {
    /// Request one more frame callback
    fn schedule_next(&mut self);
    /// Drop any pending frame request
    fn cancel(&mut self);
    /// Monotonic clock in milliseconds
    fn now_ms(&self) -> f64;
}

/// A registered set of input listeners
pub trait InputBinding {
    fn unbind(&mut self);
}

/// Scheduler driven by hand (native runs and tests)
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    now_ms: f64,
    pending: bool,
    pub scheduled: u32,
    pub cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    pub fn advance_ms(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request. Returns true if a frame was requested.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) {
        self.pending = true;
        self.scheduled += 1;
    }

    fn cancel(&mut self) {
        if self.pending {
            self.cancelled += 1;
        }
        self.pending = false;
    }

    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
