//! Fruit Slash - A swipe-to-slice falling fruit arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, slicing, combos, effects)
//! - `engine`: Frame loop orchestration and the menu/playing/game-over screens
//! - `renderer`: Drawing-operations interface and the scene draw pass
//! - `platform`: Frame scheduling and input binding abstractions
//! - `persistence`: Best-score and leaderboard collaborator contracts

pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{Engine, EngineOptions, Snapshot};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Lives at the start of every run
    pub const MAX_LIVES: u32 = 3;
    /// Maximum gap between two slices that keeps a combo alive (ms)
    pub const COMBO_WINDOW_MS: f64 = 800.0;
    /// Trail points older than this drop out of the live trail (ms)
    pub const TRAIL_LIFETIME_MS: f64 = 200.0;
    /// Extra hit radius so fast, sparsely sampled swipes still connect
    pub const SLICE_RADIUS_BONUS: f32 = 18.0;

    /// Horizontal pad added to an object's radius when choosing spawn x
    pub const SPAWN_PAD: f32 = 10.0;
    /// Max horizontal drift speed at spawn (pixels/s, either direction)
    pub const SPAWN_DRIFT: f32 = 60.0;
    /// Max spin speed at spawn (radians/s, either direction)
    pub const SPAWN_SPIN: f32 = 2.4;
    /// Missed objects are purged once this far below the canvas bottom
    pub const MISS_PURGE_MARGIN: f32 = 100.0;

    /// Clamp on a single frame's delta time (seconds) after tab stalls
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Per-frame downward bias for effect artifacts (pixels/frame²)
    pub const EFFECT_GRAVITY: f32 = 0.15;

    /// Default canvas size used before the host reports a real one
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
}

/// RGBA color in linear 0-1 components
pub type Rgba = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
#[inline]
pub const fn rgb(hex: u32) -> Rgba {
    rgba(hex, 1.0)
}

/// Build a color from a 0xRRGGBB literal and alpha
#[inline]
pub const fn rgba(hex: u32, alpha: f32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// CSS `rgba()` string for a color (used by the canvas surface and DOM HUD)
pub fn css_color(color: Rgba) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3].clamp(0.0, 1.0)
    )
}

/// Unit vector for an angle (radians)
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
