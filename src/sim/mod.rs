//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Stable iteration order (by object id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod difficulty;
pub mod effects;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod trail;

pub use collision::{find_cuts, segment_circle_intersects};
pub use combo::{ComboState, multiplier_for, swipe_bonus};
pub use difficulty::{DIFFICULTY_TABLE, DifficultyLevel, level_for, tier_for};
pub use effects::{EffectsSystem, FloatingText, HalfSide, Particle, SliceHalf};
pub use spawner::Spawner;
pub use state::{Category, FRUIT_KINDS, FallingObject, HAZARD_KIND, ObjectKind, RunState, Screen};
pub use tick::{FrameInput, FrameReport, World, tick};
pub use trail::{Gesture, InputTracker, Segment, TrailPoint};
