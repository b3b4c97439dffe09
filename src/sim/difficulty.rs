//! Difficulty curve
//!
//! A fixed step table keyed by elapsed run time. The last tier whose
//! threshold is not after the elapsed time wins.

use serde::{Deserialize, Serialize};

/// Spawn parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    /// Seconds between waves
    pub spawn_interval_secs: f64,
    pub objects_per_wave: u32,
    /// Chance each spawned object is a hazard (0-1)
    pub hazard_probability: f64,
    /// Initial downward speed (pixels/s)
    pub fall_speed: f32,
}

/// (threshold seconds, tier), ascending by threshold
pub const DIFFICULTY_TABLE: [(f64, DifficultyLevel); 5] = [
    (
        0.0,
        DifficultyLevel {
            spawn_interval_secs: 1.8,
            objects_per_wave: 2,
            hazard_probability: 0.0,
            fall_speed: 72.0,
        },
    ),
    (
        15.0,
        DifficultyLevel {
            spawn_interval_secs: 1.5,
            objects_per_wave: 2,
            hazard_probability: 0.05,
            fall_speed: 108.0,
        },
    ),
    (
        30.0,
        DifficultyLevel {
            spawn_interval_secs: 1.2,
            objects_per_wave: 3,
            hazard_probability: 0.08,
            fall_speed: 150.0,
        },
    ),
    (
        60.0,
        DifficultyLevel {
            spawn_interval_secs: 1.0,
            objects_per_wave: 3,
            hazard_probability: 0.10,
            fall_speed: 192.0,
        },
    ),
    (
        90.0,
        DifficultyLevel {
            spawn_interval_secs: 0.8,
            objects_per_wave: 4,
            hazard_probability: 0.12,
            fall_speed: 240.0,
        },
    ),
];

/// Index into `DIFFICULTY_TABLE` for an elapsed time
pub fn tier_for(elapsed_secs: f64) -> usize {
    DIFFICULTY_TABLE
        .iter()
        .rposition(|(threshold, _)| *threshold <= elapsed_secs)
        .unwrap_or(0)
}

/// Difficulty tier for an elapsed time. Total: negative or NaN input gets the lowest tier.
pub fn level_for(elapsed_secs: f64) -> DifficultyLevel {
    DIFFICULTY_TABLE[tier_for(elapsed_secs)].1
}
