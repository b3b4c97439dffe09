//! Combo tracking
//!
//! Slices that land within `COMBO_WINDOW_MS` of each other build a streak;
//! the streak length maps to a score multiplier.

use serde::{Deserialize, Serialize};

use crate::consts::COMBO_WINDOW_MS;

/// Multiplier for a streak length: 1 up to 1, 2 for 2-3, 3 for 4-6, 4 from 7
pub fn multiplier_for(count: u32) -> u32 {
    match count {
        0..=1 => 1,
        2..=3 => 2,
        4..=6 => 3,
        _ => 4,
    }
}

/// Bonus for cutting `cuts` objects in one gesture (0 below two)
pub fn swipe_bonus(cuts: u32) -> u64 {
    if cuts < 2 {
        return 0;
    }
    let n = cuts as u64;
    n * (n - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    pub multiplier: u32,
    pub last_hit_ms: Option<f64>,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            count: 0,
            multiplier: 1,
            last_hit_ms: None,
        }
    }
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    fn window_elapsed(&self, now_ms: f64) -> bool {
        self.last_hit_ms
            .is_none_or(|last| now_ms - last > COMBO_WINDOW_MS)
    }

    /// Register a slice. Returns the multiplier to apply to it.
    pub fn on_hit(&mut self, now_ms: f64) -> u32 {
        if self.window_elapsed(now_ms) {
            self.count = 0;
        }
        self.count += 1;
        self.multiplier = multiplier_for(self.count);
        self.last_hit_ms = Some(now_ms);
        self.multiplier
    }

    /// Drop a streak whose window has passed. Returns true if it was dropped.
    pub fn check_expiry(&mut self, now_ms: f64) -> bool {
        if self.count > 0 && self.window_elapsed(now_ms) {
            self.count = 0;
            self.multiplier = 1;
            return true;
        }
        false
    }

    /// Break the streak unconditionally (hazard hits, new runs)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multiplier_boundaries() {
        assert_eq!(multiplier_for(0), 1);
        assert_eq!(multiplier_for(1), 1);
        assert_eq!(multiplier_for(2), 2);
        assert_eq!(multiplier_for(3), 2);
        assert_eq!(multiplier_for(4), 3);
        assert_eq!(multiplier_for(6), 3);
        assert_eq!(multiplier_for(7), 4);
        assert_eq!(multiplier_for(500), 4);
    }

    #[test]
    fn test_swipe_bonus_values() {
        assert_eq!(swipe_bonus(0), 0);
        assert_eq!(swipe_bonus(1), 0);
        assert_eq!(swipe_bonus(2), 2);
        assert_eq!(swipe_bonus(3), 6);
        assert_eq!(swipe_bonus(4), 12);
        assert_eq!(swipe_bonus(5), 20);
    }

    #[test]
    fn test_hits_within_window_stack() {
        let mut combo = ComboState::new();
        assert_eq!(combo.on_hit(1000.0), 1);
        assert_eq!(combo.on_hit(1500.0), 2);
        assert_eq!(combo.on_hit(2000.0), 2);
        assert_eq!(combo.on_hit(2700.0), 3);
        assert_eq!(combo.count, 4);
    }

    #[test]
    fn test_gap_restarts_streak() {
        let mut combo = ComboState::new();
        combo.on_hit(1000.0);
        combo.on_hit(1100.0);
        assert_eq!(combo.on_hit(1100.0 + COMBO_WINDOW_MS + 1.0), 1);
        assert_eq!(combo.count, 1);
    }

    #[test]
    fn test_expiry_edges() {
        let mut combo = ComboState::new();
        combo.on_hit(5000.0);
        combo.on_hit(5100.0);
        assert_eq!(combo.multiplier, 2);

        assert!(!combo.check_expiry(5100.0 + COMBO_WINDOW_MS - 1.0));
        assert_eq!(combo.multiplier, 2);

        assert!(combo.check_expiry(5100.0 + COMBO_WINDOW_MS + 1.0));
        assert_eq!(combo.multiplier, 1);
        assert_eq!(combo.count, 0);

        assert!(!combo.check_expiry(1e9), "idle combo stays idle");
    }

    #[test]
    fn test_reset() {
        let mut combo = ComboState::new();
        combo.on_hit(10.0);
        combo.on_hit(20.0);
        combo.reset();
        assert_eq!(combo, ComboState::default());
    }

    proptest! {
        #[test]
        fn prop_multiplier_monotonic(a in 0u32..100, b in 0u32..100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(multiplier_for(lo) <= multiplier_for(hi));
            prop_assert!((1..=4).contains(&multiplier_for(a)));
        }
    }
}
