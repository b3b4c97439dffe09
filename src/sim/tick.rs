//! Per-frame simulation step
//!
//! Order inside a frame: kinematics and misses, effect aging, combo expiry,
//! then slicing against the live trail. Input is only consumed here.

use glam::Vec2;

use super::collision::find_cuts;
use super::combo::{ComboState, swipe_bonus};
use super::effects::EffectsSystem;
use super::spawner::Spawner;
use super::state::{FallingObject, RunState};
use super::trail::Segment;
use crate::consts::SLICE_RADIUS_BONUS;

/// Inputs for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput<'a> {
    /// Seconds since the previous frame (already clamped)
    pub dt: f32,
    /// Scheduler clock (ms)
    pub now_ms: f64,
    /// Seconds since the run started
    pub elapsed_secs: f64,
    /// Live trail segments, oldest first
    pub segments: &'a [Segment],
}

/// What happened during a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Non-hazard objects that fell off the bottom
    pub missed: u32,
    /// Ids sliced this frame, in the order they were applied
    pub cut_ids: Vec<u32>,
    /// Score, lives or combo changed
    pub state_changed: bool,
    /// The run ended during this frame
    pub game_over: bool,
}

/// Everything the simulation mutates during a run
pub struct World {
    pub run: RunState,
    pub spawner: Spawner,
    pub combo: ComboState,
    pub effects: EffectsSystem,
    /// Non-hazard cuts in the current gesture
    pub swipe_cuts: u32,
    /// Where the most recent cut happened (combo banner anchor)
    pub last_cut_pos: Vec2,
}

fn effects_seed(seed: u64) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0x5EED
}

impl World {
    pub fn new(width: f32, height: f32, max_particles: usize, seed: u64) -> Self {
        Self {
            run: RunState::default(),
            spawner: Spawner::new(width, height, seed),
            combo: ComboState::new(),
            effects: EffectsSystem::new(max_particles, effects_seed(seed)),
            swipe_cuts: 0,
            last_cut_pos: Vec2::ZERO,
        }
    }

    /// Fresh run: full lives, empty field, no combo, no artifacts
    pub fn reset(&mut self, seed: u64) {
        self.run = RunState::started();
        self.spawner.reset(seed);
        self.combo.reset();
        self.effects.reset(effects_seed(seed));
        self.swipe_cuts = 0;
        self.last_cut_pos = Vec2::ZERO;
    }

    fn sync_combo(&mut self) {
        self.run.combo_count = self.combo.count;
        self.run.combo_multiplier = self.combo.multiplier;
    }

    fn score_key(&self) -> (u64, u32, u32, u32, bool) {
        (
            self.run.score,
            self.run.lives,
            self.run.combo_count,
            self.run.combo_multiplier,
            self.run.running,
        )
    }

    /// Apply one sliced object. Returns true if it ended the run.
    fn apply_cut(&mut self, obj: &FallingObject, now_ms: f64) -> bool {
        self.last_cut_pos = obj.pos;

        if obj.kind.hazard {
            let before = self.run.score;
            self.run.apply_points(obj.kind.points);
            self.combo.reset();
            self.swipe_cuts = 0;
            self.effects.spawn_hazard_burst(obj.pos);
            self.effects.spawn_penalty_text(obj.pos, before - self.run.score);
            self.sync_combo();
            return self.run.lose_life();
        }

        let multiplier = self.combo.on_hit(now_ms);
        self.run.apply_points(obj.kind.points * multiplier as i64);
        self.swipe_cuts += 1;
        self.effects.spawn_slice(obj);
        self.effects
            .spawn_score_text(obj.pos, obj.kind.points, multiplier);
        self.sync_combo();
        false
    }

    /// Award the multi-cut bonus for a gesture that just ended.
    ///
    /// Returns the bonus, if any. No-op while the run is not running.
    pub fn end_gesture(&mut self) -> Option<u64> {
        let cuts = std::mem::take(&mut self.swipe_cuts);
        if !self.run.running {
            return None;
        }
        let bonus = swipe_bonus(cuts);
        if bonus == 0 {
            return None;
        }
        self.run.apply_points(bonus as i64);
        self.effects
            .spawn_swipe_bonus(self.last_cut_pos, cuts, bonus);
        Some(bonus)
    }
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &FrameInput) -> FrameReport {
    let mut report = FrameReport::default();
    if !world.run.running {
        return report;
    }
    let before = world.score_key();
    world.run.elapsed_secs = input.elapsed_secs;

    let missed = world.spawner.advance(input.dt, input.elapsed_secs);
    for _ in &missed {
        report.missed += 1;
        if world.run.lose_life() {
            world.run.finish();
            report.game_over = true;
            break;
        }
    }

    world.effects.update();

    world.combo.check_expiry(input.now_ms);
    world.sync_combo();

    if world.run.running && !input.segments.is_empty() {
        let hits = find_cuts(input.segments, world.spawner.objects(), SLICE_RADIUS_BONUS);
        for id in hits {
            let Some(obj) = world.spawner.mark_cut(id) else {
                continue;
            };
            report.cut_ids.push(id);
            if world.apply_cut(&obj, input.now_ms) {
                world.run.finish();
                report.game_over = true;
                break;
            }
        }
    }

    report.state_changed = world.score_key() != before;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{COMBO_WINDOW_MS, MAX_LIVES};
    use crate::sim::effects::SLICE_PARTICLES;
    use crate::sim::state::{FRUIT_KINDS, HAZARD_KIND};

    fn world() -> World {
        let mut w = World::new(800.0, 600.0, 500, 42);
        w.reset(42);
        w
    }

    fn across(y: f32) -> [Segment; 1] {
        [Segment {
            start: Vec2::new(0.0, y),
            end: Vec2::new(800.0, y),
        }]
    }

    fn frame(now_ms: f64, segments: &[Segment]) -> FrameInput<'_> {
        FrameInput {
            dt: 0.0,
            now_ms,
            elapsed_secs: 0.1,
            segments,
        }
    }

    #[test]
    fn test_fruit_cut_scores_with_fresh_combo() {
        let mut w = world();
        let id = w.spawner.insert(&FRUIT_KINDS[5], Vec2::new(400.0, 300.0), Vec2::ZERO);

        let segs = across(300.0);
        let report = tick(&mut w, &frame(1000.0, &segs));

        assert_eq!(report.cut_ids, vec![id]);
        assert!(report.state_changed);
        assert_eq!(w.run.score, FRUIT_KINDS[5].points as u64);
        assert_eq!(w.run.combo_count, 1);
        assert_eq!(w.effects.particles.len(), SLICE_PARTICLES);
        assert_eq!(w.effects.halves.len(), 2);
        assert_eq!(w.swipe_cuts, 1);
    }

    #[test]
    fn test_combo_multiplies_later_cuts() {
        let mut w = world();
        for i in 0..3 {
            w.spawner.insert(&FRUIT_KINDS[0], Vec2::new(100.0 + i as f32 * 200.0, 300.0), Vec2::ZERO);
        }
        let segs = across(300.0);
        tick(&mut w, &frame(1000.0, &segs));
        // 1*1 + 1*2 + 1*2
        assert_eq!(w.run.score, 5);
        assert_eq!(w.run.combo_multiplier, 2);
    }

    #[test]
    fn test_hazard_cut_penalizes() {
        let mut w = world();
        w.run.score = 3;
        w.combo.on_hit(900.0);
        w.swipe_cuts = 1;
        w.spawner.insert(&HAZARD_KIND, Vec2::new(400.0, 300.0), Vec2::ZERO);

        let segs = across(300.0);
        let report = tick(&mut w, &frame(1000.0, &segs));

        assert_eq!(w.run.score, 0);
        assert_eq!(w.run.lives, MAX_LIVES - 1);
        assert_eq!(w.run.combo_count, 0);
        assert_eq!(w.swipe_cuts, 0);
        assert!(w.effects.halves.is_empty());
        assert!(!report.game_over);
        assert_eq!(w.effects.texts[0].text, "-3");
    }

    #[test]
    fn test_miss_costs_life_and_can_end_run() {
        let mut w = world();
        w.run.lives = 1;
        w.spawner.insert(&FRUIT_KINDS[0], Vec2::new(100.0, 1000.0), Vec2::ZERO);
        w.spawner.insert(&FRUIT_KINDS[1], Vec2::new(200.0, 300.0), Vec2::ZERO);

        let segs = across(300.0);
        let report = tick(&mut w, &frame(1000.0, &segs));

        assert_eq!(report.missed, 1);
        assert!(report.game_over);
        assert!(!w.run.running && w.run.game_over);
        assert!(report.cut_ids.is_empty(), "no slicing after the run ends");
    }

    #[test]
    fn test_hazard_miss_is_silent() {
        let mut w = world();
        w.spawner.insert(&HAZARD_KIND, Vec2::new(100.0, 1000.0), Vec2::ZERO);
        let report = tick(&mut w, &frame(1000.0, &[]));
        assert_eq!(report.missed, 0);
        assert_eq!(w.run.lives, MAX_LIVES);
        assert!(!report.state_changed);
    }

    #[test]
    fn test_combo_expires_without_hits() {
        let mut w = world();
        w.combo.on_hit(1000.0);
        w.combo.on_hit(1100.0);
        tick(&mut w, &frame(1100.0 + COMBO_WINDOW_MS - 1.0, &[]));
        assert_eq!(w.run.combo_multiplier, 2);
        let report = tick(&mut w, &frame(1100.0 + COMBO_WINDOW_MS + 1.0, &[]));
        assert_eq!(w.run.combo_multiplier, 1);
        assert!(report.state_changed);
    }

    #[test]
    fn test_tick_is_noop_when_not_running() {
        let mut w = World::new(800.0, 600.0, 500, 1);
        w.spawner.insert(&FRUIT_KINDS[0], Vec2::new(400.0, 300.0), Vec2::ZERO);
        let segs = across(300.0);
        let report = tick(&mut w, &FrameInput { dt: 0.1, now_ms: 0.0, elapsed_secs: 5.0, segments: &segs });
        assert_eq!(report, FrameReport::default());
        assert_eq!(w.spawner.objects().len(), 1);
        assert!(!w.spawner.objects()[0].is_cut());
    }

    #[test]
    fn test_end_gesture_bonus() {
        let mut w = world();
        w.swipe_cuts = 3;
        w.last_cut_pos = Vec2::new(10.0, 100.0);
        assert_eq!(w.end_gesture(), Some(6));
        assert_eq!(w.run.score, 6);
        assert_eq!(w.swipe_cuts, 0);

        w.swipe_cuts = 1;
        assert_eq!(w.end_gesture(), None);
        assert_eq!(w.swipe_cuts, 0);

        w.run.finish();
        w.swipe_cuts = 4;
        assert_eq!(w.end_gesture(), None);
        assert_eq!(w.run.score, 6);
    }
}
