//! Object spawning and kinematics
//!
//! The spawner exclusively owns the live object set. Other systems get
//! read-only slices, and cuts go back through `mark_cut`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::{DifficultyLevel, level_for, tier_for};
use super::state::{FRUIT_KINDS, FallingObject, HAZARD_KIND, ObjectKind};
use crate::consts::*;

pub struct Spawner {
    objects: Vec<FallingObject>,
    width: f32,
    height: f32,
    rng: Pcg32,
    /// Run time (s) of the most recent wave
    last_wave_secs: f64,
    last_tier: usize,
    next_id: u32,
}

impl Spawner {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            objects: Vec::new(),
            width,
            height,
            rng: Pcg32::seed_from_u64(seed),
            last_wave_secs: 0.0,
            last_tier: 0,
            next_id: 0,
        }
    }

    /// Clear everything for a new run. Ids restart at zero.
    pub fn reset(&mut self, seed: u64) {
        self.objects.clear();
        self.rng = Pcg32::seed_from_u64(seed);
        self.last_wave_secs = 0.0;
        self.last_tier = 0;
        self.next_id = 0;
    }

    /// Rescale bounds for future spawns and miss checks. Existing objects keep their positions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn objects(&self) -> &[FallingObject] {
        &self.objects
    }

    fn next_object_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an object directly (scripted setups and tests)
    pub fn insert(&mut self, kind: &'static ObjectKind, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_object_id();
        self.objects.push(FallingObject::new(id, kind, pos, vel));
        id
    }

    fn pick_kind(&mut self, hazard_probability: f64) -> &'static ObjectKind {
        if self.rng.random::<f64>() < hazard_probability {
            &HAZARD_KIND
        } else {
            &FRUIT_KINDS[self.rng.random_range(0..FRUIT_KINDS.len())]
        }
    }

    fn spawn_one(&mut self, kind: &'static ObjectKind, fall_speed: f32) -> u32 {
        let margin = kind.radius + SPAWN_PAD;
        let span = self.width - margin * 2.0;
        let x = if span > 0.0 {
            margin + self.rng.random::<f32>() * span
        } else {
            self.width / 2.0
        };
        let vx = (self.rng.random::<f32>() - 0.5) * 2.0 * SPAWN_DRIFT;

        let id = self.next_object_id();
        let mut obj = FallingObject::new(id, kind, Vec2::new(x, -kind.radius), Vec2::new(vx, fall_speed));
        obj.rotation = self.rng.random::<f32>() * std::f32::consts::TAU;
        obj.spin = (self.rng.random::<f32>() - 0.5) * 2.0 * SPAWN_SPIN;
        self.objects.push(obj);
        id
    }

    /// Spawn one wave for a difficulty tier. Returns the new ids.
    pub fn spawn_wave(&mut self, level: &DifficultyLevel) -> Vec<u32> {
        (0..level.objects_per_wave)
            .map(|_| {
                let kind = self.pick_kind(level.hazard_probability);
                self.spawn_one(kind, level.fall_speed)
            })
            .collect()
    }

    /// Advance by `dt` seconds at run time `elapsed_secs`.
    ///
    /// Returns non-hazard objects that fell off the bottom this call.
    /// Hazards that fall off are flagged but not reported.
    pub fn advance(&mut self, dt: f32, elapsed_secs: f64) -> Vec<FallingObject> {
        let tier = tier_for(elapsed_secs);
        if tier != self.last_tier {
            log::debug!("Difficulty tier {} -> {} at {:.1}s", self.last_tier, tier, elapsed_secs);
            self.last_tier = tier;
        }

        let level = level_for(elapsed_secs);
        if elapsed_secs - self.last_wave_secs >= level.spawn_interval_secs {
            let ids = self.spawn_wave(&level);
            log::debug!("Wave of {} at {:.1}s", ids.len(), elapsed_secs);
            self.last_wave_secs = elapsed_secs;
        }

        let bottom = self.height;
        let mut missed = Vec::new();
        for obj in self.objects.iter_mut().filter(|o| !o.is_cut()) {
            obj.pos += obj.vel * dt;
            obj.rotation += obj.spin * dt;

            if obj.pos.y > bottom + obj.kind.radius * 2.0 && obj.mark_missed() && !obj.kind.hazard {
                missed.push(obj.clone());
            }
        }

        self.objects
            .retain(|o| !(o.is_cut() || (o.is_missed() && o.pos.y > bottom + MISS_PURGE_MARGIN)));

        missed
    }

    /// Flag a live object as cut. Returns a copy for effects, or None if
    /// the id is gone or was already cut or missed.
    pub fn mark_cut(&mut self, id: u32) -> Option<FallingObject> {
        let obj = self.objects.iter_mut().find(|o| o.id == id)?;
        if obj.is_missed() || !obj.mark_cut() {
            return None;
        }
        Some(obj.clone())
    }
}
