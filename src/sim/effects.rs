//! Visual feedback artifacts
//!
//! Juice particles, split halves and floating score text. Nothing in here
//! feeds back into the simulation; artifacts are aged once per frame with
//! fixed per-frame rates and dropped when fully faded.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{FallingObject, ObjectKind};
use crate::consts::EFFECT_GRAVITY;
use crate::{Rgba, rgb, unit_from_angle};

/// Juice particles per fruit slice
pub const SLICE_PARTICLES: usize = 14;
/// Particles per hazard burst
pub const HAZARD_PARTICLES: usize = 24;
/// Alpha lost per frame by a split half
pub const HALF_FADE: f32 = 0.012;
/// Alpha lost per frame by floating text
pub const TEXT_FADE: f32 = 0.015;
/// Half-turn spin per frame for split halves
pub const HALF_SPIN: f32 = 0.12;

const TEXT_WHITE: Rgba = rgb(0xffffff);
const TIER2_BLUE: Rgba = rgb(0x3498db);
const TIER3_RED: Rgba = rgb(0xe74c3c);
const TIER4_GOLD: Rgba = rgb(0xf0b90b);
const BONUS_GREEN: Rgba = rgb(0x00ff88);
const BURST_RED: Rgba = rgb(0xe74c3c);
const BURST_ORANGE: Rgba = rgb(0xf39c12);

/// A round juice droplet
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub alpha: f32,
    /// Alpha lost per frame
    pub decay: f32,
}

/// Which half of a sliced object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfSide {
    Left,
    Right,
}

/// One half of a sliced object flying off
#[derive(Debug, Clone)]
pub struct SliceHalf {
    pub kind: &'static ObjectKind,
    pub side: HalfSide,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub spin: f32,
    pub alpha: f32,
}

/// Rising score label
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: Rgba,
    pub alpha: f32,
    /// Pixels per frame (negative rises)
    pub vy: f32,
    pub scale: f32,
}

/// Color and scale tier for a score label at a multiplier
pub fn multiplier_style(multiplier: u32) -> (Rgba, f32) {
    match multiplier {
        0..=1 => (TEXT_WHITE, 1.0),
        2 => (TIER2_BLUE, 1.2),
        3 => (TIER3_RED, 1.4),
        _ => (TIER4_GOLD, 1.4),
    }
}

/// Banner color for an active combo
pub fn combo_color(multiplier: u32) -> Rgba {
    match multiplier {
        0..=2 => TIER2_BLUE,
        3 => TIER3_RED,
        _ => TIER4_GOLD,
    }
}

fn score_label(total: i64, multiplier: u32) -> String {
    match multiplier {
        0..=1 => format!("+{total}"),
        2..=3 => format!("+{total} x{multiplier}"),
        _ => format!("+{total} x{multiplier}!"),
    }
}

pub struct EffectsSystem {
    pub particles: Vec<Particle>,
    pub halves: Vec<SliceHalf>,
    pub texts: Vec<FloatingText>,
    max_particles: usize,
    rng: Pcg32,
}

impl EffectsSystem {
    pub fn new(max_particles: usize, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            halves: Vec::new(),
            texts: Vec::new(),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Drop every artifact and reseed
    pub fn reset(&mut self, seed: u64) {
        self.particles.clear();
        self.halves.clear();
        self.texts.clear();
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles;
        self.trim_particles();
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.halves.is_empty() && self.texts.is_empty()
    }

    fn trim_particles(&mut self) {
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    fn burst(
        &mut self,
        at: Vec2,
        count: usize,
        speed: (f32, f32),
        radius: (f32, f32),
        decay: (f32, f32),
        color_for: impl Fn(usize) -> Rgba,
    ) {
        for i in 0..count {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = speed.0 + self.rng.random::<f32>() * (speed.1 - speed.0);
            let particle = Particle {
                pos: at,
                vel: unit_from_angle(angle) * speed,
                radius: radius.0 + self.rng.random::<f32>() * (radius.1 - radius.0),
                color: color_for(i),
                alpha: 1.0,
                decay: decay.0 + self.rng.random::<f32>() * (decay.1 - decay.0),
            };
            self.push_particle(particle);
        }
    }

    /// Juice burst plus two halves for a sliced non-hazard object
    pub fn spawn_slice(&mut self, obj: &FallingObject) {
        let juice = obj.kind.juice_color();
        self.burst(obj.pos, SLICE_PARTICLES, (2.0, 7.0), (3.0, 8.0), (0.015, 0.025), |_| juice);

        for side in [HalfSide::Left, HalfSide::Right] {
            let dir = match side {
                HalfSide::Left => -1.0,
                HalfSide::Right => 1.0,
            };
            let vx = dir * (3.0 + self.rng.random::<f32>() * 2.0);
            let vy = 1.0 + self.rng.random::<f32>() * 2.0;
            self.halves.push(SliceHalf {
                kind: obj.kind,
                side,
                pos: obj.pos,
                vel: Vec2::new(vx, vy),
                rotation: obj.rotation,
                spin: dir * HALF_SPIN,
                alpha: 1.0,
            });
        }
    }

    /// Larger two-tone burst for a sliced hazard
    pub fn spawn_hazard_burst(&mut self, at: Vec2) {
        self.burst(at, HAZARD_PARTICLES, (4.0, 11.0), (3.0, 9.0), (0.02, 0.03), |i| {
            if i % 2 == 0 { BURST_RED } else { BURST_ORANGE }
        });
    }

    /// Label for a fruit slice worth `points * multiplier`
    pub fn spawn_score_text(&mut self, at: Vec2, points: i64, multiplier: u32) {
        let (color, scale) = multiplier_style(multiplier);
        self.texts.push(FloatingText {
            pos: at,
            text: score_label(points * multiplier as i64, multiplier),
            color,
            alpha: 1.0,
            vy: -2.0,
            scale,
        });
    }

    /// Label for the score actually lost to a hazard
    pub fn spawn_penalty_text(&mut self, at: Vec2, lost: u64) {
        self.texts.push(FloatingText {
            pos: at,
            text: format!("-{lost}"),
            color: TIER3_RED,
            alpha: 1.0,
            vy: -2.0,
            scale: 1.2,
        });
    }

    /// Label for an end-of-gesture multi-cut bonus
    pub fn spawn_swipe_bonus(&mut self, at: Vec2, cuts: u32, bonus: u64) {
        self.texts.push(FloatingText {
            pos: at - Vec2::new(0.0, 40.0),
            text: format!("SWIPE x{cuts}! +{bonus}"),
            color: BONUS_GREEN,
            alpha: 1.0,
            vy: -3.0,
            scale: 1.3 + cuts as f32 * 0.1,
        });
    }

    /// Age everything by one frame and drop faded artifacts
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += EFFECT_GRAVITY * 0.4;
            p.alpha -= p.decay;
        }
        self.particles.retain(|p| p.alpha > 0.0);

        for h in &mut self.halves {
            h.pos += h.vel;
            h.vel.y += EFFECT_GRAVITY * 0.5;
            h.rotation += h.spin;
            h.alpha -= HALF_FADE;
        }
        self.halves.retain(|h| h.alpha > 0.0);

        for t in &mut self.texts {
            t.pos.y += t.vy;
            t.alpha -= TEXT_FADE;
        }
        self.texts.retain(|t| t.alpha > 0.0);
    }
}
