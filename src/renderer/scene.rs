//! Scene draw pass
//!
//! Stateless: everything drawn comes from the `Scene` borrowed for this
//! frame. Draw order is background, trail, objects, halves, particles,
//! texts, combo banner.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::DrawSurface;
use crate::sim::effects::{EffectsSystem, FloatingText, HalfSide, Particle, SliceHalf, combo_color};
use crate::sim::state::{FallingObject, ObjectKind};
use crate::sim::trail::TrailPoint;
use crate::{Rgba, Settings, rgb, rgba};

const BG_TOP: Rgba = rgb(0x0a0a1a);
const BG_BOTTOM: Rgba = rgb(0x1a1a3e);
const SHADOW: Rgba = rgba(0x000000, 0.2);
const HIGHLIGHT: Rgba = rgba(0xffffff, 0.35);
const LEAF: Rgba = rgb(0x27ae60);
const CUT_FACE: Rgba = rgb(0xfff8e0);
const BOMB_OUTLINE: Rgba = rgb(0x1a1a1a);
const FUSE: Rgba = rgb(0x888888);
const SPARK: Rgba = rgb(0xf39c12);
const BOMB_MARK: Rgba = rgb(0xe74c3c);

/// Base font size for floating text at scale 1
const TEXT_SIZE: f32 = 24.0;
const BANNER_SIZE: f32 = 36.0;
/// Banner sits this far above the last cut
const BANNER_OFFSET: f32 = 60.0;
const FLESH_RATIO: f32 = 0.7;

/// Toggles the draw pass reads from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub glow: bool,
    pub combo_banner: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            glow: true,
            combo_banner: true,
        }
    }
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            glow: settings.effective_glow(),
            combo_banner: settings.combo_banner,
        }
    }
}

/// Borrowed view of everything visible this frame
pub struct Scene<'a> {
    pub objects: &'a [FallingObject],
    /// Live trail, oldest first
    pub trail: &'a [TrailPoint],
    pub effects: &'a EffectsSystem,
    pub combo_count: u32,
    pub combo_multiplier: u32,
    pub last_cut_pos: Vec2,
}

pub struct Renderer {
    width: f32,
    height: f32,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(width: f32, height: f32, options: RenderOptions) -> Self {
        Self {
            width,
            height,
            options,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    fn glow(&self, radius: f32) -> f32 {
        if self.options.glow { radius } else { 0.0 }
    }

    /// Draw one full frame
    pub fn render<D: DrawSurface + ?Sized>(&self, surface: &mut D, scene: &Scene) {
        surface.fill_background(self.size(), BG_TOP, BG_BOTTOM);

        self.draw_trail(surface, scene.trail);

        for obj in scene.objects.iter().filter(|o| !o.is_cut()) {
            draw_object(surface, obj);
        }
        for half in &scene.effects.halves {
            draw_half(surface, half);
        }
        for p in &scene.effects.particles {
            draw_particle(surface, p);
        }
        for text in &scene.effects.texts {
            self.draw_text(surface, text);
        }

        if self.options.combo_banner && scene.combo_count >= 2 {
            let color = combo_color(scene.combo_multiplier);
            surface.fill_text(
                &format!("x{} COMBO!", scene.combo_multiplier),
                scene.last_cut_pos - Vec2::new(0.0, BANNER_OFFSET),
                BANNER_SIZE,
                color,
                self.glow(20.0),
            );
        }
    }

    /// Blade trail: thin and faint at the tail, thick and bright at the head
    fn draw_trail<D: DrawSurface + ?Sized>(&self, surface: &mut D, trail: &[TrailPoint]) {
        if trail.len() < 2 {
            return;
        }
        let len = trail.len() as f32;
        for (i, pair) in trail.windows(2).enumerate() {
            let t = (i + 1) as f32 / len;
            surface.stroke_line(pair[0].pos, pair[1].pos, 4.0 + t * 8.0, rgba(0xffffff, t * 0.9));
        }

        if trail.len() > 2 {
            let head = trail[trail.len() - 1].pos;
            surface.fill_circle(head, 12.0, rgba(0xffffff, 0.3));
        }
    }

    fn draw_text<D: DrawSurface + ?Sized>(&self, surface: &mut D, text: &FloatingText) {
        surface.save();
        surface.set_alpha(text.alpha);
        surface.fill_text(
            &text.text,
            text.pos,
            (TEXT_SIZE * text.scale).round(),
            text.color,
            self.glow(12.0),
        );
        surface.restore();
    }
}

fn draw_object<D: DrawSurface + ?Sized>(surface: &mut D, obj: &FallingObject) {
    surface.save();
    surface.translate(obj.pos);
    surface.rotate(obj.rotation);
    if obj.kind.hazard {
        draw_bomb(surface, obj.kind);
    } else {
        draw_fruit(surface, obj.kind);
    }
    surface.restore();
}

fn draw_bomb<D: DrawSurface + ?Sized>(surface: &mut D, kind: &ObjectKind) {
    let r = kind.radius;
    surface.fill_circle(Vec2::ZERO, r, kind.color);
    surface.stroke_circle(Vec2::ZERO, r, 3.0, BOMB_OUTLINE);

    surface.stroke_line(Vec2::new(0.0, -r), Vec2::new(4.0, -r - 14.0), 3.0, FUSE);
    surface.fill_circle(Vec2::new(4.0, -r - 16.0), 5.0, SPARK);

    let s = r * 0.35;
    surface.stroke_line(Vec2::new(-s, -s), Vec2::new(s, s), 4.0, BOMB_MARK);
    surface.stroke_line(Vec2::new(s, -s), Vec2::new(-s, s), 4.0, BOMB_MARK);
}

fn draw_fruit<D: DrawSurface + ?Sized>(surface: &mut D, kind: &ObjectKind) {
    let r = kind.radius;
    surface.fill_circle(Vec2::splat(3.0), r, SHADOW);
    surface.fill_circle(Vec2::ZERO, r, kind.color);
    if let Some(inner) = kind.inner_color {
        surface.fill_circle(Vec2::ZERO, r * FLESH_RATIO, inner);
    }
    surface.fill_circle(Vec2::splat(-r * 0.25), r * 0.3, HIGHLIGHT);
    if kind.has_leaf() {
        surface.fill_ellipse(Vec2::new(2.0, -r - 5.0), Vec2::new(8.0, 12.0), 0.3, LEAF);
    }
}

fn draw_half<D: DrawSurface + ?Sized>(surface: &mut D, half: &SliceHalf) {
    let kind = half.kind;
    let r = kind.radius;
    let (start, end) = match half.side {
        HalfSide::Left => (FRAC_PI_2, PI + FRAC_PI_2),
        HalfSide::Right => (-FRAC_PI_2, FRAC_PI_2),
    };

    surface.save();
    surface.set_alpha(half.alpha);
    surface.translate(half.pos);
    surface.rotate(half.rotation % TAU);

    surface.fill_sector(Vec2::ZERO, r, start, end, kind.color);
    if let Some(inner) = kind.inner_color {
        surface.fill_sector(Vec2::ZERO, r * FLESH_RATIO, start, end, inner);
    }
    let face = kind.inner_color.unwrap_or(CUT_FACE);
    surface.stroke_line(Vec2::new(0.0, -r), Vec2::new(0.0, r), 3.0, face);

    surface.restore();
}

fn draw_particle<D: DrawSurface + ?Sized>(surface: &mut D, p: &Particle) {
    surface.save();
    surface.set_alpha(p.alpha);
    surface.fill_circle(p.pos, p.radius, p.color);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FRUIT_KINDS, HAZARD_KIND};

    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
        depth: i32,
    }

    impl DrawSurface for Recorder {
        fn save(&mut self) {
            self.depth += 1;
        }
        fn restore(&mut self) {
            self.depth -= 1;
        }
        fn translate(&mut self, _: Vec2) {}
        fn rotate(&mut self, _: f32) {}
        fn set_alpha(&mut self, _: f32) {}
        fn fill_background(&mut self, _: Vec2, _: Rgba, _: Rgba) {
            self.ops.push("bg".into());
        }
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Rgba) {
            self.ops.push("circle".into());
        }
        fn stroke_circle(&mut self, _: Vec2, _: f32, _: f32, _: Rgba) {
            self.ops.push("ring".into());
        }
        fn fill_sector(&mut self, _: Vec2, _: f32, _: f32, _: f32, _: Rgba) {
            self.ops.push("sector".into());
        }
        fn fill_ellipse(&mut self, _: Vec2, _: Vec2, _: f32, _: Rgba) {
            self.ops.push("ellipse".into());
        }
        fn stroke_line(&mut self, _: Vec2, _: Vec2, _: f32, _: Rgba) {
            self.ops.push("line".into());
        }
        fn fill_text(&mut self, text: &str, _: Vec2, _: f32, _: Rgba, _: f32) {
            self.ops.push(format!("text:{text}"));
        }
    }

    fn count(rec: &Recorder, op: &str) -> usize {
        rec.ops.iter().filter(|o| o.as_str() == op).count()
    }

    fn scene<'a>(objects: &'a [FallingObject], trail: &'a [TrailPoint], effects: &'a EffectsSystem) -> Scene<'a> {
        Scene {
            objects,
            trail,
            effects,
            combo_count: 0,
            combo_multiplier: 1,
            last_cut_pos: Vec2::ZERO,
        }
    }

    #[test]
    fn test_empty_scene_draws_background_only() {
        let renderer = Renderer::new(800.0, 600.0, RenderOptions::default());
        let fx = EffectsSystem::new(10, 0);
        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[], &[], &fx));
        assert_eq!(rec.ops, vec!["bg".to_string()]);
    }

    #[test]
    fn test_cut_objects_are_not_drawn() {
        let renderer = Renderer::new(800.0, 600.0, RenderOptions::default());
        let fx = EffectsSystem::new(10, 0);
        let mut cut = FallingObject::new(0, &FRUIT_KINDS[1], Vec2::ZERO, Vec2::ZERO);
        cut.mark_cut();
        let bomb = FallingObject::new(1, &HAZARD_KIND, Vec2::ZERO, Vec2::ZERO);
        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[cut, bomb], &[], &fx));

        // bomb: body + spark, outline, fuse + two cross strokes
        assert_eq!(count(&rec, "circle"), 2);
        assert_eq!(count(&rec, "ring"), 1);
        assert_eq!(count(&rec, "line"), 3);
        assert_eq!(rec.depth, 0, "save/restore balanced");
    }

    #[test]
    fn test_fruit_layers() {
        let renderer = Renderer::new(800.0, 600.0, RenderOptions::default());
        let fx = EffectsSystem::new(10, 0);
        let apple = FallingObject::new(0, &FRUIT_KINDS[0], Vec2::ZERO, Vec2::ZERO);
        let melon = FallingObject::new(1, &FRUIT_KINDS[4], Vec2::ZERO, Vec2::ZERO);
        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[apple, melon], &[], &fx));
        // apple: shadow, body, highlight; melon adds the flesh ring
        assert_eq!(count(&rec, "circle"), 3 + 4);
        assert_eq!(count(&rec, "ellipse"), 1);
    }

    #[test]
    fn test_trail_segments_and_glow() {
        let renderer = Renderer::new(800.0, 600.0, RenderOptions::default());
        let fx = EffectsSystem::new(10, 0);
        let trail: Vec<TrailPoint> = (0..4).map(|i| TrailPoint::new(i as f32 * 10.0, 0.0, i as f64)).collect();
        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[], &trail, &fx));
        assert_eq!(count(&rec, "line"), 3);
        assert_eq!(count(&rec, "circle"), 1);

        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[], &trail[..2], &fx));
        assert_eq!(count(&rec, "line"), 1);
        assert_eq!(count(&rec, "circle"), 0, "no glow dot for a two-point trail");
    }

    #[test]
    fn test_trail_head_dot_drawn_without_glow() {
        let plain = RenderOptions {
            glow: false,
            ..RenderOptions::default()
        };
        let renderer = Renderer::new(800.0, 600.0, plain);
        let fx = EffectsSystem::new(10, 0);
        let trail: Vec<TrailPoint> = (0..3).map(|i| TrailPoint::new(i as f32 * 10.0, 0.0, i as f64)).collect();
        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[], &trail, &fx));
        assert_eq!(count(&rec, "circle"), 1);
    }

    #[test]
    fn test_combo_banner_threshold_and_toggle() {
        let fx = EffectsSystem::new(10, 0);
        let mut s = scene(&[], &[], &fx);
        s.combo_count = 2;
        s.combo_multiplier = 2;

        let mut rec = Recorder::default();
        Renderer::new(800.0, 600.0, RenderOptions::default()).render(&mut rec, &s);
        assert!(rec.ops.contains(&"text:x2 COMBO!".to_string()));

        let off = RenderOptions {
            combo_banner: false,
            ..RenderOptions::default()
        };
        let mut rec = Recorder::default();
        Renderer::new(800.0, 600.0, off).render(&mut rec, &s);
        assert_eq!(rec.ops.len(), 1);

        s.combo_count = 1;
        let mut rec = Recorder::default();
        Renderer::new(800.0, 600.0, RenderOptions::default()).render(&mut rec, &s);
        assert_eq!(rec.ops.len(), 1);
    }

    #[test]
    fn test_effects_drawn() {
        let renderer = Renderer::new(800.0, 600.0, RenderOptions::default());
        let mut fx = EffectsSystem::new(100, 3);
        let melon = FallingObject::new(0, &FRUIT_KINDS[4], Vec2::new(50.0, 50.0), Vec2::ZERO);
        fx.spawn_slice(&melon);
        fx.spawn_score_text(melon.pos, 3, 1);
        let mut rec = Recorder::default();
        renderer.render(&mut rec, &scene(&[], &[], &fx));
        // two halves, each body + flesh
        assert_eq!(count(&rec, "sector"), 4);
        assert_eq!(count(&rec, "circle"), fx.particles.len());
        assert!(rec.ops.contains(&"text:+3".to_string()));
        assert_eq!(rec.depth, 0);
    }
}
