//! Browser 2D canvas surface

use glam::Vec2;
use std::f64::consts::TAU;
use web_sys::CanvasRenderingContext2d;

use super::DrawSurface;
use crate::{Rgba, css_color};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.set_text_align("center");
        Self { ctx }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .ok();
    }
}

impl DrawSurface for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.ctx.translate(offset.x as f64, offset.y as f64).ok();
    }

    fn rotate(&mut self, radians: f32) {
        self.ctx.rotate(radians as f64).ok();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn fill_background(&mut self, size: Vec2, top: Rgba, bottom: Rgba) {
        let grad = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, size.y as f64);
        grad.add_color_stop(0.0, &css_color(top)).ok();
        grad.add_color_stop(1.0, &css_color(bottom)).ok();
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, start as f64, end as f64)
            .ok();
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx
            .ellipse(
                center.x as f64,
                center.y as f64,
                radii.x as f64,
                radii.y as f64,
                rotation as f64,
                0.0,
                TAU,
            )
            .ok();
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Rgba, glow: f32) {
        let css = css_color(color);
        self.ctx.save();
        self.ctx.set_font(&format!("bold {}px sans-serif", size.round() as u32));
        self.ctx.set_fill_style_str(&css);
        if glow > 0.0 {
            self.ctx.set_shadow_color(&css);
            self.ctx.set_shadow_blur(glow as f64);
        }
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
        self.ctx.restore();
    }
}
