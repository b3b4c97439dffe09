//! Tessellating draw surface
//!
//! Turns drawing operations into a flat triangle list in canvas pixels,
//! ready for a vertex buffer. Text is not tessellated; it is collected
//! as positioned labels for an overlay.

use glam::{Affine2, Vec2};

use super::DrawSurface;
use super::shapes;
use super::vertex::{self, Vertex};
use crate::Rgba;
use crate::settings::QualityPreset;

/// A text draw call resolved to canvas space
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: Rgba,
    pub glow: f32,
}

pub struct MeshSurface {
    vertices: Vec<Vertex>,
    labels: Vec<TextLabel>,
    transform: Affine2,
    alpha: f32,
    stack: Vec<(Affine2, f32)>,
    segments: u32,
}

impl MeshSurface {
    pub fn new(quality: QualityPreset) -> Self {
        Self {
            vertices: Vec::with_capacity(4096),
            labels: Vec::new(),
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
            segments: quality.circle_segments(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn bytes(&self) -> &[u8] {
        vertex::as_bytes(&self.vertices)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Drop buffered geometry and reset transform state
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
        self.stack.clear();
        self.transform = Affine2::IDENTITY;
        self.alpha = 1.0;
    }

    fn emit(&mut self, local: Vec<Vertex>) {
        let (transform, alpha) = (self.transform, self.alpha);
        self.vertices.extend(local.into_iter().map(|mut v| {
            let p = transform.transform_point2(Vec2::from(v.position));
            v.position = p.to_array();
            v.color[3] *= alpha;
            v
        }));
    }
}

impl DrawSurface for MeshSurface {
    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.transform = self.transform * Affine2::from_angle(radians);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Starts a new frame: the background covers everything drawn before it
    fn fill_background(&mut self, size: Vec2, top: Rgba, bottom: Rgba) {
        self.clear();
        self.emit(shapes::gradient_rect(size, top, bottom));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.emit(shapes::circle(center, radius, color, self.segments));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        let half = width * 0.5;
        self.emit(shapes::ring(center, (radius - half).max(0.0), radius + half, color, self.segments));
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba) {
        self.emit(shapes::sector(center, radius, start, end, color, self.segments));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        self.emit(shapes::ellipse(center, radii, rotation, color, self.segments));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let caps = (self.segments / 2).max(4);
        self.emit(shapes::thick_line(from, to, width, color, caps));
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, mut color: Rgba, glow: f32) {
        color[3] *= self.alpha;
        self.labels.push(TextLabel {
            text: text.to_owned(),
            pos: self.transform.transform_point2(pos),
            size,
            color,
            glow,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_transform_and_alpha_stack() {
        let mut mesh = MeshSurface::new(QualityPreset::Low);
        mesh.save();
        mesh.translate(Vec2::new(100.0, 50.0));
        mesh.rotate(std::f32::consts::FRAC_PI_2);
        mesh.set_alpha(0.5);
        mesh.fill_text("hi", Vec2::new(10.0, 0.0), 24.0, RED, 0.0);
        mesh.restore();
        mesh.fill_text("there", Vec2::new(10.0, 0.0), 24.0, RED, 0.0);

        let labels = mesh.labels();
        assert!((labels[0].pos - Vec2::new(100.0, 60.0)).length() < 1e-4);
        assert_eq!(labels[0].color[3], 0.5);
        assert_eq!(labels[1].pos, Vec2::new(10.0, 0.0));
        assert_eq!(labels[1].color[3], 1.0);
    }

    #[test]
    fn test_background_starts_frame() {
        let mut mesh = MeshSurface::new(QualityPreset::Medium);
        mesh.fill_circle(Vec2::ZERO, 5.0, RED);
        mesh.fill_text("x", Vec2::ZERO, 10.0, RED, 0.0);
        mesh.fill_background(Vec2::new(800.0, 600.0), RED, RED);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.labels().is_empty());
    }

    #[test]
    fn test_quality_controls_detail() {
        let mut low = MeshSurface::new(QualityPreset::Low);
        let mut high = MeshSurface::new(QualityPreset::High);
        low.fill_circle(Vec2::ZERO, 5.0, RED);
        high.fill_circle(Vec2::ZERO, 5.0, RED);
        assert_eq!(low.triangle_count(), 12);
        assert_eq!(high.triangle_count(), 48);
        assert_eq!(high.bytes().len(), 48 * 3 * Vertex::STRIDE);
    }

    #[test]
    fn test_unbalanced_restore_is_harmless() {
        let mut mesh = MeshSurface::new(QualityPreset::Low);
        mesh.restore();
        mesh.fill_circle(Vec2::ZERO, 1.0, RED);
        assert_eq!(mesh.triangle_count(), 12);
    }
}
