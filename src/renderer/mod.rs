//! Rendering module
//!
//! `Renderer` walks the scene and issues drawing operations against a
//! `DrawSurface`. Backends: a web-sys 2D canvas on wasm32 and a
//! tessellating mesh surface for headless runs.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod mesh;
pub mod scene;
pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use mesh::MeshSurface;
pub use scene::{RenderOptions, Renderer, Scene};

use glam::Vec2;

use crate::Rgba;

/// Immediate-mode 2D drawing operations.
///
/// Transforms and alpha follow canvas semantics: `save`/`restore` push and
/// pop the current transform and global alpha, `translate`/`rotate` compose
/// onto it, and `set_alpha` replaces the global alpha.
pub trait DrawSurface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);

    /// Vertical gradient over the whole viewport
    fn fill_background(&mut self, size: Vec2, top: Rgba, bottom: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    /// Closed pie slice from `start` to `end` radians (clockwise, y down)
    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba);
    /// Round-capped line
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Bold centered text; `glow` is a blur radius, 0 for none
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Rgba, glow: f32);
}
