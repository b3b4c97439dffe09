//! Triangle-list generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::Rgba;

fn push_tri(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));
}

/// Vertical gradient quad covering `size` from the origin
pub fn gradient_rect(size: Vec2, top: Rgba, bottom: Rgba) -> Vec<Vertex> {
    vec![
        Vertex::new(0.0, 0.0, top),
        Vertex::new(size.x, 0.0, top),
        Vertex::new(0.0, size.y, bottom),
        Vertex::new(0.0, size.y, bottom),
        Vertex::new(size.x, 0.0, top),
        Vertex::new(size.x, size.y, bottom),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    sector(center, radius, 0.0, TAU, color, segments)
}

/// Filled pie slice between two angles.
///
/// `segments` is the count for a full turn; partial arcs get a share of it.
pub fn sector(center: Vec2, radius: f32, start: f32, end: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let span = end - start;
    let steps = ((segments as f32 * span.abs() / TAU).ceil() as u32).max(2);
    let mut vertices = Vec::with_capacity((steps * 3) as usize);

    for i in 0..steps {
        let theta1 = start + span * (i as f32 / steps as f32);
        let theta2 = start + span * ((i + 1) as f32 / steps as f32);
        push_tri(
            &mut vertices,
            center,
            center + crate::unit_from_angle(theta1) * radius,
            center + crate::unit_from_angle(theta2) * radius,
            color,
        );
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let d1 = crate::unit_from_angle((i as f32 / segments as f32) * TAU);
        let d2 = crate::unit_from_angle(((i + 1) as f32 / segments as f32) * TAU);

        let inner1 = center + d1 * inner_radius;
        let outer1 = center + d1 * outer_radius;
        let inner2 = center + d2 * inner_radius;
        let outer2 = center + d2 * outer_radius;

        // Two triangles per segment
        push_tri(&mut vertices, inner1, outer1, inner2, color);
        push_tri(&mut vertices, inner2, outer1, outer2, color);
    }

    vertices
}

/// Filled ellipse with semi-axes `radii`, rotated about its center
pub fn ellipse(center: Vec2, radii: Vec2, rotation: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let axis = crate::unit_from_angle(rotation);
    let point = |theta: f32| {
        let local = Vec2::new(theta.cos() * radii.x, theta.sin() * radii.y);
        center + axis.rotate(local)
    };

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        push_tri(&mut vertices, center, point(theta1), point(theta2), color);
    }
    vertices
}

/// Thick line as a quad plus round end caps
pub fn thick_line(from: Vec2, to: Vec2, width: f32, color: Rgba, cap_segments: u32) -> Vec<Vertex> {
    let half = width * 0.5;
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * half;

    let mut vertices = Vec::new();
    if dir != Vec2::ZERO {
        push_tri(&mut vertices, from + perp, from - perp, to + perp, color);
        push_tri(&mut vertices, to + perp, from - perp, to - perp, color);
    }
    vertices.extend(circle(from, half, color, cap_segments));
    vertices.extend(circle(to, half, color, cap_segments));
    vertices
}
