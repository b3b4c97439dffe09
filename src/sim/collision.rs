//! Swipe-vs-object intersection
//!
//! Each live trail segment is tested against each object's enlarged hit
//! circle. Continuous segments catch fast swipes that would skip over an
//! object between two pointer samples.

use glam::Vec2;

use super::state::FallingObject;
use super::trail::Segment;

/// Does the segment `start -> end` touch the circle?
///
/// Solves |start + t*(end - start) - center|² = r² and accepts a root in [0, 1].
/// A zero-length segment is a point-in-circle test.
pub fn segment_circle_intersects(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let d = end - start;
    let f = start - center;

    let a = d.dot(d);
    if a == 0.0 {
        return f.dot(f) <= radius * radius;
    }

    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
}

/// Ids of every object hit by at least one segment this frame.
///
/// Cut or missed objects are skipped. Each object is reported once; segments
/// are tried oldest to newest and the first hit wins.
pub fn find_cuts(segments: &[Segment], objects: &[FallingObject], radius_bonus: f32) -> Vec<u32> {
    if segments.is_empty() {
        return Vec::new();
    }

    objects
        .iter()
        .filter(|obj| !obj.is_cut() && !obj.is_missed())
        .filter(|obj| {
            let r = obj.hit_radius(radius_bonus);
            segments
                .iter()
                .any(|seg| segment_circle_intersects(seg.start, seg.end, obj.pos, r))
        })
        .map(|obj| obj.id)
        .collect()
}
