//! Shape generation for 2D primitives
//!
//! Every function returns a triangle list in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::color::Rgba;
use super::vertex::Vertex;

/// Color stop along a gradient, `t` in 0..=1
pub type Stop = (f32, Rgba);

fn tri(out: &mut Vec<Vertex>, a: Vec2, ca: Rgba, b: Vec2, cb: Rgba, c: Vec2, cc: Rgba) {
    out.push(Vertex::new(a.x, a.y, ca));
    out.push(Vertex::new(b.x, b.y, cb));
    out.push(Vertex::new(c.x, c.y, cc));
}

/// Convex quad, corners in winding order
pub fn quad(corners: [Vec2; 4], color: Rgba) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    let mut vertices = Vec::with_capacity(6);
    tri(&mut vertices, a, color, b, color, c, color);
    tri(&mut vertices, a, color, c, color, d, color);
    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: Rgba) -> Vec<Vertex> {
    quad(
        [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ],
        color,
    )
}

/// Rectangle centred on `center`, rotated by `angle` radians
pub fn rotated_rect(center: Vec2, w: f32, h: f32, angle: f32, color: Rgba) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let (hw, hh) = (w / 2.0, h / 2.0);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y));
    quad(
        [
            corner(-hw, -hh),
            corner(hw, -hh),
            corner(hw, hh),
            corner(-hw, hh),
        ],
        color,
    )
}

/// Outline of a rotated rectangle, `width` pixels thick, drawn inside the edge
pub fn rotated_frame(
    center: Vec2,
    w: f32,
    h: f32,
    angle: f32,
    width: f32,
    color: Rgba,
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let (hw, hh) = (w / 2.0, h / 2.0);
    let bars = [
        (Vec2::new(0.0, -hh + width / 2.0), w, width),
        (Vec2::new(0.0, hh - width / 2.0), w, width),
        (Vec2::new(-hw + width / 2.0, 0.0), width, h),
        (Vec2::new(hw - width / 2.0, 0.0), width, h),
    ];
    bars.iter()
        .flat_map(|&(off, bw, bh)| rotated_rect(center + rot.rotate(off), bw, bh, angle, color))
        .collect()
}

/// Vertical gradient over a rectangle. Stops must be sorted by `t`.
pub fn vertical_gradient(x: f32, y: f32, w: f32, h: f32, stops: &[Stop]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(stops.len().saturating_sub(1) * 6);
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        let (y0, y1) = (y + h * t0, y + h * t1);
        let (tl, tr) = (Vec2::new(x, y0), Vec2::new(x + w, y0));
        let (bl, br) = (Vec2::new(x, y1), Vec2::new(x + w, y1));
        tri(&mut vertices, tl, c0, tr, c0, br, c1);
        tri(&mut vertices, tl, c0, br, c1, bl, c1);
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    ellipse(center, radius, radius, color, segments)
}

pub fn ellipse(center: Vec2, rx: f32, ry: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        tri(
            &mut vertices,
            center,
            color,
            center + Vec2::new(rx * theta1.cos(), ry * theta1.sin()),
            color,
            center + Vec2::new(rx * theta2.cos(), ry * theta2.sin()),
            color,
        );
    }

    vertices
}

/// Disc whose color runs through `stops` from centre (t = 0) to rim (t = 1).
///
/// The first stop colours the centre; each later stop closes a ring band.
pub fn radial_gradient(center: Vec2, radius: f32, stops: &[Stop], segments: u32) -> Vec<Vertex> {
    let Some(&(_, center_color)) = stops.first() else {
        return Vec::new();
    };
    let mut vertices = Vec::with_capacity((segments as usize) * 6 * stops.len());

    let mut inner_r = 0.0;
    let mut inner_c = center_color;
    for &(t, outer_c) in &stops[1..] {
        let outer_r = radius * t;
        for i in 0..segments {
            let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
            let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
            let (d1, d2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

            let outer1 = center + d1 * outer_r;
            let outer2 = center + d2 * outer_r;
            if inner_r <= 0.0 {
                tri(&mut vertices, center, inner_c, outer1, outer_c, outer2, outer_c);
            } else {
                let inner1 = center + d1 * inner_r;
                let inner2 = center + d2 * inner_r;
                // Two triangles per segment
                tri(&mut vertices, inner1, inner_c, outer1, outer_c, inner2, inner_c);
                tri(&mut vertices, inner2, inner_c, outer1, outer_c, outer2, outer_c);
            }
        }
        inner_r = outer_r;
        inner_c = outer_c;
    }

    vertices
}

/// Thick segment from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: Rgba) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad([a + perp, b + perp, b - perp, a - perp], color)
}

/// Connected thick segments through `points`
pub fn polyline(points: &[Vec2], width: f32, color: Rgba) -> Vec<Vertex> {
    points
        .windows(2)
        .flat_map(|seg| line(seg[0], seg[1], width, color))
        .collect()
}

/// Fan-triangulated convex polygon
pub fn polygon(points: &[Vec2], color: Rgba) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(2) * 3);
    if let Some((&first, rest)) = points.split_first() {
        for pair in rest.windows(2) {
            tri(&mut vertices, first, color, pair[0], color, pair[1], color);
        }
    }
    vertices
}

/// Triangle with per-corner colors
pub fn shaded_triangle(corners: [(Vec2, Rgba); 3]) -> Vec<Vertex> {
    let [(a, ca), (b, cb), (c, cc)] = corners;
    let mut vertices = Vec::with_capacity(3);
    tri(&mut vertices, a, ca, b, cb, c, cc);
    vertices
}

/// Four-pointed sparkle: tips at `size`, waist at `size / 2` on the diagonals
pub fn sparkle(center: Vec2, size: f32, angle: f32, color: Rgba) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let h = size / 2.0;
    let outline = [
        Vec2::new(0.0, -size),
        Vec2::new(h, -h),
        Vec2::new(size, 0.0),
        Vec2::new(h, h),
        Vec2::new(0.0, size),
        Vec2::new(-h, h),
        Vec2::new(-size, 0.0),
        Vec2::new(-h, -h),
    ];
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for i in 0..outline.len() {
        let a = center + rot.rotate(outline[i]);
        let b = center + rot.rotate(outline[(i + 1) % outline.len()]);
        tri(&mut vertices, center, color, a, color, b, color);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::color::{TRANSPARENT, WHITE};

    #[test]
    fn test_triangle_lists() {
        assert_eq!(rect(0.0, 0.0, 10.0, 10.0, WHITE).len(), 6);
        assert_eq!(circle(Vec2::ZERO, 5.0, WHITE, 16).len(), 48);
        assert_eq!(sparkle(Vec2::ZERO, 4.0, 0.0, WHITE).len(), 24);
        assert_eq!(polygon(&[Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y], WHITE).len(), 6);
        assert!(polygon(&[Vec2::ZERO, Vec2::X], WHITE).is_empty());
    }

    #[test]
    fn test_gradient_bands() {
        let stops = [(0.0, WHITE), (0.6, WHITE), (1.0, TRANSPARENT)];
        assert_eq!(vertical_gradient(0.0, 0.0, 10.0, 100.0, &stops).len(), 12);
        // Centre fan then one ring band
        assert_eq!(radial_gradient(Vec2::ZERO, 10.0, &stops, 8).len(), 8 * 3 + 8 * 6);
        assert!(radial_gradient(Vec2::ZERO, 10.0, &[], 8).is_empty());
    }

    #[test]
    fn test_gradient_rim_color() {
        let stops = [(0.0, WHITE), (1.0, TRANSPARENT)];
        let verts = radial_gradient(Vec2::new(5.0, 5.0), 10.0, &stops, 4);
        assert_eq!(verts[0].color, WHITE);
        assert_eq!(verts[1].color, TRANSPARENT);
        let rim = Vec2::from(verts[1].position) - Vec2::new(5.0, 5.0);
        assert!((rim.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_line_width() {
        let verts = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, WHITE);
        assert_eq!(verts[0].position, [0.0, 2.0]);
        assert_eq!(verts[2].position, [10.0, -2.0]);
    }
}
