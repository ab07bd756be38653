//! Shape generation for 2D primitives
//!
//! Every function appends triangles (three vertices each) to `out`.
//! Coordinates are playfield units with +y pointing down.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let max = min + size;
    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

/// Rectangle outline drawn inside the bounds
pub fn rect_outline(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, width: f32, color: [f32; 4]) {
    rect(out, min, Vec2::new(size.x, width), color);
    rect(out, Vec2::new(min.x, min.y + size.y - width), Vec2::new(size.x, width), color);
    rect(out, min, Vec2::new(width, size.y), color);
    rect(out, Vec2::new(min.x + size.x - width, min.y), Vec2::new(width, size.y), color);
}

/// Rectangle whose color fades from `top` to `bottom`
pub fn gradient_rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let max = min + size;
    out.push(Vertex::new(min.x, min.y, top));
    out.push(Vertex::new(max.x, min.y, top));
    out.push(Vertex::new(min.x, max.y, bottom));

    out.push(Vertex::new(min.x, max.y, bottom));
    out.push(Vertex::new(max.x, min.y, top));
    out.push(Vertex::new(max.x, max.y, bottom));
}

/// Filled circle (or ellipse when radii differ)
pub fn ellipse(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }
}

pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    ellipse(out, center, Vec2::splat(radius), color, segments);
}

/// Ring band between two radii, restricted to `[start, end)` radians
pub fn arc_band(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    end: f32,
    color: [f32; 4],
    segments: u32,
) {
    let span = end - start;
    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}

/// Full ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    width: f32,
    color: [f32; 4],
    segments: u32,
) {
    let half = width / 2.0;
    arc_band(out, center, radius - half, radius + half, 0.0, TAU, color, segments);
}

/// Dashed ring: `dash` units drawn, `gap` units skipped, measured along the circumference
pub fn dashed_ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    width: f32,
    dash: f32,
    gap: f32,
    color: [f32; 4],
) {
    let circumference = TAU * radius;
    let period = dash + gap;
    if period <= 0.0 || radius <= 0.0 {
        return;
    }
    let half = width / 2.0;
    let mut travelled = 0.0;
    while travelled < circumference {
        let start = travelled / radius;
        let end = (travelled + dash).min(circumference) / radius;
        arc_band(out, center, radius - half, radius + half, start, end, color, 2);
        travelled += period;
    }
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));

    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b2.x, b2.y, color));
}

/// Closed polygon outline
pub fn polygon_outline(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        line(out, a, b, width, color);
    }
}

/// Filled polygon as a triangle fan around its centroid (exact for star-shaped outlines)
pub fn polygon_fill(out: &mut Vec<Vertex>, points: &[Vec2], color: [f32; 4]) {
    if points.len() < 3 {
        return;
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        out.push(Vertex::new(centroid.x, centroid.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

/// Arc points from `start` to `end` radians, for building outlines
pub fn arc_points(center: Vec2, radius: f32, start: f32, end: f32, steps: u32) -> Vec<Vec2> {
    (0..=steps)
        .map(|i| {
            let theta = start + (end - start) * (i as f32 / steps as f32);
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Rotate and translate local-space points
pub fn transform(points: &[Vec2], origin: Vec2, angle: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(angle);
    points.iter().map(|&p| origin + rot.rotate(p)).collect()
}

/// Regular polygon points (first vertex on the +x axis)
pub fn regular_polygon(sides: u32, radius: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let theta = (i as f32 / sides as f32) * 2.0 * PI;
            Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_is_two_triangles() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), WHITE);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.position[0] >= 1.0 && v.position[0] <= 4.0));
        assert!(out.iter().all(|v| v.position[1] >= 2.0 && v.position[1] <= 6.0));
    }

    #[test]
    fn test_empty_rect_emits_nothing() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::ZERO, Vec2::new(0.0, 4.0), WHITE);
        assert!(out.is_empty());
    }

    #[test]
    fn test_circle_vertices_on_radius() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(10.0, 10.0), 5.0, WHITE, 16);
        assert_eq!(out.len(), 48);
        for tri in out.chunks(3) {
            let edge = Vec2::from(tri[1].position) - Vec2::new(10.0, 10.0);
            assert!((edge.length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dashed_ring_has_gaps() {
        let mut solid = Vec::new();
        ring(&mut solid, Vec2::ZERO, 80.0, 4.0, WHITE, 64);
        let mut dashed = Vec::new();
        dashed_ring(&mut dashed, Vec2::ZERO, 80.0, 4.0, 10.0, 5.0, WHITE);
        // circumference ≈ 502.65, period 15 → 34 dashes of two segments each
        assert_eq!(dashed.len(), 34 * 2 * 6);
        assert!(!solid.is_empty());
    }

    #[test]
    fn test_polygon_outline_closes() {
        let mut out = Vec::new();
        let tri = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        polygon_outline(&mut out, &tri, 2.0, WHITE);
        assert_eq!(out.len(), 3 * 6);
    }

    #[test]
    fn test_transform_rotates_about_origin() {
        let pts = transform(&[Vec2::new(1.0, 0.0)], Vec2::new(5.0, 5.0), std::f32::consts::FRAC_PI_2);
        assert!((pts[0] - Vec2::new(5.0, 6.0)).length() < 1e-5);
    }
}
