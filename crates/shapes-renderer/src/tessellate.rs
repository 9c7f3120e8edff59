//! Geometry to screen-space polygons. Coordinates are surface pixels with
//! y pointing down, so a positive rotation turns clockwise on screen.

use std::f64::consts::TAU;

use shapes_lang::ShapeKind;

use crate::color::Rgba;

pub const CIRCLE_SEGMENTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    Fill,
    /// Closed outline of the given stroke width.
    Outline(f32),
}

/// One shape ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub id: String,
    pub kind: ShapeKind,
    pub points: Vec<(f64, f64)>,
    pub mode: RenderMode,
    pub color: Rgba,
}

pub fn circle(cx: f64, cy: f64, r: f64) -> Vec<(f64, f64)> {
    (0..CIRCLE_SEGMENTS).map(|i| {
        let t = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
        (cx + r * t.cos(), cy + r * t.sin())
    }).collect()
}

/// Corners clockwise from the top-left.
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Vec<(f64, f64)> {
    vec![
        (x, y), (x + width, y),
        (x + width, y + height), (x, y + height),
    ]
}

/// Rotate `points` by `angle` degrees around (cx, cy).
pub fn rotate(points: Vec<(f64, f64)>, angle: f64, cx: f64, cy: f64) -> Vec<(f64, f64)> {
    if angle == 0.0 {
        return points;
    }
    let (sin_a, cos_a) = angle.to_radians().sin_cos();
    points.into_iter().map(|(x, y)| {
        let (dx, dy) = (x - cx, y - cy);
        (cx + dx * cos_a - dy * sin_a, cy + dx * sin_a + dy * cos_a)
    }).collect()
}
