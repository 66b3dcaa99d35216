//! Cubic Bézier evaluation on egui's point and vector types.
//!
//! Everything here is y-down screen space, matching the painter.

use egui::emath::Rot2;
use egui::{Pos2, Vec2};

/// Position on the cubic curve `p0, p1, p2, p3` at parameter `t` in `[0, 1]`.
///
/// Returns exactly `p0` for `t == 0` and exactly `p3` for `t == 1`: the other
/// terms collapse to signed zeros there.
pub fn point_at(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let v = p0.to_vec2() * (u * u * u)
        + p1.to_vec2() * (3.0 * u * u * t)
        + p2.to_vec2() * (3.0 * u * t * t)
        + p3.to_vec2() * (t * t * t);
    v.to_pos2()
}

/// First derivative of the cubic curve at `t`.
pub fn tangent_at(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    3.0 * ((p1 - p0) * (u * u) + 2.0 * (p2 - p1) * (u * t) + (p3 - p2) * (t * t))
}

/// Rotate `v` counter-clockwise (in math orientation) by `radians`.
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    Rot2::from_angle(radians) * v
}

/// The four control points of one connection curve, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    /// Start anchor
    pub p0: Pos2,
    /// First interior control point
    pub c1: Pos2,
    /// Second interior control point
    pub c2: Pos2,
    /// End anchor
    pub p3: Pos2,
}

impl CubicCurve {
    /// Bundle four control points.
    pub fn new(p0: Pos2, c1: Pos2, c2: Pos2, p3: Pos2) -> Self {
        Self { p0, c1, c2, p3 }
    }

    /// See [`point_at`].
    pub fn point_at(&self, t: f32) -> Pos2 {
        point_at(self.p0, self.c1, self.c2, self.p3, t)
    }

    /// See [`tangent_at`].
    pub fn tangent_at(&self, t: f32) -> Vec2 {
        tangent_at(self.p0, self.c1, self.c2, self.p3, t)
    }

    /// Approximate the curve with `samples` straight segments.
    ///
    /// The result holds `samples + 1` points and always starts at `p0` and
    /// ends at `p3`.
    pub fn polyline(&self, samples: usize) -> Vec<Pos2> {
        let samples = samples.max(1);
        let mut points = Vec::with_capacity(samples + 1);
        points.push(self.p0);
        for i in 1..=samples {
            points.push(self.point_at(i as f32 / samples as f32));
        }
        points
    }
}
