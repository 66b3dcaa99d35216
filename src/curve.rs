//! Control point construction for connection curves.

use crate::constants;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// How far control points are pushed away from their anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveStyle {
    /// Upper bound of the lever arm in pixels.
    pub push_max: f32,
    /// Lever arm as a fraction of the distance between the anchors.
    pub push_ratio: f32,
    /// Straight segments used to stroke one curve.
    pub samples: usize,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            push_max: constants::CONTROL_PUSH_MAX,
            push_ratio: constants::CONTROL_PUSH_RATIO,
            samples: constants::CURVE_SAMPLES,
        }
    }
}

/// Lever arm for two anchors `span` pixels apart: proportional, capped at `push_max`.
pub fn control_push(span: f32, style: &CurveStyle) -> f32 {
    (span * style.push_ratio).min(style.push_max)
}

/// Interior control points for a curve from `p_start` to `p_end`.
///
/// The curve leaves `p_start` along `dir_start` and arrives at `p_end` moving
/// along `dir_end`, which must point *into* the end block (the negated edge
/// normal).
pub fn build_controls(
    p_start: Pos2,
    dir_start: Vec2,
    p_end: Pos2,
    dir_end: Vec2,
    style: &CurveStyle,
) -> (Pos2, Pos2) {
    let push = control_push((p_end - p_start).length(), style);
    let c1 = p_start + dir_start * push;
    let c2 = p_end - dir_end * push;
    (c1, c2)
}
