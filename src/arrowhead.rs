//! Triangular arrowheads at connection tips.

use crate::constants;
use crate::geometry::rotate;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Arrowhead geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowHeadStyle {
    /// Length of each wing in pixels.
    pub length: f32,
    /// Angle between a wing and the shaft, in degrees.
    pub angle_deg: f32,
}

impl Default for ArrowHeadStyle {
    fn default() -> Self {
        Self {
            length: constants::ARROW_HEAD_LEN,
            angle_deg: constants::ARROW_HEAD_ANGLE_DEG,
        }
    }
}

/// Triangle pointing along `direction` with its tip at `tip`.
///
/// Returns `None` when `direction` has no usable length (coincident control
/// points); callers skip the arrowhead for that frame.
pub fn arrowhead(tip: Pos2, direction: Vec2, style: &ArrowHeadStyle) -> Option<[Pos2; 3]> {
    let len = direction.length();
    if !(len > 0.0 && len.is_finite()) {
        return None;
    }
    let d = direction / len;
    let angle = style.angle_deg.to_radians();
    let left = rotate(d, angle);
    let right = rotate(d, -angle);
    Some([tip, tip - left * style.length, tip - right * style.length])
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn zero_direction_draws_nothing() {
        let style = ArrowHeadStyle::default();
        assert!(arrowhead(pos2(1.0, 1.0), Vec2::ZERO, &style).is_none());
        assert!(arrowhead(pos2(1.0, 1.0), vec2(f32::NAN, 0.0), &style).is_none());
    }

    #[test]
    fn arrow_is_symmetric_about_direction() {
        let style = ArrowHeadStyle::default();
        let tip = pos2(100.0, 50.0);
        let [p1, p2, p3] = arrowhead(tip, vec2(10.0, 0.0), &style).unwrap();
        assert_eq!(p1, tip);
        // Both wings trail behind the tip by len * cos(25deg).
        let back = style.length * style.angle_deg.to_radians().cos();
        let side = style.length * style.angle_deg.to_radians().sin();
        assert!((p2.x - (tip.x - back)).abs() < 1e-4);
        assert!((p3.x - (tip.x - back)).abs() < 1e-4);
        assert!(((p2.y - tip.y).abs() - side).abs() < 1e-4);
        assert!((p2.y - tip.y + (p3.y - tip.y)).abs() < 1e-4);
    }

    #[test]
    fn wing_length_ignores_direction_magnitude() {
        let style = ArrowHeadStyle::default();
        let tip = pos2(0.0, 0.0);
        let short = arrowhead(tip, vec2(0.0, 0.001), &style).unwrap();
        let long = arrowhead(tip, vec2(0.0, 5000.0), &style).unwrap();
        for i in 0..3 {
            assert!((short[i] - long[i]).length() < 1e-4);
        }
        assert!(((short[1] - tip).length() - style.length).abs() < 1e-4);
    }

    #[test]
    fn arrow_points_down_for_downward_direction() {
        let style = ArrowHeadStyle::default();
        let [tip, a, b] = arrowhead(pos2(0.0, 0.0), vec2(0.0, 1.0), &style).unwrap();
        assert!(a.y < tip.y && b.y < tip.y);
    }
}
