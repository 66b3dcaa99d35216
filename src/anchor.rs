//! Anchor points on block edges.
//!
//! An anchor is a point on a block's boundary plus the outward normal of the
//! edge it sits on. Anchors are resolved from the block's current rectangle on
//! every frame, so they follow blocks while they are dragged.

use crate::error::FlowError;
use egui::{pos2, vec2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One side of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// The upper side
    Top,
    /// The right-hand side
    Right,
    /// The lower side
    Bottom,
    /// The left-hand side
    Left,
}

impl Edge {
    /// All four edges, clockwise from the top.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// The token accepted by [`Edge::from_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Edge::Top),
            "right" => Ok(Edge::Right),
            "bottom" => Ok(Edge::Bottom),
            "left" => Ok(Edge::Left),
            other => Err(FlowError::InvalidEdge(other.to_string())),
        }
    }
}

/// Outward unit normal of `edge` in y-down screen coordinates.
pub fn edge_direction(edge: Edge) -> Vec2 {
    match edge {
        Edge::Top => vec2(0.0, -1.0),
        Edge::Right => vec2(1.0, 0.0),
        Edge::Bottom => vec2(0.0, 1.0),
        Edge::Left => vec2(-1.0, 0.0),
    }
}

/// Clamp an anchor offset into `[-0.5, 0.5]`. NaN maps to the midpoint.
pub fn clamp_offset(offset: f32) -> f32 {
    if offset.is_nan() {
        0.0
    } else {
        offset.clamp(-0.5, 0.5)
    }
}

/// Point on `edge` of `rect`, `offset` edge-lengths away from the midpoint.
///
/// Offsets are clamped into `[-0.5, 0.5]`: 0 is the midpoint, ±0.5 the two
/// corners bounding the edge. The offset runs along +x for top/bottom and +y
/// for left/right, so it scales with the block.
pub fn anchor_point(rect: Rect, edge: Edge, offset: f32) -> Pos2 {
    let t = clamp_offset(offset) + 0.5;
    match edge {
        Edge::Top | Edge::Bottom => {
            let x = rect.min.x + rect.width() * t;
            let y = if edge == Edge::Top {
                rect.min.y
            } else {
                rect.max.y
            };
            pos2(x, y)
        }
        Edge::Left | Edge::Right => {
            let x = if edge == Edge::Left {
                rect.min.x
            } else {
                rect.max.x
            };
            let y = rect.min.y + rect.height() * t;
            pos2(x, y)
        }
    }
}

/// Parse an edge token and resolve the anchor in one step.
///
/// Fails with [`FlowError::InvalidEdge`] for unknown tokens; no fallback point
/// is produced.
pub fn anchor_point_named(rect: Rect, edge: &str, offset: f32) -> Result<Pos2, FlowError> {
    Ok(anchor_point(rect, edge.parse()?, offset))
}

/// Parse an edge token and return its outward normal.
pub fn edge_direction_named(edge: &str) -> Result<Vec2, FlowError> {
    Ok(edge_direction(edge.parse()?))
}
