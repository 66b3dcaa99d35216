//! Core data types for diagrams.
//!
//! Blocks live in a scene-owned registry and are addressed by [`BlockId`];
//! connections only ever hold ids, never the blocks themselves.

use crate::error::{FlowError, FlowResult};
use egui::{pos2, vec2, Pos2, Rect, Vec2};
use std::fmt;

/// Index of a block in its scene's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Position in the registry.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Paint layer of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockLayer {
    /// Drawn below connections
    #[default]
    Diagram,
    /// Drawn above connections and sparks
    Note,
}

/// A positioned, sized, labeled rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Top-left corner
    pub position: Pos2,
    size: Vec2,
    label: String,
    alpha: u8,
    layer: BlockLayer,
}

impl Block {
    /// Creates a fully opaque block with its top-left corner at `(x, y)`.
    ///
    /// `<br/>` in the label is treated as a line break.
    ///
    /// # Errors
    ///
    /// [`FlowError::InvalidDimensions`] if `width` or `height` is not a
    /// positive finite number.
    pub fn new(x: f32, y: f32, width: f32, height: f32, label: impl Into<String>) -> FlowResult<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(FlowError::InvalidDimensions { width, height });
        }
        Ok(Self {
            position: pos2(x, y),
            size: vec2(width, height),
            label: normalize_label(&label.into()),
            alpha: 255,
            layer: BlockLayer::Diagram,
        })
    }

    /// Sets the opacity of fill and border, clamped to `0..=255`.
    pub fn with_alpha(mut self, alpha: i32) -> Self {
        self.alpha = alpha.clamp(0, 255) as u8;
        self
    }

    /// Moves the block to another paint layer.
    pub fn with_layer(mut self, layer: BlockLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Current bounds.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Width and height.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Label with line breaks as `\n`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fill and border opacity.
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Paint layer.
    pub fn layer(&self) -> BlockLayer {
        self.layer
    }

    /// True if `pos` lies inside the block.
    ///
    /// The right and bottom edges are exclusive, so two touching blocks never
    /// both claim a point.
    pub fn contains(&self, pos: Pos2) -> bool {
        let r = self.rect();
        pos.x >= r.min.x && pos.x < r.max.x && pos.y >= r.min.y && pos.y < r.max.y
    }
}

fn normalize_label(label: &str) -> String {
    label.replace("<br/>", "\n").replace("<br>", "\n")
}
