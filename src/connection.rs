//! Directed curved links between blocks, with their animated sparks.
//!
//! A connection never owns its blocks: it stores two [`Anchor`]s holding
//! [`BlockId`]s and resolves them against the scene's block registry on every
//! frame, so curves follow blocks while they are dragged.

use crate::anchor::{anchor_point, clamp_offset, edge_direction, Edge};
use crate::arrowhead::arrowhead;
use crate::constants::MAX_STROKE_WIDTH;
use crate::curve::build_controls;
use crate::error::{FlowError, FlowResult};
use crate::geometry::CubicCurve;
use crate::sparks::{SparkMode, SparkScheduler};
use crate::style::Style;
use crate::surface::RenderSurface;
use crate::types::{Block, BlockId};
use egui::{Color32, Pos2, Vec2};

/// A point on one edge of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Block the anchor sits on
    pub block: BlockId,
    /// Edge of that block
    pub edge: Edge,
    offset: f32,
}

impl Anchor {
    /// `offset` is clamped into `[-0.5, 0.5]`.
    pub fn new(block: BlockId, edge: Edge, offset: f32) -> Self {
        Self {
            block,
            edge,
            offset: clamp_offset(offset),
        }
    }

    /// Offset along the edge, already clamped.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Current position and outward normal of the anchor.
    ///
    /// # Errors
    ///
    /// [`FlowError::UnknownBlock`] if the block is not in `blocks`.
    pub fn resolve(&self, blocks: &[Block]) -> FlowResult<(Pos2, Vec2)> {
        let block = blocks
            .get(self.block.index())
            .ok_or(FlowError::UnknownBlock(self.block))?;
        Ok((
            anchor_point(block.rect(), self.edge, self.offset),
            edge_direction(self.edge),
        ))
    }
}

/// A color given directly or by palette name.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRef {
    /// Literal color
    Rgb(Color32),
    /// Entry of [`Style::palette`]
    Named(String),
}

impl ColorRef {
    fn resolve(&self, style: &Style) -> FlowResult<Color32> {
        match self {
            ColorRef::Rgb(c) => Ok(*c),
            ColorRef::Named(name) => style.resolve_color(name),
        }
    }
}

/// Everything needed to build a [`Connection`].
///
/// ```
/// # use neuro_flow::{Anchor, ConnectionSpec, Edge, Scene, Block};
/// # let mut scene = Scene::new("demo", 400.0, 300.0, Default::default(), Default::default());
/// # let a = scene.add_block(Block::new(10.0, 10.0, 80.0, 40.0, "A").unwrap());
/// # let b = scene.add_block(Block::new(200.0, 200.0, 80.0, 40.0, "B").unwrap());
/// let spec = ConnectionSpec::new(Anchor::new(a, Edge::Bottom, 0.0), Anchor::new(b, Edge::Top, 0.0))
///     .color_named("cereb")
///     .width(3.0)
///     .sparks(3)
///     .spark_speed(0.8);
/// scene.connect(spec).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSpec {
    start: Anchor,
    end: Anchor,
    color: Option<ColorRef>,
    width: f32,
    sparks: usize,
    spark_speed: f64,
    spark_color: Option<ColorRef>,
    out_offset: f32,
    arrow: bool,
}

impl ConnectionSpec {
    /// A 3px connection in the style's arrow color, without sparks.
    pub fn new(start: Anchor, end: Anchor) -> Self {
        Self {
            start,
            end,
            color: None,
            width: 3.0,
            sparks: 0,
            spark_speed: crate::constants::SPARK_SPEED,
            spark_color: None,
            out_offset: 0.0,
            arrow: true,
        }
    }

    /// Stroke color.
    pub fn color(mut self, color: Color32) -> Self {
        self.color = Some(ColorRef::Rgb(color));
        self
    }

    /// Stroke color taken from the style palette.
    pub fn color_named(mut self, name: impl Into<String>) -> Self {
        self.color = Some(ColorRef::Named(name.into()));
        self
    }

    /// Stroke width in pixels, clamped into `1..=MAX_STROKE_WIDTH`.
    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Number of sparks.
    pub fn sparks(mut self, sparks: usize) -> Self {
        self.sparks = sparks;
        self
    }

    /// Spark speed in curve units per second.
    pub fn spark_speed(mut self, speed: f64) -> Self {
        self.spark_speed = speed;
        self
    }

    /// Spark color; defaults to a brightened stroke color.
    pub fn spark_color(mut self, color: Color32) -> Self {
        self.spark_color = Some(ColorRef::Rgb(color));
        self
    }

    /// Push both endpoints this many pixels away from their blocks.
    pub fn out_offset(mut self, pixels: f32) -> Self {
        self.out_offset = pixels;
        self
    }

    /// Whether to draw the arrowhead.
    pub fn arrow(mut self, arrow: bool) -> Self {
        self.arrow = arrow;
        self
    }

    /// Start anchor.
    pub fn start(&self) -> Anchor {
        self.start
    }

    /// End anchor.
    pub fn end(&self) -> Anchor {
        self.end
    }
}

/// A directed curve between two anchors with its spark state.
#[derive(Debug)]
pub struct Connection {
    start: Anchor,
    end: Anchor,
    color: Color32,
    spark_color: Color32,
    width: u32,
    out_offset: f32,
    arrow: bool,
    sparks: SparkScheduler,
}

impl Connection {
    /// Resolves colors and sets up the spark scheduler.
    ///
    /// # Arguments
    ///
    /// * `spec` - Anchors and appearance
    /// * `mode` - Spark strategy, fixed for the connection's lifetime
    /// * `seed` - Seed for the emission RNG
    /// * `style` - Supplies default and palette colors
    ///
    /// # Errors
    ///
    /// [`FlowError::UnknownColor`] if a palette name is not in the style.
    pub fn new(spec: ConnectionSpec, mode: SparkMode, seed: u64, style: &Style) -> FlowResult<Self> {
        let color = match &spec.color {
            Some(c) => c.resolve(style)?,
            None => style.arrow_color,
        };
        let spark_color = match &spec.spark_color {
            Some(c) => c.resolve(style)?,
            None => style.spark_color_for(color),
        };
        let out_offset = if spec.out_offset.is_finite() {
            spec.out_offset
        } else {
            0.0
        };
        Ok(Self {
            start: spec.start,
            end: spec.end,
            color,
            spark_color,
            width: spec.width.max(1.0).min(MAX_STROKE_WIDTH).round() as u32,
            out_offset,
            arrow: spec.arrow,
            sparks: SparkScheduler::new(spec.sparks, spec.spark_speed, mode, seed),
        })
    }

    /// Start anchor.
    pub fn start(&self) -> Anchor {
        self.start
    }

    /// End anchor.
    pub fn end(&self) -> Anchor {
        self.end
    }

    /// Stroke color.
    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Spark color.
    pub fn spark_color(&self) -> Color32 {
        self.spark_color
    }

    /// Stroke width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Spark state.
    pub fn sparks(&self) -> &SparkScheduler {
        &self.sparks
    }

    /// Spark radius: a little wider than the stroke.
    pub fn spark_radius(&self) -> f32 {
        (self.width.saturating_add(5) / 2).max(1) as f32
    }

    /// Start point, outward direction, end point and inward direction.
    pub fn endpoints(&self, blocks: &[Block]) -> FlowResult<(Pos2, Vec2, Pos2, Vec2)> {
        let (p0, d0) = self.start.resolve(blocks)?;
        let (p3, n3) = self.end.resolve(blocks)?;
        let d3 = -n3;
        Ok((p0 + d0 * self.out_offset, d0, p3 - d3 * self.out_offset, d3))
    }

    /// The curve for the blocks' current positions.
    pub fn curve(&self, blocks: &[Block], style: &Style) -> FlowResult<CubicCurve> {
        let (p0, d0, p3, d3) = self.endpoints(blocks)?;
        let (c1, c2) = build_controls(p0, d0, p3, d3, &style.curve);
        Ok(CubicCurve::new(p0, c1, c2, p3))
    }

    /// Strokes the curve over a wider shadow pass and draws the arrowhead.
    ///
    /// Returns the curve so sparks can be placed on it.
    pub fn render(
        &self,
        surface: &mut dyn RenderSurface,
        blocks: &[Block],
        style: &Style,
    ) -> FlowResult<CubicCurve> {
        let curve = self.curve(blocks, style)?;
        let points = curve.polyline(style.curve.samples);
        let width = self.width as f32;

        surface.polyline(&points, width + style.shadow_extra_width, style.shadow_color);
        surface.polyline(&points, width, self.color);

        if self.arrow {
            // A zero tangent at the tip means coincident control points
            if let Some(head) = arrowhead(curve.p3, curve.tangent_at(1.0), &style.arrow_head) {
                surface.polygon(&head, self.color);
            }
        }
        Ok(curve)
    }

    /// Steps the spark scheduler and draws every live spark on `curve`.
    ///
    /// # Arguments
    ///
    /// * `surface` - Target surface
    /// * `curve` - Curve returned by [`Connection::render`] this frame
    /// * `elapsed` - Seconds since the scene started
    /// * `dt` - Seconds since the previous frame
    pub fn advance_and_render_sparks(
        &mut self,
        surface: &mut dyn RenderSurface,
        curve: &CubicCurve,
        elapsed: f64,
        dt: f64,
    ) {
        let radius = self.spark_radius();
        for t in self.sparks.advance(elapsed, dt) {
            surface.filled_circle(curve.point_at(t as f32), radius, self.spark_color);
        }
    }
}
