//! Drawing primitives the engine renders through.
//!
//! The engine never owns a window or an image; it issues these calls against
//! whatever surface the caller hands it (the egui painter, an SVG frame, or
//! both at once through [`Tee`]).

use egui::{Color32, Pos2, Rect, Vec2};

/// Where a text position sits relative to the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Position is the center of the text block
    Center,
    /// Position is the top-left corner
    TopLeft,
    /// Position is the top-right corner
    TopRight,
}

/// Retained drawing target for one frame.
pub trait RenderSurface {
    /// Drawable area in pixels.
    fn size(&self) -> Vec2;

    /// Fill the whole surface.
    fn clear(&mut self, color: Color32);

    /// Straight line segment.
    fn line(&mut self, a: Pos2, b: Pos2, width: f32, color: Color32);

    /// Connected line segments through `points`.
    fn polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
    }

    /// Filled convex polygon.
    fn polygon(&mut self, points: &[Pos2], color: Color32);

    /// Filled circle.
    fn filled_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    /// Rectangle with rounded corners, an optional fill and an optional border.
    fn rect(
        &mut self,
        rect: Rect,
        corner_radius: f32,
        fill: Color32,
        stroke: Option<(f32, Color32)>,
    );

    /// Possibly multi-line text.
    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32, align: TextAlign);
}

/// Forwards every call to two surfaces.
///
/// Lets one render pass feed both the window and a frame exporter, so
/// stateful spark emission only advances once per frame.
pub struct Tee<'a, 'b> {
    primary: &'a mut dyn RenderSurface,
    secondary: &'b mut dyn RenderSurface,
}

impl<'a, 'b> Tee<'a, 'b> {
    /// `primary` decides [`RenderSurface::size`].
    pub fn new(primary: &'a mut dyn RenderSurface, secondary: &'b mut dyn RenderSurface) -> Self {
        Self { primary, secondary }
    }
}

impl RenderSurface for Tee<'_, '_> {
    fn size(&self) -> Vec2 {
        self.primary.size()
    }

    fn clear(&mut self, color: Color32) {
        self.primary.clear(color);
        self.secondary.clear(color);
    }

    fn line(&mut self, a: Pos2, b: Pos2, width: f32, color: Color32) {
        self.primary.line(a, b, width, color);
        self.secondary.line(a, b, width, color);
    }

    fn polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        self.primary.polyline(points, width, color);
        self.secondary.polyline(points, width, color);
    }

    fn polygon(&mut self, points: &[Pos2], color: Color32) {
        self.primary.polygon(points, color);
        self.secondary.polygon(points, color);
    }

    fn filled_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.primary.filled_circle(center, radius, color);
        self.secondary.filled_circle(center, radius, color);
    }

    fn rect(
        &mut self,
        rect: Rect,
        corner_radius: f32,
        fill: Color32,
        stroke: Option<(f32, Color32)>,
    ) {
        self.primary.rect(rect, corner_radius, fill, stroke);
        self.secondary.rect(rect, corner_radius, fill, stroke);
    }

    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32, align: TextAlign) {
        self.primary.text(pos, text, size, color, align);
        self.secondary.text(pos, text, size, color, align);
    }
}
