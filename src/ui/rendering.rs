//! [`RenderSurface`] backed by an egui painter.

use crate::surface::{RenderSurface, TextAlign};
use eframe::egui;
use eframe::epaint::StrokeKind;

/// Draws scene primitives with an egui painter, shifted to the canvas origin.
pub(crate) struct PainterSurface<'p> {
    painter: &'p egui::Painter,
    origin: egui::Vec2,
    size: egui::Vec2,
}

impl<'p> PainterSurface<'p> {
    /// # Arguments
    ///
    /// * `painter` - Painter clipped to the canvas
    /// * `origin` - Screen offset of canvas coordinate (0, 0)
    /// * `size` - Canvas size in pixels
    pub(crate) fn new(painter: &'p egui::Painter, origin: egui::Vec2, size: egui::Vec2) -> Self {
        Self {
            painter,
            origin,
            size,
        }
    }

    fn to_screen(&self, p: egui::Pos2) -> egui::Pos2 {
        p + self.origin
    }
}

impl RenderSurface for PainterSurface<'_> {
    fn size(&self) -> egui::Vec2 {
        self.size
    }

    fn clear(&mut self, color: egui::Color32) {
        let rect = egui::Rect::from_min_size(self.origin.to_pos2(), self.size);
        self.painter.rect_filled(rect, 0.0, color);
    }

    fn line(&mut self, a: egui::Pos2, b: egui::Pos2, width: f32, color: egui::Color32) {
        self.painter.line_segment(
            [self.to_screen(a), self.to_screen(b)],
            egui::Stroke::new(width, color),
        );
    }

    fn polyline(&mut self, points: &[egui::Pos2], width: f32, color: egui::Color32) {
        let points = points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter
            .add(egui::Shape::line(points, egui::Stroke::new(width, color)));
    }

    fn polygon(&mut self, points: &[egui::Pos2], color: egui::Color32) {
        let points = points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter.add(egui::Shape::convex_polygon(
            points,
            color,
            egui::Stroke::NONE,
        ));
    }

    fn filled_circle(&mut self, center: egui::Pos2, radius: f32, color: egui::Color32) {
        self.painter
            .circle_filled(self.to_screen(center), radius, color);
    }

    fn rect(
        &mut self,
        rect: egui::Rect,
        corner_radius: f32,
        fill: egui::Color32,
        stroke: Option<(f32, egui::Color32)>,
    ) {
        let rect = rect.translate(self.origin);
        self.painter.rect_filled(rect, corner_radius, fill);
        if let Some((width, color)) = stroke {
            self.painter.rect_stroke(
                rect,
                corner_radius,
                egui::Stroke::new(width, color),
                StrokeKind::Inside,
            );
        }
    }

    fn text(
        &mut self,
        pos: egui::Pos2,
        text: &str,
        size: f32,
        color: egui::Color32,
        align: TextAlign,
    ) {
        let anchor = match align {
            TextAlign::Center => egui::Align2::CENTER_CENTER,
            TextAlign::TopLeft => egui::Align2::LEFT_TOP,
            TextAlign::TopRight => egui::Align2::RIGHT_TOP,
        };
        self.painter.text(
            self.to_screen(pos),
            anchor,
            text,
            egui::FontId::proportional(size),
            color,
        );
    }
}
