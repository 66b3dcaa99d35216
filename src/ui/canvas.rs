//! Canvas allocation, pointer input and the per-frame draw.
//!
//! The scene works in canvas coordinates with the origin at the top-left of
//! the painted area; egui reports screen coordinates, so every pointer
//! position is shifted by the canvas origin before it reaches the scene.

use super::rendering::PainterSurface;
use super::state::FlowApp;
use crate::error::FlowResult;
use crate::export::SvgFrame;
use crate::scene::InputEvent;
use crate::surface::Tee;
use eframe::egui;

/// Converts raw egui events into scene input, relative to `origin`.
///
/// Only the primary button drags; every other event is ignored.
///
/// # Arguments
///
/// * `events` - This frame's raw input events
/// * `origin` - Screen position of the canvas' top-left corner
pub(crate) fn translate_events(events: &[egui::Event], origin: egui::Pos2) -> Vec<InputEvent> {
    let to_canvas = |p: egui::Pos2| p - origin.to_vec2();
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMove(to_canvas(*pos))),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => Some(if *pressed {
                InputEvent::PointerDown(to_canvas(*pos))
            } else {
                InputEvent::PointerUp
            }),
            _ => None,
        })
        .collect()
}

impl FlowApp {
    /// Feeds this frame's input to the scene and draws it.
    ///
    /// When a frame is due for export, the same render pass also fills an
    /// [`SvgFrame`] so sparks advance exactly once per presented frame.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI the canvas is allocated in
    pub(crate) fn draw_canvas(&mut self, ui: &mut egui::Ui) -> FlowResult<()> {
        let size = self.scene.size();
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        let (events, dt) = ui.input(|i| (translate_events(&i.events, origin), f64::from(i.stable_dt)));
        for event in events {
            if !self.scene.handle_event(event) {
                self.running = false;
            }
        }

        let mut surface = PainterSurface::new(&painter, origin.to_vec2(), size);
        let capture = self
            .exporter
            .as_mut()
            .is_some_and(|exporter| exporter.capture_due());

        if !capture {
            return self.scene.render_frame(&mut surface, dt);
        }

        let mut frame = SvgFrame::new(size.x, size.y);
        self.scene.render_frame(&mut Tee::new(&mut surface, &mut frame), dt)?;
        if let Some(exporter) = self.exporter.as_mut() {
            exporter.save(&frame)?;
            if exporter.finished() {
                self.running = false;
            }
        }
        Ok(())
    }
}
