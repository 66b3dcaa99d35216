//! Interactive window for animated diagrams.
//!
//! # Module Organization
//!
//! - `state` - The [`FlowApp`] application struct
//! - `canvas` - Pointer translation and the per-frame draw
//! - `rendering` - A render surface on top of the egui painter

mod canvas;
mod rendering;
mod state;

pub use state::FlowApp;

use crate::scene::InputEvent;
use eframe::egui;
use std::time::Duration;

impl eframe::App for FlowApp {
    /// Main update function called by egui for each frame.
    ///
    /// Closes the window once the scene stops, either because the user closed
    /// it or because the frame recorder reached its limit.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        if ctx.input(|i| i.viewport().close_requested()) {
            self.running = self.scene.handle_event(InputEvent::Quit);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Err(err) = self.draw_canvas(ui) {
                    log::error!("Stopping: {err}");
                    self.running = false;
                }
            });

        if self.running {
            ctx.request_repaint_after(Duration::from_secs_f64(1.0 / f64::from(self.fps)));
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

#[cfg(test)]
mod tests;
