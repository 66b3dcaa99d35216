//! # Neuro Flow
//!
//! Animated flow diagrams: labeled blocks joined by smooth cubic Bézier arrows,
//! with small "sparks" traveling along every arrow to show direction of flow.
//!
//! ## Features
//! - Anchors anywhere along a block edge, following the block while it is dragged
//! - Curves that leave and enter blocks perpendicular to the edge
//! - Fixed-phase sparks (deterministic loop) or randomized emission with a seeded RNG
//! - Frame export to numbered PNG files, windowed or headless
//! - JSON-configurable style
//!
//! ## Example
//!
//! ```no_run
//! use neuro_flow::{run_app, Block, ConnectionSpec, Anchor, Edge, ExportOptions, FlowOptions, Scene, Style};
//!
//! fn main() -> neuro_flow::FlowResult<()> {
//!     let mut scene = Scene::new("Two blocks", 600.0, 400.0, Style::default(), FlowOptions::default());
//!     let a = scene.add_block(Block::new(60.0, 60.0, 180.0, 80.0, "Input")?);
//!     let b = scene.add_block(Block::new(340.0, 240.0, 180.0, 80.0, "Output")?);
//!     scene.connect(
//!         ConnectionSpec::new(Anchor::new(a, Edge::Right, 0.0), Anchor::new(b, Edge::Left, 0.0))
//!             .sparks(3),
//!     )?;
//!     run_app(scene, &ExportOptions::default(), 120)
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod anchor;
pub mod arrowhead;
pub mod connection;
pub mod constants;
pub mod curve;
pub mod diagrams;
pub mod error;
pub mod export;
pub mod geometry;
pub mod scene;
pub mod sparks;
pub mod style;
pub mod surface;
mod types;
mod ui;

// Re-export public types and functions
pub use anchor::{anchor_point, edge_direction, Edge};
pub use arrowhead::{arrowhead, ArrowHeadStyle};
pub use connection::{Anchor, ColorRef, Connection, ConnectionSpec};
pub use curve::{build_controls, control_push, CurveStyle};
pub use diagrams::{all_diagrams, build_diagram, build_diagram_with_style, DiagramInfo, DiagramKind};
pub use error::{FlowError, FlowResult};
pub use export::{render_frames, ExportOptions, FrameExporter, Rasterizer, SvgFrame};
pub use geometry::{point_at, tangent_at, CubicCurve};
pub use scene::{FlowOptions, InputEvent, Scene};
pub use sparks::{EmissionOptions, SparkMode, SparkScheduler};
pub use style::Style;
pub use surface::{RenderSurface, Tee, TextAlign};
pub use types::*;
pub use ui::FlowApp;

/// Opens a window animating `scene` until it is closed.
///
/// This function initializes the egui application window and starts the main event loop.
/// When `export` has a prefix, frames are saved while the window is open and
/// the window closes by itself after `max_frames` saved frames.
///
/// # Returns
///
/// Returns `Ok(())` once the window closes, or a [`FlowError`] if the output
/// directory or the window cannot be created.
pub fn run_app(scene: Scene, export: &ExportOptions, fps: u32) -> FlowResult<()> {
    let exporter = FrameExporter::new(export)?;
    let title = scene.title().to_string();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(scene.size())
            .with_resizable(false)
            .with_title(&title),
        ..Default::default()
    };
    log::info!("Opening window '{title}'");
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(FlowApp::new(scene, exporter, fps)))),
    )?;
    Ok(())
}
