//! Application state for the interactive window.

use crate::export::FrameExporter;
use crate::scene::Scene;

/// eframe application showing one animated [`Scene`].
///
/// Optionally records frames while the window is open.
pub struct FlowApp {
    /// The diagram being shown
    pub(crate) scene: Scene,
    /// Frame recorder, present when a save prefix was given
    pub(crate) exporter: Option<FrameExporter>,
    /// Target frame rate
    pub(crate) fps: u32,
    /// Cleared when the window should close
    pub(crate) running: bool,
}

impl FlowApp {
    /// Wraps a scene and an optional frame recorder.
    ///
    /// # Arguments
    ///
    /// * `scene` - The diagram to animate
    /// * `exporter` - Saves frames while running, if present
    /// * `fps` - Repaint rate the window asks for
    pub fn new(scene: Scene, exporter: Option<FrameExporter>, fps: u32) -> Self {
        Self {
            scene,
            exporter,
            fps: fps.max(1),
            running: true,
        }
    }

    /// The animated scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// False once the window was asked to close or all frames were saved.
    pub fn is_running(&self) -> bool {
        self.running
    }
}
