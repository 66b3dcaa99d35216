//! Built-in diagrams selectable from the command line.
//!
//! - [`DiagramKind::Offsets`] shows how edge offsets spread anchors along a side.
//! - [`DiagramKind::NeuroFlow`] is the motor/sensory pathway diagram with
//!   sparks on every connection.

use crate::anchor::Edge;
use crate::connection::{Anchor, ConnectionSpec};
use crate::error::FlowResult;
use crate::scene::{FlowOptions, Scene};
use crate::style::Style;
use crate::types::{Block, BlockId};

/// Kinds of built-in diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DiagramKind {
    /// Two blocks joined at three different edge offsets
    Offsets,
    /// Motor, sensory, cerebellum, basal ganglia and thalamus loops
    #[default]
    NeuroFlow,
}

/// Metadata for a single diagram.
pub struct DiagramInfo {
    /// Stable identifier for the diagram
    pub kind: DiagramKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all diagrams with their display names.
pub const fn all_diagrams() -> &'static [DiagramInfo] {
    const DIAGRAMS: &[DiagramInfo] = &[
        DiagramInfo {
            kind: DiagramKind::Offsets,
            name: "Curved arrows with edge offsets",
        },
        DiagramInfo {
            kind: DiagramKind::NeuroFlow,
            name: "Neuro Flow: Motor/Sensory/Cerebellum/Basal/Thalamus",
        },
    ];
    DIAGRAMS
}

/// Builds a scene for the given diagram using the default style.
pub fn build_diagram(kind: DiagramKind, options: FlowOptions) -> FlowResult<Scene> {
    build_diagram_with_style(kind, options, None)
}

/// Builds a scene for the given diagram.
///
/// A supplied `style` replaces the diagram's own style entirely.
pub fn build_diagram_with_style(
    kind: DiagramKind,
    options: FlowOptions,
    style: Option<Style>,
) -> FlowResult<Scene> {
    let scene = match kind {
        DiagramKind::Offsets => build_offsets(options, style.unwrap_or_default())?,
        DiagramKind::NeuroFlow => build_neuro_flow(options, style.unwrap_or_else(neuro_flow_style))?,
    };
    log::info!(
        "Built diagram '{}' with {} blocks and {} connections",
        scene.title(),
        scene.blocks().len(),
        scene.connections().len()
    );
    Ok(scene)
}

fn build_offsets(options: FlowOptions, style: Style) -> FlowResult<Scene> {
    let mut scene = Scene::new("Curved arrows with edge offsets", 900.0, 560.0, style, options);
    let a = scene.add_block(Block::new(160.0, 180.0, 200.0, 100.0, "Block A")?);
    let b = scene.add_block(Block::new(560.0, 280.0, 200.0, 100.0, "Block B")?);

    for (edge, offset) in [(Edge::Bottom, -0.35), (Edge::Right, 0.0), (Edge::Top, 0.35)] {
        scene.connect(ConnectionSpec::new(
            Anchor::new(a, edge, offset),
            Anchor::new(b, Edge::Left, offset),
        ))?;
    }

    scene.set_hud("Drag blocks. Offsets: -0.5..0.5 along edges from center.");
    Ok(scene)
}

/// Default style with the wider lever arm the pathway diagram was laid out for.
fn neuro_flow_style() -> Style {
    let mut style = Style::default();
    style.curve.push_max = 320.0;
    style
}

/// One sparked 3px link in a palette color.
fn link(
    from: (BlockId, Edge, f32),
    to: (BlockId, Edge, f32),
    color: &str,
    sparks: usize,
    speed: f64,
) -> ConnectionSpec {
    ConnectionSpec::new(Anchor::new(from.0, from.1, from.2), Anchor::new(to.0, to.1, to.2))
        .color_named(color)
        .width(3.0)
        .sparks(sparks)
        .spark_speed(speed)
}

fn build_neuro_flow(options: FlowOptions, style: Style) -> FlowResult<Scene> {
    use Edge::{Bottom, Left, Right, Top};

    let mut scene = Scene::new(
        "Neuro Flow: Motor/Sensory/Cerebellum/Basal/Thalamus",
        1000.0,
        720.0,
        style,
        options,
    );

    // Descending motor chain down the middle
    let motor_cortex = scene.add_block(Block::new(390.0, 30.0, 220.0, 80.0, "Motor Cortex")?);
    let tract = scene.add_block(Block::new(390.0, 130.0, 220.0, 80.0, "Corticospinal Tract")?);
    let spinal = scene.add_block(Block::new(360.0, 230.0, 280.0, 80.0, "Spinal Cord<br/>Lower Motor Neurons")?);
    let nerves = scene.add_block(Block::new(390.0, 330.0, 220.0, 80.0, "Peripheral Nerves")?);
    let muscles = scene.add_block(Block::new(390.0, 430.0, 220.0, 80.0, "Muscles")?);

    let feedback = scene.add_block(Block::new(340.0, 540.0, 320.0, 80.0, "Movement & Sensory Feedback")?);
    let spinal_feedback = scene.add_block(Block::new(70.0, 540.0, 260.0, 80.0, "Spinal Cord Feedback")?);
    let thalamus = scene.add_block(Block::new(720.0, 280.0, 220.0, 110.0, "Thalamus")?);

    let pons = scene.add_block(Block::new(70.0, 130.0, 200.0, 80.0, "Pons")?);
    let cerebellum = scene.add_block(Block::new(70.0, 230.0, 200.0, 80.0, "Cerebellum")?);

    let basal = scene.add_block(Block::new(720.0, 70.0, 220.0, 80.0, "Basal Ganglia")?);
    let olfactory = scene.add_block(Block::new(720.0, 430.0, 220.0, 80.0, "Olfactory Input")?);

    for (from, to) in [
        (motor_cortex, tract),
        (tract, spinal),
        (spinal, nerves),
        (nerves, muscles),
    ] {
        scene.connect(link((from, Bottom, 0.0), (to, Top, 0.0), "motor", 3, 0.8))?;
    }

    // Sensory feedback fans out to the spinal cord and the thalamus
    scene.connect(link((muscles, Bottom, 0.0), (feedback, Top, 0.0), "sens1", 3, 0.8))?;
    scene.connect(link((feedback, Left, 0.0), (spinal_feedback, Right, 0.0), "sens2", 2, 0.7))?;
    scene.connect(link((feedback, Right, 0.0), (thalamus, Bottom, 0.0), "sens2", 2, 0.7))?;

    // Cerebellar loop
    scene.connect(link((motor_cortex, Left, -0.2), (pons, Right, -0.2), "cereb", 3, 0.8))?;
    scene.connect(link((pons, Bottom, 0.0), (cerebellum, Top, 0.0), "cereb", 3, 0.8))?;
    scene.connect(link((cerebellum, Right, 0.0), (thalamus, Left, -0.1), "cereb", 3, 0.8))?;

    scene.connect(link((basal, Bottom, 0.0), (thalamus, Top, 0.0), "basal", 3, 0.8))?;
    scene.connect(link((thalamus, Right, 0.0), (motor_cortex, Right, 0.0), "thal", 4, 0.9))?;

    // Olfaction bypasses the thalamus
    scene.connect(link((olfactory, Left, 0.0), (motor_cortex, Bottom, 0.3), "olf", 3, 0.8))?;

    scene.set_hud("KintaroAI.com");
    Ok(scene)
}
