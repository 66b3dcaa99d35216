//! A complete animated diagram: blocks, connections, input and the frame step.
//!
//! The scene is single-threaded and driven from outside. Each frame the host
//! feeds pending [`InputEvent`]s to [`Scene::handle_event`] and then calls
//! [`Scene::render_frame`] once with the time since the previous frame.

use crate::constants::MIN_GRID_GAP;
use crate::connection::{Connection, ConnectionSpec};
use crate::error::{FlowError, FlowResult};
use crate::sparks::SparkMode;
use crate::style::{with_alpha, Style};
use crate::surface::{RenderSurface, TextAlign};
use crate::types::{Block, BlockId, BlockLayer};
use egui::{pos2, vec2, Pos2, Vec2};

/// Margin of the HUD and debug text from the window corners.
const HUD_MARGIN: f32 = 10.0;

/// Run-wide options, usually taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowOptions {
    /// Spark strategy used by every connection
    pub spark_mode: SparkMode,
    /// Master seed for emission RNGs; random when `None`
    pub seed: Option<u64>,
    /// Show the position of the dragged block
    pub debug: bool,
}

/// Input the scene reacts to, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed
    PointerDown(Pos2),
    /// Primary button released
    PointerUp,
    /// Pointer moved
    PointerMove(Pos2),
    /// Window closed or quit requested
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    block: BlockId,
    grab: Vec2,
}

/// Blocks, connections and the running animation state.
#[derive(Debug)]
pub struct Scene {
    title: String,
    size: Vec2,
    style: Style,
    options: FlowOptions,
    master_seed: u64,
    blocks: Vec<Block>,
    connections: Vec<Connection>,
    hud: Option<String>,
    drag: Option<Drag>,
    elapsed: f64,
}

impl Scene {
    /// Creates an empty scene of `width` by `height` pixels.
    ///
    /// # Arguments
    ///
    /// * `title` - Window title
    /// * `width`, `height` - Canvas size in pixels
    /// * `style` - Colors and sizes for every frame
    /// * `options` - Spark strategy, seed and debug overlay
    pub fn new(title: impl Into<String>, width: f32, height: f32, style: Style, options: FlowOptions) -> Self {
        let master_seed = options.seed.unwrap_or_else(rand::random::<u64>);
        let title = title.into();
        log::debug!("Creating scene '{title}' ({width}x{height}, seed {master_seed})");
        Self {
            title,
            size: vec2(width, height),
            style,
            options,
            master_seed,
            blocks: Vec::new(),
            connections: Vec::new(),
            hud: None,
            drag: None,
            elapsed: 0.0,
        }
    }

    /// Adds a block drawn beneath the connections.
    pub fn add_block(&mut self, block: Block) -> BlockId {
        self.push(block.with_layer(BlockLayer::Diagram))
    }

    /// Adds a block drawn above connections and sparks.
    pub fn add_note(&mut self, block: Block) -> BlockId {
        self.push(block.with_layer(BlockLayer::Note))
    }

    fn push(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        id
    }

    /// Adds a connection and returns its index.
    ///
    /// The connection's RNG is seeded with the scene seed plus its index, so a
    /// fixed `--seed` reproduces every connection independently.
    ///
    /// # Errors
    ///
    /// [`FlowError::UnknownBlock`] if an anchor names a block that is not in
    /// this scene, [`FlowError::UnknownColor`] for an unknown palette name.
    pub fn connect(&mut self, spec: ConnectionSpec) -> FlowResult<usize> {
        for anchor in [spec.start(), spec.end()] {
            if anchor.block.index() >= self.blocks.len() {
                return Err(FlowError::UnknownBlock(anchor.block));
            }
        }
        let index = self.connections.len();
        let seed = self.master_seed.wrapping_add(index as u64);
        let connection = Connection::new(spec, self.options.spark_mode, seed, &self.style)?;
        self.connections.push(connection);
        Ok(index)
    }

    /// Sets the caption drawn in the top-left corner.
    pub fn set_hud(&mut self, text: impl Into<String>) {
        self.hud = Some(text.into());
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Style used for every frame.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Run-wide options.
    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// Seed the connection RNGs derive from.
    pub fn seed(&self) -> u64 {
        self.master_seed
    }

    /// All blocks in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// One block by id.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// All connections in drawing order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// HUD caption, if any.
    pub fn hud(&self) -> Option<&str> {
        self.hud.as_deref()
    }

    /// Seconds of animation rendered so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Block currently being dragged.
    pub fn dragging(&self) -> Option<BlockId> {
        self.drag.map(|d| d.block)
    }

    /// Topmost-priority block under `pos`.
    ///
    /// Diagram blocks are tested before notes, each in insertion order; the
    /// first hit wins.
    pub fn block_at(&self, pos: Pos2) -> Option<BlockId> {
        [BlockLayer::Diagram, BlockLayer::Note]
            .into_iter()
            .flat_map(|layer| {
                self.blocks
                    .iter()
                    .enumerate()
                    .filter(move |(_, b)| b.layer() == layer)
            })
            .find(|(_, b)| b.contains(pos))
            .map(|(i, _)| BlockId(i))
    }

    /// Applies one input event. Returns `false` once the scene should stop.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Quit => return false,
            InputEvent::PointerDown(pos) => {
                if let Some(id) = self.block_at(pos) {
                    let grab = pos - self.blocks[id.index()].position;
                    log::debug!("Dragging block {id} '{}'", self.blocks[id.index()].label());
                    self.drag = Some(Drag { block: id, grab });
                }
            }
            InputEvent::PointerMove(pos) => {
                if let Some(drag) = self.drag {
                    if let Some(block) = self.blocks.get_mut(drag.block.index()) {
                        block.position = pos - drag.grab;
                    }
                }
            }
            InputEvent::PointerUp => {
                if let Some(drag) = self.drag.take() {
                    log::debug!("Released block {}", drag.block);
                }
            }
        }
        true
    }

    /// Advances the animation by `dt` seconds and draws one frame.
    ///
    /// Layers, back to front: background, grid, diagram blocks, connections
    /// with their sparks, notes, HUD, debug overlay.
    pub fn render_frame(&mut self, surface: &mut dyn RenderSurface, dt: f64) -> FlowResult<()> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        surface.clear(self.style.background);
        self.draw_grid(surface);

        for block in self.blocks.iter().filter(|b| b.layer() == BlockLayer::Diagram) {
            draw_block(surface, block, &self.style);
        }

        for connection in &mut self.connections {
            let curve = connection.render(surface, &self.blocks, &self.style)?;
            connection.advance_and_render_sparks(surface, &curve, self.elapsed, dt);
        }

        for block in self.blocks.iter().filter(|b| b.layer() == BlockLayer::Note) {
            draw_block(surface, block, &self.style);
        }

        if let Some(hud) = &self.hud {
            surface.text(
                pos2(HUD_MARGIN, HUD_MARGIN),
                hud,
                self.style.text_size,
                self.style.hud_color,
                TextAlign::TopLeft,
            );
        }

        if self.options.debug {
            if let Some(block) = self.drag.and_then(|d| self.blocks.get(d.block.index())) {
                let text = format!(
                    "{}: ({:.0}, {:.0})",
                    block.label().replace('\n', " "),
                    block.position.x,
                    block.position.y
                );
                let right = surface.size().x - HUD_MARGIN;
                surface.text(
                    pos2(right, HUD_MARGIN),
                    &text,
                    self.style.text_size,
                    self.style.debug_color,
                    TextAlign::TopRight,
                );
            }
        }
        Ok(())
    }

    fn draw_grid(&self, surface: &mut dyn RenderSurface) {
        let gap = self.style.grid_gap;
        if !(gap > 0.0) {
            return;
        }
        let gap = gap.max(MIN_GRID_GAP);
        let size = surface.size();
        let color = self.style.grid_color;
        for i in 0..(size.x / gap).ceil() as usize {
            let x = i as f32 * gap;
            surface.line(pos2(x, 0.0), pos2(x, size.y), 1.0, color);
        }
        for i in 0..(size.y / gap).ceil() as usize {
            let y = i as f32 * gap;
            surface.line(pos2(0.0, y), pos2(size.x, y), 1.0, color);
        }
    }
}

/// Rounded rectangle with translucent fill and border, label always opaque.
fn draw_block(surface: &mut dyn RenderSurface, block: &Block, style: &Style) {
    let alpha = block.alpha();
    surface.rect(
        block.rect(),
        style.block_corner_radius,
        with_alpha(style.block_fill, alpha),
        Some((style.block_border_width, with_alpha(style.block_border, alpha))),
    );
    surface.text(
        block.rect().center(),
        block.label(),
        style.text_size,
        style.text_color,
        TextAlign::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Edge;
    use crate::connection::Anchor;
    use crate::sparks::EmissionOptions;
    use crate::surface::recording::{DrawOp, RecordingSurface};

    fn options() -> FlowOptions {
        FlowOptions {
            seed: Some(7),
            ..FlowOptions::default()
        }
    }

    fn two_block_scene() -> (Scene, BlockId, BlockId) {
        let mut scene = Scene::new("test", 900.0, 560.0, Style::default(), options());
        let a = scene.add_block(Block::new(160.0, 180.0, 200.0, 100.0, "A").unwrap());
        let b = scene.add_block(Block::new(560.0, 280.0, 200.0, 100.0, "B").unwrap());
        (scene, a, b)
    }

    #[test]
    fn test_drag_moves_only_target() {
        let (mut scene, a, b) = two_block_scene();
        assert!(scene.handle_event(InputEvent::PointerDown(pos2(170.0, 190.0))));
        assert_eq!(scene.dragging(), Some(a));

        scene.handle_event(InputEvent::PointerMove(pos2(270.0, 240.0)));
        assert_eq!(scene.block(a).unwrap().position, pos2(260.0, 230.0));
        assert_eq!(scene.block(b).unwrap().position, pos2(560.0, 280.0));

        scene.handle_event(InputEvent::PointerUp);
        assert_eq!(scene.dragging(), None);
        scene.handle_event(InputEvent::PointerMove(pos2(0.0, 0.0)));
        assert_eq!(scene.block(a).unwrap().position, pos2(260.0, 230.0));
    }

    #[test]
    fn test_press_on_empty_canvas_drags_nothing() {
        let (mut scene, _, _) = two_block_scene();
        scene.handle_event(InputEvent::PointerDown(pos2(5.0, 5.0)));
        assert_eq!(scene.dragging(), None);
        scene.handle_event(InputEvent::PointerMove(pos2(100.0, 100.0)));
        assert_eq!(scene.blocks()[0].position, pos2(160.0, 180.0));
    }

    #[test]
    fn test_quit_stops_loop() {
        let (mut scene, _, _) = two_block_scene();
        assert!(scene.handle_event(InputEvent::PointerUp));
        assert!(!scene.handle_event(InputEvent::Quit));
    }

    #[test]
    fn test_block_at_prefers_diagram_blocks_over_notes() {
        let mut scene = Scene::new("test", 400.0, 400.0, Style::default(), options());
        let note = scene.add_note(Block::new(0.0, 0.0, 100.0, 100.0, "note").unwrap());
        let block = scene.add_block(Block::new(50.0, 50.0, 100.0, 100.0, "block").unwrap());
        assert_eq!(scene.block_at(pos2(75.0, 75.0)), Some(block));
        assert_eq!(scene.block_at(pos2(10.0, 10.0)), Some(note));
        assert_eq!(scene.block_at(pos2(300.0, 300.0)), None);
    }

    #[test]
    fn test_first_inserted_block_wins_overlap() {
        let mut scene = Scene::new("test", 400.0, 400.0, Style::default(), options());
        let first = scene.add_block(Block::new(0.0, 0.0, 100.0, 100.0, "1").unwrap());
        scene.add_block(Block::new(0.0, 0.0, 100.0, 100.0, "2").unwrap());
        assert_eq!(scene.block_at(pos2(50.0, 50.0)), Some(first));
    }

    #[test]
    fn test_connect_rejects_foreign_block() {
        let (mut scene, a, _) = two_block_scene();
        let spec = ConnectionSpec::new(
            Anchor::new(a, Edge::Right, 0.0),
            Anchor::new(BlockId(42), Edge::Left, 0.0),
        );
        assert!(matches!(scene.connect(spec), Err(FlowError::UnknownBlock(BlockId(42)))));
        assert!(scene.connections().is_empty());
    }

    #[test]
    fn test_render_frame_layers() {
        let mut scene = Scene::new("test", 100.0, 48.0, Style::default(), options());
        let a = scene.add_block(Block::new(0.0, 0.0, 20.0, 20.0, "A").unwrap());
        let b = scene.add_block(Block::new(60.0, 0.0, 20.0, 20.0, "B").unwrap());
        scene.add_note(Block::new(30.0, 30.0, 10.0, 10.0, "N").unwrap().with_alpha(128));
        scene
            .connect(ConnectionSpec::new(Anchor::new(a, Edge::Right, 0.0), Anchor::new(b, Edge::Left, 0.0)).sparks(1))
            .unwrap();
        scene.set_hud("hello");

        let mut surface = RecordingSurface::new(100.0, 48.0);
        scene.render_frame(&mut surface, 0.25).unwrap();
        assert_eq!(scene.elapsed(), 0.25);

        assert_eq!(surface.ops[0], DrawOp::Clear(scene.style().background));
        // 5 vertical + 2 horizontal grid lines at gap 24.
        let grid = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count();
        assert_eq!(grid, 5 + 2);

        let kind = |op: &DrawOp| match op {
            DrawOp::Clear(_) => "clear",
            DrawOp::Line { .. } => "grid",
            DrawOp::Rect { .. } => "rect",
            DrawOp::Text { .. } => "text",
            DrawOp::Polyline { .. } => "curve",
            DrawOp::Polygon { .. } => "head",
            DrawOp::Circle { .. } => "spark",
        };
        let order: Vec<&str> = surface
            .ops
            .iter()
            .map(kind)
            .filter(|k| *k != "grid")
            .collect();
        assert_eq!(
            order,
            ["clear", "rect", "text", "rect", "text", "curve", "curve", "head", "spark", "rect", "text", "text"]
        );
        assert_eq!(surface.texts(), ["A", "B", "N", "hello"]);
    }

    #[test]
    fn test_tiny_grid_gap_is_widened() {
        let grid_lines = |gap: f32| {
            let style = Style {
                grid_gap: gap,
                ..Style::default()
            };
            let mut scene = Scene::new("grid", 900.0, 560.0, style, options());
            let mut surface = RecordingSurface::new(900.0, 560.0);
            scene.render_frame(&mut surface, 0.0).unwrap();
            surface
                .ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Line { .. }))
                .count()
        };
        assert_eq!(grid_lines(1.0e-5), 900 + 560);
        assert_eq!(grid_lines(0.5), 900 + 560);
        assert_eq!(grid_lines(1.0), 900 + 560);
        assert_eq!(grid_lines(0.0), 0);
        assert_eq!(grid_lines(-3.0), 0);
        assert_eq!(grid_lines(f32::NAN), 0);
    }

    #[test]
    fn test_block_alpha_applies_to_fill_and_border_only() {
        let mut scene = Scene::new("test", 10.0, 10.0, Style::default(), options());
        scene.add_block(Block::new(0.0, 0.0, 5.0, 5.0, "x").unwrap().with_alpha(0));
        let mut surface = RecordingSurface::new(10.0, 10.0);
        scene.render_frame(&mut surface, 0.0).unwrap();
        let rect = surface
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rect { fill, stroke, .. } => Some((*fill, *stroke)),
                _ => None,
            })
            .unwrap();
        assert_eq!(rect.0.a(), 0);
        assert_eq!(rect.1.unwrap().1.a(), 0);
    }

    #[test]
    fn test_debug_overlay_shows_dragged_block() {
        let mut scene = Scene::new(
            "test",
            900.0,
            560.0,
            Style::default(),
            FlowOptions {
                debug: true,
                ..options()
            },
        );
        scene.add_block(Block::new(160.0, 180.0, 200.0, 100.0, "Pons").unwrap());
        let mut surface = RecordingSurface::new(900.0, 560.0);
        scene.render_frame(&mut surface, 0.0).unwrap();
        assert_eq!(surface.texts(), ["Pons"]);

        scene.handle_event(InputEvent::PointerDown(pos2(200.0, 200.0)));
        scene.handle_event(InputEvent::PointerMove(pos2(210.0, 230.0)));
        let mut surface = RecordingSurface::new(900.0, 560.0);
        scene.render_frame(&mut surface, 0.0).unwrap();
        assert_eq!(surface.texts(), ["Pons", "Pons: (170, 210)"]);
        let last = surface.ops.last().unwrap();
        assert!(matches!(last, DrawOp::Text { pos, align: TextAlign::TopRight, .. } if pos.x == 890.0));
    }

    #[test]
    fn test_same_seed_reproduces_emission() {
        let build = || {
            let mut scene = Scene::new(
                "emit",
                900.0,
                560.0,
                Style::default(),
                FlowOptions {
                    spark_mode: SparkMode::Emission(EmissionOptions::default()),
                    seed: Some(99),
                    debug: false,
                },
            );
            let a = scene.add_block(Block::new(160.0, 180.0, 200.0, 100.0, "A").unwrap());
            let b = scene.add_block(Block::new(560.0, 280.0, 200.0, 100.0, "B").unwrap());
            for offset in [-0.35, 0.0, 0.35] {
                scene
                    .connect(
                        ConnectionSpec::new(Anchor::new(a, Edge::Right, offset), Anchor::new(b, Edge::Left, offset))
                            .sparks(3)
                            .spark_speed(0.8),
                    )
                    .unwrap();
            }
            scene
        };
        let (mut one, mut two) = (build(), build());
        assert_eq!(one.seed(), 99);
        for _ in 0..300 {
            let mut s1 = RecordingSurface::new(900.0, 560.0);
            let mut s2 = RecordingSurface::new(900.0, 560.0);
            one.render_frame(&mut s1, 1.0 / 120.0).unwrap();
            two.render_frame(&mut s2, 1.0 / 120.0).unwrap();
            assert_eq!(s1.circles(), s2.circles());
        }
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let (mut scene, _, _) = two_block_scene();
        let mut surface = RecordingSurface::new(900.0, 560.0);
        scene.render_frame(&mut surface, 0.5).unwrap();
        scene.render_frame(&mut surface, -1.0).unwrap();
        scene.render_frame(&mut surface, f64::NAN).unwrap();
        assert_eq!(scene.elapsed(), 0.5);
    }
}
