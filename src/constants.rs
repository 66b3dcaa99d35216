//! Shared default values.
//! Centralizes tweakable numbers used by the default [`crate::Style`] and the frame loop.

// Palette
/// Canvas background.
pub const BACKGROUND: [u8; 3] = [22, 26, 30];
/// Grid line color.
pub const GRID: [u8; 3] = [36, 40, 45];
/// Block fill color (alpha comes from the block's opacity).
pub const BLOCK_FILL: [u8; 3] = [43, 48, 54];
/// Block border color (alpha comes from the block's opacity).
pub const BLOCK_BORDER: [u8; 3] = [90, 100, 110];
/// Default connection stroke color.
pub const ARROW_COLOR: [u8; 3] = [230, 235, 240];
/// Label text color.
pub const TEXT_COLOR: [u8; 3] = [235, 240, 245];
/// HUD caption color.
pub const HUD_COLOR: [u8; 3] = [180, 190, 200];
/// Debug overlay color.
pub const DEBUG_COLOR: [u8; 3] = [255, 107, 107];

// Grid/blocks
/// Spacing between grid lines in pixels.
pub const GRID_GAP: f32 = 24.0;
/// Smallest grid spacing drawn; finer gaps are widened to this.
pub const MIN_GRID_GAP: f32 = 1.0;
/// Corner radius of block rectangles.
pub const BLOCK_CORNER_RADIUS: f32 = 14.0;
/// Border width of block rectangles.
pub const BLOCK_BORDER_WIDTH: f32 = 2.0;
/// Label font size.
pub const TEXT_SIZE: f32 = 18.0;

// Curves
/// Upper bound of the control point lever arm.
pub const CONTROL_PUSH_MAX: f32 = 220.0;
/// Lever arm as a fraction of the start->end distance (clamped by the max).
pub const CONTROL_PUSH_RATIO: f32 = 0.42;
/// Segments used when stroking a curve.
pub const CURVE_SAMPLES: usize = 48;
/// Extra width of the dark pass drawn under every curve.
pub const SHADOW_EXTRA_WIDTH: f32 = 2.0;
/// Widest connection stroke in pixels.
pub const MAX_STROKE_WIDTH: f32 = 256.0;

// Arrowheads
/// Arrowhead wing length in pixels.
pub const ARROW_HEAD_LEN: f32 = 14.0;
/// Arrowhead half-angle in degrees.
pub const ARROW_HEAD_ANGLE_DEG: f32 = 25.0;

// Sparks
/// How much brighter than the stroke a default spark is, per channel.
pub const SPARK_BRIGHTEN: u8 = 30;
/// Default spark speed in curve units per second.
pub const SPARK_SPEED: f64 = 0.6;
/// Most sparks an uncapped emitter spawns in a single tick.
pub const MAX_SPAWN_PER_TICK: usize = 1024;

// Frame loop
/// Target frames per second.
pub const FPS: u32 = 120;
