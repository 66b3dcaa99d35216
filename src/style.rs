//! Visual configuration passed explicitly to every drawing routine.
//!
//! A [`Style`] can be built in code or loaded from JSON; any field missing from
//! the JSON keeps its default, so a style file only needs the values it
//! changes:
//!
//! ```json
//! { "background": [0, 0, 0, 255], "curve": { "push_max": 320.0 } }
//! ```

use crate::arrowhead::ArrowHeadStyle;
use crate::constants;
use crate::curve::CurveStyle;
use crate::error::{FlowError, FlowResult};
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Colors and sizes for one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Canvas background
    pub background: Color32,
    /// Grid line color
    pub grid_color: Color32,
    /// Spacing between grid lines; 0 disables the grid, gaps under 1px draw at 1px
    pub grid_gap: f32,
    /// Block fill, alpha replaced by the block opacity
    pub block_fill: Color32,
    /// Block border, alpha replaced by the block opacity
    pub block_border: Color32,
    /// Rounded corner radius of blocks
    pub block_corner_radius: f32,
    /// Border width of blocks
    pub block_border_width: f32,
    /// Label color (always opaque)
    pub text_color: Color32,
    /// Label font size
    pub text_size: f32,
    /// Default connection color
    pub arrow_color: Color32,
    /// Color of the wider pass drawn under each curve
    pub shadow_color: Color32,
    /// How much wider the shadow pass is than the stroke
    pub shadow_extra_width: f32,
    /// Control point placement
    pub curve: CurveStyle,
    /// Arrowhead geometry
    pub arrow_head: ArrowHeadStyle,
    /// Per-channel increase used for default spark colors
    pub spark_brighten: u8,
    /// HUD caption color
    pub hud_color: Color32,
    /// Debug overlay color
    pub debug_color: Color32,
    /// Named colors connections can refer to
    pub palette: BTreeMap<String, Color32>,
}

impl Default for Style {
    fn default() -> Self {
        let palette = [
            ("motor", Color32::from_rgb(171, 71, 188)),
            ("motor2", Color32::from_rgb(186, 104, 200)),
            ("sens1", Color32::from_rgb(77, 182, 172)),
            ("sens2", Color32::from_rgb(3, 169, 244)),
            ("cereb", Color32::from_rgb(240, 98, 146)),
            ("basal", Color32::from_rgb(245, 127, 23)),
            ("thal", Color32::from_rgb(1, 87, 155)),
            ("olf", Color32::from_rgb(56, 142, 60)),
            ("arrow", rgb(constants::ARROW_COLOR)),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        Self {
            background: rgb(constants::BACKGROUND),
            grid_color: rgb(constants::GRID),
            grid_gap: constants::GRID_GAP,
            block_fill: rgb(constants::BLOCK_FILL),
            block_border: rgb(constants::BLOCK_BORDER),
            block_corner_radius: constants::BLOCK_CORNER_RADIUS,
            block_border_width: constants::BLOCK_BORDER_WIDTH,
            text_color: rgb(constants::TEXT_COLOR),
            text_size: constants::TEXT_SIZE,
            arrow_color: rgb(constants::ARROW_COLOR),
            shadow_color: Color32::BLACK,
            shadow_extra_width: constants::SHADOW_EXTRA_WIDTH,
            curve: CurveStyle::default(),
            arrow_head: ArrowHeadStyle::default(),
            spark_brighten: constants::SPARK_BRIGHTEN,
            hud_color: rgb(constants::HUD_COLOR),
            debug_color: rgb(constants::DEBUG_COLOR),
            palette,
        }
    }
}

impl Style {
    /// Parses a style from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// [`FlowError::Style`] if the text is not a valid style document.
    pub fn from_json(json: &str) -> FlowResult<Self> {
        serde_json::from_str(json).map_err(|e| FlowError::Style(e.to_string()))
    }

    /// Reads and parses a JSON style file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the JSON document
    ///
    /// # Errors
    ///
    /// [`FlowError::Io`] if the file cannot be read, [`FlowError::Style`] if
    /// it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let style = Self::from_json(&json)?;
        log::info!("Loaded style from {}", path.display());
        Ok(style)
    }

    /// Serializes the style as pretty-printed JSON.
    pub fn to_json(&self) -> FlowResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FlowError::Style(e.to_string()))
    }

    /// Looks up a palette color by name.
    pub fn resolve_color(&self, name: &str) -> FlowResult<Color32> {
        self.palette
            .get(name)
            .copied()
            .ok_or_else(|| FlowError::UnknownColor(name.to_string()))
    }

    /// Default spark color for a connection stroked in `color`.
    pub fn spark_color_for(&self, color: Color32) -> Color32 {
        brighten(color, self.spark_brighten)
    }
}

/// Adds `delta` to each RGB channel, saturating at 255. Alpha is kept.
pub fn brighten(color: Color32, delta: u8) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(
        r.saturating_add(delta),
        g.saturating_add(delta),
        b.saturating_add(delta),
        a,
    )
}

/// Same color with its alpha replaced.
pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}
