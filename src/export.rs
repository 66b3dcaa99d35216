//! Frame export to numbered PNG files.
//!
//! Frames are drawn into an [`SvgFrame`], then rasterized with usvg/resvg onto
//! a tiny-skia pixmap and written as `{prefix}{index:06}.png`.

use crate::error::{FlowError, FlowResult};
use crate::scene::Scene;
use crate::surface::{RenderSurface, TextAlign};
use egui::{Color32, Pos2, Rect, Vec2};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.25;

/// A frame recorded as SVG markup.
#[derive(Debug, Clone)]
pub struct SvgFrame {
    size: Vec2,
    body: String,
}

impl SvgFrame {
    /// Empty frame of the given pixel size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: egui::vec2(width, height),
            body: String::new(),
        }
    }

    /// The complete SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.size.x,
            h = self.size.y
        );
        out.push_str(&self.body);
        let _ = writeln!(out, "</svg>");
        out
    }

    /// Width and height in whole pixels, at least 1.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.size.x.round().max(1.0) as u32,
            self.size.y.round().max(1.0) as u32,
        )
    }
}

/// `fill="rgb(..)" fill-opacity=".."` style attribute pair.
fn paint(attr: &str, color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("{attr}=\"rgb({r},{g},{b})\"")
    } else {
        format!(
            "{attr}=\"rgb({r},{g},{b})\" {attr}-opacity=\"{:.3}\"",
            a as f32 / 255.0
        )
    }
}

fn points_attr(points: &[Pos2]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

impl RenderSurface for SvgFrame {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color32) {
        self.body.clear();
        let _ = writeln!(
            self.body,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" {} />",
            self.size.x,
            self.size.y,
            paint("fill", color)
        );
    }

    fn line(&mut self, a: Pos2, b: Pos2, width: f32, color: Color32) {
        let _ = writeln!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" {} stroke-width=\"{}\" />",
            a.x,
            a.y,
            b.x,
            b.y,
            paint("stroke", color),
            width
        );
    }

    fn polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        if points.len() < 2 {
            return;
        }
        let _ = writeln!(
            self.body,
            "<polyline points=\"{}\" fill=\"none\" {} stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" />",
            points_attr(points),
            paint("stroke", color),
            width
        );
    }

    fn polygon(&mut self, points: &[Pos2], color: Color32) {
        let _ = writeln!(
            self.body,
            "<polygon points=\"{}\" {} />",
            points_attr(points),
            paint("fill", color)
        );
    }

    fn filled_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        let _ = writeln!(
            self.body,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" {} />",
            center.x,
            center.y,
            radius,
            paint("fill", color)
        );
    }

    fn rect(&mut self, rect: Rect, corner_radius: f32, fill: Color32, stroke: Option<(f32, Color32)>) {
        let stroke_attr = match stroke {
            Some((width, color)) => format!("{} stroke-width=\"{}\"", paint("stroke", color), width),
            None => String::new(),
        };
        let _ = writeln!(
            self.body,
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{r}\" ry=\"{r}\" {} {} />",
            rect.min.x,
            rect.min.y,
            rect.width(),
            rect.height(),
            paint("fill", fill),
            stroke_attr,
            r = corner_radius
        );
    }

    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32, align: TextAlign) {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return;
        }
        let line_height = size * LINE_SPACING;
        let anchor = match align {
            TextAlign::Center => "middle",
            TextAlign::TopLeft => "start",
            TextAlign::TopRight => "end",
        };
        // Baseline of the first line
        let first = match align {
            TextAlign::Center => {
                pos.y - line_height * (lines.len() - 1) as f32 / 2.0 + size * 0.35
            }
            TextAlign::TopLeft | TextAlign::TopRight => pos.y + size * 0.8,
        };
        let _ = writeln!(
            self.body,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"{}\" {} text-anchor=\"{}\">",
            pos.x,
            first,
            size,
            paint("fill", color),
            anchor
        );
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { line_height };
            let _ = writeln!(
                self.body,
                "  <tspan x=\"{:.1}\" dy=\"{:.1}\">{}</tspan>",
                pos.x,
                dy,
                escape_xml(line)
            );
        }
        let _ = writeln!(self.body, "</text>");
    }
}

/// Turns [`SvgFrame`]s into PNG files.
///
/// System fonts are loaded once, on construction.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer").finish_non_exhaustive()
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    /// Loads the system font database.
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} font faces for frame export", db.len());
        options.fontdb = Arc::new(db);
        Self { options }
    }

    /// Renders `frame` into a pixmap of its own size.
    pub fn rasterize(&self, frame: &SvgFrame) -> FlowResult<tiny_skia::Pixmap> {
        let svg = frame.to_svg();
        let tree = usvg::Tree::from_data(svg.as_bytes(), &self.options)
            .map_err(|e| FlowError::Render(format!("invalid frame SVG: {e}")))?;
        let (w, h) = frame.pixel_size();
        let mut pixmap = tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| FlowError::Render(format!("cannot allocate a {w}x{h} pixmap")))?;
        let mut pmut = pixmap.as_mut();
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pmut);
        Ok(pixmap)
    }

    /// Rasterizes `frame` and writes it to `path` as PNG.
    pub fn save_png(&self, frame: &SvgFrame, path: &Path) -> FlowResult<()> {
        let pixmap = self
            .rasterize(frame)
            .map_err(|e| FlowError::export(path, e))?;
        pixmap
            .save_png(path)
            .map_err(|e| FlowError::export(path, e))
    }
}

/// Where and how often frames are saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Path prefix; no frames are saved when `None`
    pub prefix: Option<String>,
    /// Save every N-th presented frame
    pub frame_skip: u32,
    /// Number of the first saved file
    pub start_index: u32,
    /// Stop after this many saved frames; 0 means unlimited
    pub max_frames: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            frame_skip: 1,
            start_index: 1,
            max_frames: 0,
        }
    }
}

impl ExportOptions {
    /// True when a prefix is set.
    pub fn enabled(&self) -> bool {
        self.prefix.is_some()
    }
}

/// Counts presented frames and writes the ones that are due.
#[derive(Debug)]
pub struct FrameExporter {
    prefix: String,
    frame_skip: u32,
    max_frames: u32,
    presented: u64,
    next_index: u64,
    saved: u32,
    rasterizer: Rasterizer,
}

impl FrameExporter {
    /// Returns `None` when `options` has no prefix.
    ///
    /// Creates the prefix's parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// [`FlowError::Io`] if the output directory cannot be created.
    pub fn new(options: &ExportOptions) -> FlowResult<Option<Self>> {
        let Some(prefix) = options.prefix.clone() else {
            return Ok(None);
        };
        if let Some(dir) = Path::new(&prefix).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        log::info!(
            "Saving every {} frame(s) to {prefix}NNNNNN.png",
            options.frame_skip.max(1)
        );
        Ok(Some(Self {
            prefix,
            frame_skip: options.frame_skip.max(1),
            max_frames: options.max_frames,
            presented: 0,
            next_index: u64::from(options.start_index),
            saved: 0,
            rasterizer: Rasterizer::new(),
        }))
    }

    /// Counts one presented frame and reports whether it must be saved.
    pub fn capture_due(&mut self) -> bool {
        if self.finished() {
            return false;
        }
        self.presented += 1;
        self.presented % u64::from(self.frame_skip) == 0
    }

    /// File the next saved frame goes to.
    pub fn next_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{:06}.png", self.prefix, self.next_index))
    }

    /// Writes `frame` to [`FrameExporter::next_path`] and advances the index.
    pub fn save(&mut self, frame: &SvgFrame) -> FlowResult<PathBuf> {
        let path = self.next_path();
        self.rasterizer.save_png(frame, &path)?;
        log::debug!("Saved frame {}", path.display());
        self.next_index += 1;
        self.saved += 1;
        if self.finished() {
            log::info!("Saved {} frames, stopping", self.saved);
        }
        Ok(path)
    }

    /// Frames written so far.
    pub fn saved(&self) -> u32 {
        self.saved
    }

    /// True once `max_frames` frames were written.
    pub fn finished(&self) -> bool {
        self.max_frames > 0 && self.saved >= self.max_frames
    }
}

/// Renders `scene` without a window at a fixed `1 / fps` time step until the
/// exporter has written all its frames.
///
/// # Errors
///
/// [`FlowError::Export`] if a frame cannot be written, or any error raised
/// while rendering.
pub fn render_frames(scene: &mut Scene, exporter: &mut FrameExporter, fps: u32) -> FlowResult<u32> {
    if exporter.max_frames == 0 {
        return Err(FlowError::export(
            exporter.next_path(),
            "headless export needs a frame limit",
        ));
    }
    let dt = 1.0 / f64::from(fps.max(1));
    let size = scene.size();
    while !exporter.finished() {
        let mut frame = SvgFrame::new(size.x, size.y);
        scene.render_frame(&mut frame, dt)?;
        if exporter.capture_due() {
            exporter.save(&frame)?;
        }
    }
    Ok(exporter.saved())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagrams::{build_diagram, DiagramKind};
    use crate::scene::FlowOptions;
    use egui::pos2;

    fn temp_prefix(name: &str) -> (PathBuf, String) {
        let dir = std::env::temp_dir().join(format!("neuro_flow_{name}_{}", std::process::id()));
        let prefix = dir.join("frame_").to_string_lossy().into_owned();
        (dir, prefix)
    }

    #[test]
    fn svg_contains_drawn_elements() {
        let mut frame = SvgFrame::new(100.0, 50.0);
        frame.clear(Color32::from_rgb(22, 26, 30));
        frame.polyline(&[pos2(0.0, 0.0), pos2(10.0, 10.0)], 3.0, Color32::WHITE);
        frame.filled_circle(pos2(5.0, 5.0), 4.0, Color32::RED);
        frame.text(pos2(50.0, 25.0), "a & b\nc", 18.0, Color32::WHITE, TextAlign::Center);
        let svg = frame.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("rgb(22,26,30)"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("a &amp; b"));
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn clear_discards_previous_frame() {
        let mut frame = SvgFrame::new(10.0, 10.0);
        frame.filled_circle(pos2(1.0, 1.0), 1.0, Color32::RED);
        frame.clear(Color32::BLACK);
        assert!(!frame.to_svg().contains("<circle"));
    }

    #[test]
    fn translucent_colors_get_opacity() {
        let mut frame = SvgFrame::new(10.0, 10.0);
        let fill = Color32::from_rgba_unmultiplied(43, 48, 54, 128);
        frame.rect(Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(5.0, 5.0)), 2.0, fill, None);
        let svg = frame.to_svg();
        assert!(svg.contains("fill-opacity=\"0.502\""));
    }

    #[test]
    fn rasterized_frame_has_background_color() {
        let mut frame = SvgFrame::new(8.0, 6.0);
        frame.clear(Color32::from_rgb(22, 26, 30));
        let pixmap = Rasterizer::new().rasterize(&frame).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (8, 6));
        let px = pixmap.pixel(4, 3).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (22, 26, 30, 255));
    }

    #[test]
    fn disabled_without_prefix() {
        assert!(FrameExporter::new(&ExportOptions::default()).unwrap().is_none());
    }

    #[test]
    fn frame_skip_and_numbering() {
        let (dir, prefix) = temp_prefix("skip");
        let mut exporter = FrameExporter::new(&ExportOptions {
            prefix: Some(prefix.clone()),
            frame_skip: 3,
            start_index: 7,
            max_frames: 2,
        })
        .unwrap()
        .unwrap();
        assert!(dir.is_dir());

        let due: Vec<bool> = (0..3).map(|_| exporter.capture_due()).collect();
        assert_eq!(due, [false, false, true]);
        assert_eq!(exporter.next_path(), PathBuf::from(format!("{prefix}000007.png")));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn headless_run_writes_numbered_frames() {
        let (dir, prefix) = temp_prefix("headless");
        let mut exporter = FrameExporter::new(&ExportOptions {
            prefix: Some(prefix.clone()),
            frame_skip: 2,
            start_index: 1,
            max_frames: 3,
        })
        .unwrap()
        .unwrap();
        let mut scene = build_diagram(
            DiagramKind::Offsets,
            FlowOptions {
                seed: Some(5),
                ..FlowOptions::default()
            },
        )
        .unwrap();

        let saved = render_frames(&mut scene, &mut exporter, 120).unwrap();
        assert_eq!(saved, 3);
        assert!(exporter.finished());
        assert!(!exporter.capture_due());
        for i in 1..=3 {
            assert!(PathBuf::from(format!("{prefix}{i:06}.png")).is_file());
        }
        assert!(!PathBuf::from(format!("{prefix}000004.png")).exists());
        // Six frames rendered for three saved at skip 2.
        assert!((scene.elapsed() - 6.0 / 120.0).abs() < 1e-12);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unlimited_headless_run_is_rejected() {
        let (dir, prefix) = temp_prefix("unlimited");
        let mut exporter = FrameExporter::new(&ExportOptions {
            prefix: Some(prefix),
            ..ExportOptions::default()
        })
        .unwrap()
        .unwrap();
        let mut scene = build_diagram(DiagramKind::Offsets, FlowOptions::default()).unwrap();
        assert!(matches!(
            render_frames(&mut scene, &mut exporter, 60),
            Err(FlowError::Export { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
