use clap::Parser;
use neuro_flow::{
    build_diagram_with_style, render_frames, DiagramKind, EmissionOptions, ExportOptions, FlowError,
    FlowOptions, FrameExporter, SparkMode, Style,
};
use std::path::PathBuf;

/// Animated block diagrams with curved arrows and traveling sparks.
#[derive(Parser, Debug)]
#[command(name = "neuro-flow", version, about)]
struct Cli {
    /// Diagram to show
    #[arg(value_enum, default_value_t = DiagramKind::NeuroFlow)]
    diagram: DiagramKind,

    /// Save frames as PREFIX000001.png, PREFIX000002.png, ...
    #[arg(short = 'o', long)]
    save_prefix: Option<String>,

    /// Save every N-th frame
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    frame_skip: u32,

    /// Number of the first saved frame
    #[arg(long, default_value_t = 1)]
    start_index: u32,

    /// Stop after saving this many frames (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_frames: u32,

    /// Spawn sparks at random instead of looping a fixed set
    #[arg(long)]
    random_spark_starts: bool,

    /// Multiplier for the emission rate with --random-spark-starts
    #[arg(long, default_value_t = 1.0, value_parser = parse_emit_mult)]
    emit_mult: f64,

    /// Cap on concurrent sparks per connection with --random-spark-starts (0 = no cap)
    #[arg(long, default_value_t = 0)]
    max_live_sparks: usize,

    /// Seed for spark emission; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON style file
    #[arg(long)]
    style: Option<PathBuf>,

    /// Render frames without opening a window (needs --save-prefix and --max-frames)
    #[arg(long, requires = "save_prefix")]
    headless: bool,

    /// Show the dragged block's position
    #[arg(long)]
    debug: bool,

    /// Frames per second
    #[arg(long, default_value_t = neuro_flow::constants::FPS)]
    fps: u32,
}

fn parse_emit_mult(value: &str) -> Result<f64, String> {
    let mult: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if mult.is_finite() && mult >= 0.0 {
        Ok(mult)
    } else {
        Err(format!("expected a finite number >= 0, got {value}"))
    }
}

impl Cli {
    fn flow_options(&self) -> FlowOptions {
        let spark_mode = if self.random_spark_starts {
            SparkMode::Emission(EmissionOptions {
                emit_mult: self.emit_mult,
                max_live: self.max_live_sparks,
            })
        } else {
            SparkMode::FixedPhase
        };
        FlowOptions {
            spark_mode,
            seed: self.seed,
            debug: self.debug,
        }
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            prefix: self.save_prefix.clone(),
            frame_skip: self.frame_skip,
            start_index: self.start_index,
            max_frames: self.max_frames,
        }
    }
}

fn main() -> Result<(), FlowError> {
    // Set up logging
    env_logger::init();

    let cli = Cli::parse();
    let style = cli.style.as_ref().map(Style::load).transpose()?;
    let mut scene = build_diagram_with_style(cli.diagram, cli.flow_options(), style)?;
    let export = cli.export_options();

    if cli.headless {
        if cli.max_frames == 0 {
            return Err(FlowError::export(
                cli.save_prefix.unwrap_or_default(),
                "--headless needs --max-frames greater than 0",
            ));
        }
        let Some(mut exporter) = FrameExporter::new(&export)? else {
            return Ok(());
        };
        let saved = render_frames(&mut scene, &mut exporter, cli.fps)?;
        log::info!("Wrote {saved} frames");
        return Ok(());
    }

    neuro_flow::run_app(scene, &export, cli.fps)
}
