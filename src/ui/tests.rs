use super::canvas::translate_events;
use super::*;
use crate::diagrams::{build_diagram, DiagramKind};
use crate::export::{ExportOptions, FrameExporter};
use crate::scene::FlowOptions;
use crate::types::BlockId;

/// Run a single headless egui frame that draws the app's canvas.
fn run_canvas_frame(ctx: &egui::Context, app: &mut FlowApp, events: Vec<egui::Event>) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1000.0, 720.0),
    ));
    raw.events = events;

    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                app.draw_canvas(ui).unwrap();
            });
    })
}

fn press(pos: egui::Pos2, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::default(),
    }
}

fn offsets_app() -> FlowApp {
    let scene = build_diagram(
        DiagramKind::Offsets,
        FlowOptions {
            seed: Some(11),
            ..FlowOptions::default()
        },
    )
    .unwrap();
    FlowApp::new(scene, None, 120)
}

#[test]
fn translate_events_is_relative_to_canvas() {
    let origin = egui::pos2(20.0, 30.0);
    let events = vec![
        egui::Event::PointerMoved(egui::pos2(120.0, 130.0)),
        press(egui::pos2(25.0, 35.0), true),
        press(egui::pos2(25.0, 35.0), false),
    ];
    assert_eq!(
        translate_events(&events, origin),
        vec![
            InputEvent::PointerMove(egui::pos2(100.0, 100.0)),
            InputEvent::PointerDown(egui::pos2(5.0, 5.0)),
            InputEvent::PointerUp,
        ]
    );
}

#[test]
fn translate_events_ignores_other_buttons_and_keys() {
    let events = vec![
        egui::Event::PointerButton {
            pos: egui::pos2(1.0, 1.0),
            button: egui::PointerButton::Secondary,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        },
        egui::Event::Text("x".into()),
        egui::Event::PointerGone,
    ];
    assert!(translate_events(&events, egui::Pos2::ZERO).is_empty());
}

#[test]
fn dragging_block_through_egui_moves_it() {
    let mut app = offsets_app();
    let ctx = egui::Context::default();
    let start = app.scene().blocks()[0].position;

    // Hover, press inside Block A, then drag it 50px right.
    let grab = egui::pos2(200.0, 200.0);
    let _ = run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(grab)]);
    let _ = run_canvas_frame(&ctx, &mut app, vec![press(grab, true)]);
    assert_eq!(app.scene().dragging(), Some(BlockId(0)));

    let _ = run_canvas_frame(
        &ctx,
        &mut app,
        vec![egui::Event::PointerMoved(egui::pos2(250.0, 200.0))],
    );
    assert_eq!(app.scene().blocks()[0].position, start + egui::vec2(50.0, 0.0));
    assert_eq!(app.scene().blocks()[1].position, egui::pos2(560.0, 280.0));

    let _ = run_canvas_frame(&ctx, &mut app, vec![press(egui::pos2(250.0, 200.0), false)]);
    assert_eq!(app.scene().dragging(), None);
    assert!(app.is_running());
}

#[test]
fn canvas_frame_paints_shapes_and_advances_time() {
    let mut app = offsets_app();
    let ctx = egui::Context::default();
    let output = run_canvas_frame(&ctx, &mut app, Vec::new());
    assert!(!output.shapes.is_empty());
    assert!(app.scene().elapsed() > 0.0);
}

#[test]
fn recording_window_stops_after_frame_limit() {
    let dir = std::env::temp_dir().join(format!("neuro_flow_ui_{}", std::process::id()));
    let prefix = dir.join("win_").to_string_lossy().into_owned();
    let exporter = FrameExporter::new(&ExportOptions {
        prefix: Some(prefix.clone()),
        frame_skip: 1,
        start_index: 1,
        max_frames: 2,
    })
    .unwrap();
    let scene = build_diagram(DiagramKind::Offsets, FlowOptions::default()).unwrap();
    let mut app = FlowApp::new(scene, exporter, 120);
    let ctx = egui::Context::default();

    let _ = run_canvas_frame(&ctx, &mut app, Vec::new());
    assert!(app.is_running());
    let _ = run_canvas_frame(&ctx, &mut app, Vec::new());
    assert!(!app.is_running());

    assert!(std::path::Path::new(&format!("{prefix}000001.png")).is_file());
    assert!(std::path::Path::new(&format!("{prefix}000002.png")).is_file());
    let _ = std::fs::remove_dir_all(&dir);
}
