//! ar_overlay - live webcam object detection with hover-revealed annotations.
//!
//! 1. Loads configuration (JSON file, environment, then flags)
//! 2. Builds the detector restricted to the annotated classes
//! 3. Opens the camera and a window (or runs headless)
//! 4. Runs the frame loop until 'q', Ctrl-C, end of stream or a read failure

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ar_overlay::{
    detect::StubBackend, open_camera, run, AnnotationTable, AppConfig, BackendKind, Display,
    FramePipeline, HeadlessDisplay, ObjectDetector, PointerState, RunOptions,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Webcam object detection overlay with hover-revealed annotations"
)]
struct Args {
    /// Camera device node, or stub://name for a synthetic source.
    #[arg(long)]
    device: Option<String>,

    /// Detector backend (stub|tract).
    #[arg(long)]
    backend: Option<String>,

    /// ONNX model path for the tract backend.
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON annotation table (defaults to the built-in table).
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Minimum confidence for a box to be drawn, exclusive.
    #[arg(long)]
    confidence: Option<f32>,

    /// Run without a window; stop with Ctrl-C.
    #[arg(long)]
    headless: bool,

    /// Do not mirror frames.
    #[arg(long)]
    no_mirror: bool,

    /// Stop after this many frames.
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,

    /// Fixed pointer position as X,Y (useful headless).
    #[arg(long, value_name = "X,Y", value_parser = parse_pointer)]
    pointer: Option<(i32, i32)>,

    /// UI mode for stderr progress.
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto, value_name = "MODE")]
    ui: ui::UiMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::new(args.ui, std::io::stderr().is_terminal());

    let cfg = {
        let _stage = ui.stage("Loading configuration");
        let mut cfg = AppConfig::load()?;
        apply_args(&mut cfg, &args)?;
        cfg.validate()?;
        cfg
    };

    let table = match &cfg.overlay.annotations_path {
        Some(path) => AnnotationTable::load(path)?,
        None => AnnotationTable::default(),
    };
    log::info!("annotation table: {} classes", table.len());

    let mut pipeline = {
        let _stage = ui.stage("Loading detector");
        let detector = build_detector(&cfg)?;
        let mut pipeline = FramePipeline::new(detector, table)
            .with_threshold(cfg.overlay.confidence_threshold)
            .with_mirror(cfg.mirror);
        pipeline.warm_up()?;
        pipeline
    };

    let mut camera = cfg.camera.clone();
    camera.frame_limit = args.max_frames;
    let mut source = {
        let _stage = ui.stage("Opening camera");
        let mut source = open_camera(&camera)?;
        source
            .connect()
            .with_context(|| format!("could not open camera {}", camera.device))?;
        source
    };

    let pointer = Arc::new(match args.pointer {
        Some((x, y)) => PointerState::at(x, y),
        None => PointerState::new(),
    });

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = Arc::clone(&quit);
        ctrlc::set_handler(move || {
            quit.store(true, Ordering::SeqCst);
        })
        .context("failed to install Ctrl-C handler")?;
    }

    let mut display = open_display(&cfg, Arc::clone(&pointer), Arc::clone(&quit))?;
    log::info!("running; press '{}' in the window or Ctrl-C to stop", ar_overlay::display::QUIT_KEY);

    let stats = run(
        source.as_mut(),
        display.as_mut(),
        &mut pipeline,
        &pointer,
        RunOptions {
            max_frames: args.max_frames,
        },
    )?;

    println!("ar_overlay finished ({:?})", stats.end);
    println!("  frames: {}", stats.frames);
    println!("  detections: {}", stats.detections);
    println!("  boxes drawn: {}", stats.drawn);
    println!("  boxes hovered: {}", stats.hovered);
    Ok(())
}

fn apply_args(cfg: &mut AppConfig, args: &Args) -> Result<()> {
    if let Some(device) = &args.device {
        cfg.camera.device = device.clone();
    }
    if let Some(backend) = &args.backend {
        cfg.detector.backend = BackendKind::parse(backend)?;
    }
    if let Some(model) = &args.model {
        cfg.detector.model_path = model.clone();
    }
    if let Some(path) = &args.annotations {
        cfg.overlay.annotations_path = Some(path.clone());
    }
    if let Some(threshold) = args.confidence {
        cfg.overlay.confidence_threshold = threshold;
    }
    if args.headless {
        cfg.display.headless = true;
    }
    if args.no_mirror {
        cfg.mirror = false;
    }
    Ok(())
}

fn build_detector(cfg: &AppConfig) -> Result<ObjectDetector> {
    match cfg.detector.backend {
        BackendKind::Stub => {
            log::warn!("using the scripted stub detector; detections are synthetic");
            Ok(ObjectDetector::new(StubBackend::new()))
        }
        #[cfg(feature = "backend-tract")]
        BackendKind::Tract => {
            let backend = ar_overlay::detect::TractBackend::new(
                &cfg.detector.model_path,
                cfg.detector.input_size,
            )?;
            Ok(ObjectDetector::new(backend))
        }
        #[cfg(not(feature = "backend-tract"))]
        BackendKind::Tract => Err(anyhow!(
            "backend 'tract' requires the backend-tract feature (model {})",
            cfg.detector.model_path.display()
        )),
    }
}

#[cfg(feature = "display-highgui")]
fn open_display(
    cfg: &AppConfig,
    pointer: Arc<PointerState>,
    quit: Arc<AtomicBool>,
) -> Result<Box<dyn Display>> {
    if cfg.display.headless {
        return Ok(Box::new(HeadlessDisplay::new(quit)));
    }
    let window = ar_overlay::display::HighGuiDisplay::open(&cfg.display.window_name, pointer, quit)?;
    Ok(Box::new(window))
}

#[cfg(not(feature = "display-highgui"))]
fn open_display(
    cfg: &AppConfig,
    _pointer: Arc<PointerState>,
    quit: Arc<AtomicBool>,
) -> Result<Box<dyn Display>> {
    if !cfg.display.headless {
        log::warn!(
            "built without display-highgui; running headless instead of opening '{}'",
            cfg.display.window_name
        );
    }
    Ok(Box::new(HeadlessDisplay::new(quit)))
}

fn parse_pointer(raw: &str) -> Result<(i32, i32)> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y, got '{}'", raw))?;
    let x = x.trim().parse().map_err(|_| anyhow!("invalid pointer x '{}'", x))?;
    let y = y.trim().parse().map_err(|_| anyhow!("invalid pointer y '{}'", y))?;
    Ok((x, y))
}
