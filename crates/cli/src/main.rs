use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;

use face_overlay_core::capture::infrastructure::synthetic_frame_source::SyntheticFrameSource;
use face_overlay_core::config::OverlayConfig;
use face_overlay_core::detection::domain::face_detector::FaceDetector;
use face_overlay_core::detection::domain::throttle_gate::{ThrottleGate, ThrottlePolicy};
use face_overlay_core::detection::infrastructure::cached_face_detector::CachedFaceDetector;
use face_overlay_core::overlay::infrastructure::log_surface::LogSurface;
use face_overlay_core::overlay::overlay_view::OverlayView;
use face_overlay_core::pipeline::detection_pipeline::{DetectionPipeline, EmptyResultPolicy};
use face_overlay_core::pipeline::handoff;
use face_overlay_core::pipeline::infrastructure::capture_thread::spawn_capture;
use face_overlay_core::pipeline::pipeline_controller::{PermissionStatus, PipelineController};
use face_overlay_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use face_overlay_core::shared::bounds::Point;
use face_overlay_core::shared::face::RawFace;

/// Live face overlay over a synthetic camera feed.
#[derive(Parser)]
#[command(name = "face-overlay")]
struct Cli {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded detector output: a JSON object mapping frame timestamps to
    /// face lists. Without it a scripted face drifts across the frame.
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Number of frames the synthetic camera delivers.
    #[arg(long, default_value = "300")]
    frames: usize,

    /// Camera frame rate.
    #[arg(long, default_value = "30")]
    fps: f64,

    /// Camera frame width in pixels.
    #[arg(long, default_value = "640")]
    width: u32,

    /// Camera frame height in pixels.
    #[arg(long, default_value = "480")]
    height: u32,

    /// Sample frames whose timestamp is a multiple of N (overrides config).
    #[arg(long)]
    throttle_rate: Option<i64>,

    /// Box padding as a fraction of the face size (overrides config).
    #[arg(long)]
    padding: Option<f64>,

    /// Keep the previous boxes when a sampled frame has no faces.
    #[arg(long)]
    suppress_empty: bool,

    /// Draw boxes only, no landmark markers.
    #[arg(long)]
    no_markers: bool,

    /// Overlay redraw rate.
    #[arg(long, default_value = "10")]
    ui_hz: f64,

    /// Pause the camera after this many seconds.
    #[arg(long)]
    pause_after: Option<f64>,

    /// How long a pause lasts, in seconds.
    #[arg(long, default_value = "1.0")]
    pause_for: f64,

    /// Stop the camera after this many seconds even if frames remain.
    #[arg(long)]
    max_seconds: Option<f64>,

    /// Simulate the user refusing camera access.
    #[arg(long)]
    deny_permission: bool,

    /// Simulate a device without a usable camera.
    #[arg(long)]
    no_device: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let config = load_config(&cli)?;
    let detector = build_detector(&cli)?;

    let (publisher, consumer) = handoff::channel();
    let mut controller = PipelineController::new(publisher.reset_handle());
    controller.request_permission()?;
    let permission = if cli.deny_permission {
        PermissionStatus::Denied
    } else {
        PermissionStatus::Granted
    };
    controller.start(permission, !cli.no_device)?;

    let pipeline = DetectionPipeline::new(
        detector,
        config.detection.clone(),
        ThrottleGate::new(config.throttle),
        publisher,
        controller.active_flag(),
    )
    .with_empty_results(config.empty_results)
    .with_logger(Box::new(StdoutPipelineLogger::default()));

    let source = SyntheticFrameSource::new(cli.width, cli.height, cli.frames).paced(cli.fps);
    let stop = Arc::new(AtomicBool::new(false));
    let capture = spawn_capture(Box::new(source), pipeline, Arc::clone(&stop))?;

    let mut view = OverlayView::new(consumer, config.projector());
    let mut surface = LogSurface::default();
    let ticker = crossbeam_channel::tick(rate_interval(cli.ui_hz, "UI rate")?);
    let started = Instant::now();
    let mut paused_at: Option<Instant> = None;
    let mut paused_once = false;

    while !capture.is_finished() {
        ticker.recv()?;

        if cli
            .max_seconds
            .is_some_and(|limit| started.elapsed().as_secs_f64() >= limit)
        {
            log::info!("Time limit reached, stopping capture");
            stop.store(true, Ordering::Relaxed);
            break;
        }

        if let Some(after) = cli.pause_after {
            if !paused_once && started.elapsed().as_secs_f64() >= after {
                controller.pause()?;
                paused_at = Some(Instant::now());
                paused_once = true;
            }
        }
        if let Some(at) = paused_at {
            if at.elapsed().as_secs_f64() >= cli.pause_for {
                controller.resume()?;
                paused_at = None;
            }
        }

        if view.refresh() {
            log::info!("{}", view.overlay_text().join(" | "));
        }
        view.render(&mut surface);
    }

    let stats = capture.join().map_err(|_| "capture thread panicked")?;
    controller.tear_down();
    view.render(&mut surface);

    eprintln!(
        "Done: {} frames, {} sampled, {} published, {} detector failures, {} faces dropped",
        stats.frames_seen,
        stats.frames_sampled,
        stats.published,
        stats.detector_failures,
        stats.faces_dropped
    );
    eprintln!(
        "Overlay: {} redraws, {} draw commands, final \"{}\"",
        surface.frames(),
        surface.drawn(),
        view.overlay_text().join(" | ")
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<OverlayConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => OverlayConfig::load(path)?,
        None => OverlayConfig::default(),
    };
    if let Some(rate) = cli.throttle_rate {
        config.throttle = ThrottlePolicy::Timestamp { rate };
    }
    if let Some(padding) = cli.padding {
        config.padding = padding;
    }
    if cli.suppress_empty {
        config.empty_results = EmptyResultPolicy::Suppress;
    }
    if cli.no_markers {
        config.landmark_markers = false;
    }
    config.validate()?;
    Ok(config)
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    match &cli.detections {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read detections {}: {e}", path.display()))?;
            let detector = CachedFaceDetector::from_json(&json)?;
            log::info!("Replaying detections from {}", path.display());
            Ok(Box::new(detector))
        }
        None => Ok(Box::new(CachedFaceDetector::new(Arc::new(scripted_faces(
            cli.width,
            cli.height,
            cli.frames,
        ))))),
    }
}

/// One face sweeping left to right, plus a second one during the middle
/// third of the run.
fn scripted_faces(width: u32, height: u32, frames: usize) -> HashMap<i64, Vec<RawFace>> {
    let (w, h) = (width as f64, height as f64);
    let size = w.min(h) * 0.3;
    let travel = (w - size).max(1.0);
    let third = frames / 3;

    (0..frames)
        .map(|i| {
            let progress = i as f64 / frames.max(1) as f64;
            let x = travel * progress;
            let y = (h - size) / 2.0;
            let mut faces = vec![RawFace {
                landmarks: Some(vec![
                    Point::new(x + size * 0.3, y + size * 0.4),
                    Point::new(x + size * 0.7, y + size * 0.4),
                    Point::new(x + size * 0.5, y + size * 0.6),
                    Point::new(x + size * 0.5, y + size * 0.8),
                ]),
                tracking_id: Some(1),
                ..RawFace::with_bounds(x, y, size, size)
            }];
            if (third..2 * third).contains(&i) {
                faces.push(RawFace {
                    tracking_id: Some(2),
                    ..RawFace::with_bounds(travel - x, h * 0.1, size * 0.6, size * 0.6)
                });
            }
            (i as i64, faces)
        })
        .collect()
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.width == 0 || cli.height == 0 {
        return Err(format!(
            "Frame size must be positive, got {}x{}",
            cli.width, cli.height
        )
        .into());
    }
    rate_interval(cli.fps, "Frame rate")?;
    rate_interval(cli.ui_hz, "UI rate")?;
    if !(cli.pause_for.is_finite() && cli.pause_for >= 0.0) {
        return Err(format!("Pause length must be non-negative, got {}", cli.pause_for).into());
    }
    if cli.pause_after.is_some_and(|s| !s.is_finite() || s < 0.0) {
        return Err("--pause-after must be a non-negative number of seconds".into());
    }
    if cli.max_seconds.is_some_and(|s| !s.is_finite() || s <= 0.0) {
        return Err("--max-seconds must be a positive number of seconds".into());
    }
    Ok(())
}

/// Period of a positive rate in Hz.
fn rate_interval(rate: f64, name: &str) -> Result<Duration, String> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(format!("{name} must be positive, got {rate}"));
    }
    Duration::try_from_secs_f64(1.0 / rate).map_err(|_| format!("{name} {rate} is too small"))
}
