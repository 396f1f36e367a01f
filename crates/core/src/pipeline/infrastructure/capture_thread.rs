use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::capture::domain::frame_source::FrameSource;
use crate::pipeline::detection_pipeline::{CaptureStats, DetectionPipeline};

/// Runs the capture context on a dedicated thread.
///
/// Layout: `source → process → handoff`. The thread pulls frames until the
/// source ends or `stop` is set, calling [`DetectionPipeline::process`] once
/// per frame. It never waits on the UI thread; the only cross-thread state
/// is the handoff slot and the pipeline's run flag.
pub fn spawn_capture(
    mut source: Box<dyn FrameSource>,
    mut pipeline: DetectionPipeline,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<CaptureStats>> {
    std::thread::Builder::new()
        .name("capture".into())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let Some(frame) = source.next_frame() else {
                    break;
                };
                pipeline.process(&frame);
            }
            pipeline.finish()
        })
}
