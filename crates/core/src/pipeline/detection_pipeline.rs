use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::detection::domain::detection_options::DetectionOptions;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::throttle_gate::ThrottleGate;
use crate::pipeline::handoff::HandoffPublisher;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::shared::error::OverlayError;
use crate::shared::face::{DetectedFace, FaceSet, RawFace};
use crate::shared::frame::Frame;

/// What to do when a sampled frame yields no faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyResultPolicy {
    /// Publish the empty set so stale boxes clear on the next redraw.
    #[default]
    Publish,
    /// Keep the last non-empty set visible until faces are found again.
    Suppress,
}

/// Counters for one capture session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames_seen: u64,
    pub frames_sampled: u64,
    pub detector_failures: u64,
    pub faces_dropped: u64,
    pub published: u64,
}

/// Per-frame hot path, run on the capture thread.
///
/// Throttles, invokes the detector, validates its output and publishes the
/// result through the handoff. Nothing escapes `process`: detector errors and
/// panics are logged and the frame is treated as having no detection.
pub struct DetectionPipeline {
    detector: Box<dyn FaceDetector>,
    options: DetectionOptions,
    gate: ThrottleGate,
    publisher: HandoffPublisher,
    active: Arc<AtomicBool>,
    was_active: bool,
    empty_results: EmptyResultPolicy,
    logger: Box<dyn PipelineLogger>,
    sequence: u64,
    stats: CaptureStats,
}

impl DetectionPipeline {
    /// `active` is the controller's run flag; frames arriving while it is
    /// cleared are ignored without touching the gate or the detector.
    pub fn new(
        detector: Box<dyn FaceDetector>,
        options: DetectionOptions,
        gate: ThrottleGate,
        publisher: HandoffPublisher,
        active: Arc<AtomicBool>,
    ) -> Self {
        Self {
            detector,
            options,
            gate,
            publisher,
            active,
            was_active: false,
            empty_results: EmptyResultPolicy::default(),
            logger: Box::new(NullPipelineLogger),
            sequence: 0,
            stats: CaptureStats::default(),
        }
    }

    pub fn with_empty_results(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_results = policy;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    /// Handles one delivered frame. Returns the published set, if any.
    pub fn process(&mut self, frame: &Frame) -> Option<Arc<FaceSet>> {
        self.stats.frames_seen += 1;

        // Epoch before run flag: leaving `Active` clears the flag before
        // bumping the epoch, so a post-clear epoch is never paired with a
        // set flag. A clear later in the cycle makes this set stale.
        let epoch = self.publisher.epoch();

        let active = self.active.load(Ordering::Acquire);
        if !active {
            if self.was_active {
                self.logger.info("Detection paused");
            }
            self.was_active = false;
            return None;
        }
        if !self.was_active {
            self.gate.reset();
            self.was_active = true;
            self.logger.info("Detection active");
        }

        let sampled = self.gate.should_sample(frame);
        self.logger.frame(sampled);
        if !sampled {
            log::trace!("Skipping frame ts={}", frame.timestamp());
            return None;
        }
        self.stats.frames_sampled += 1;

        let started = Instant::now();
        let raw = match self.invoke_detector(frame) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("{e} (frame ts={})", frame.timestamp());
                self.stats.detector_failures += 1;
                self.logger.metric("detector_failures", 1.0);
                return None;
            }
        };
        self.logger
            .timing("detect", started.elapsed().as_secs_f64() * 1000.0);

        let faces = self.normalize(raw);
        self.logger.metric("faces", faces.len() as f64);

        if faces.is_empty() && self.empty_results == EmptyResultPolicy::Suppress {
            log::trace!("No faces at ts={}, keeping previous overlay", frame.timestamp());
            return None;
        }

        self.sequence += 1;
        let set = Arc::new(FaceSet {
            faces,
            timestamp: frame.timestamp(),
            frame_width: frame.width(),
            frame_height: frame.height(),
            epoch,
            sequence: self.sequence,
        });
        log::debug!(
            "Publishing {} face(s) for ts={} (seq {})",
            set.len(),
            set.timestamp,
            set.sequence
        );
        if !self.publisher.publish(Arc::clone(&set)) {
            return None;
        }
        self.stats.published += 1;
        Some(set)
    }

    /// Ends the session: logs the summary and returns the counters.
    pub fn finish(self) -> CaptureStats {
        self.logger.summary();
        self.stats
    }

    fn invoke_detector(&mut self, frame: &Frame) -> Result<Vec<RawFace>, OverlayError> {
        let detector = &mut self.detector;
        let options = &self.options;
        match panic::catch_unwind(AssertUnwindSafe(|| detector.detect(frame, options))) {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) => Err(OverlayError::DetectorInvocation(e.to_string())),
            Err(_) => Err(OverlayError::DetectorInvocation(
                "detector panicked".to_string(),
            )),
        }
    }

    fn normalize(&mut self, raw: Vec<RawFace>) -> Vec<DetectedFace> {
        let mut faces = Vec::with_capacity(raw.len());
        for r in raw {
            match DetectedFace::try_from_raw(r) {
                Ok(face) => faces.push(face),
                Err(e) => {
                    log::debug!("Dropping face: {e}");
                    self.stats.faces_dropped += 1;
                }
            }
        }
        faces
    }
}
