use std::time::{Duration, Instant};

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Blank frames with consecutive timestamps, optionally paced to a frame rate.
///
/// Drives the pipeline without camera hardware; pair it with a replaying
/// detector to script what is "seen".
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    next_timestamp: i64,
    remaining: usize,
    interval: Option<Duration>,
    next_due: Option<Instant>,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32, frame_count: usize) -> Self {
        Self {
            width,
            height,
            next_timestamp: 0,
            remaining: frame_count,
            interval: None,
            next_due: None,
        }
    }

    /// Sleeps between frames so they arrive at roughly `fps`.
    /// Rates without a representable positive interval (non-positive, NaN,
    /// or so small the interval overflows) leave the source unpaced.
    pub fn paced(mut self, fps: f64) -> Self {
        self.interval = if fps > 0.0 {
            Duration::try_from_secs_f64(1.0 / fps).ok()
        } else {
            None
        };
        self
    }

    pub fn starting_at(mut self, timestamp: i64) -> Self {
        self.next_timestamp = timestamp;
        self
    }

    fn wait_until_due(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };
        let now = Instant::now();
        let due = self.next_due.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        self.next_due = Some(due.max(now) + interval);
    }
}

impl FrameSource for SyntheticFrameSource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.wait_until_due();
        self.remaining -= 1;
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        Some(Frame::empty(self.width, self.height, ts))
    }
}
