use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_THROTTLE_RATE;
use crate::shared::frame::Frame;

/// How often the detector may run.
///
/// A non-positive rate means "sample every frame" rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThrottlePolicy {
    /// Sample frames whose capture timestamp is a multiple of `rate`.
    Timestamp { rate: i64 },
    /// Sample the first frame and then every `every`th frame after it.
    FrameCount { every: i64 },
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        ThrottlePolicy::Timestamp {
            rate: DEFAULT_THROTTLE_RATE,
        }
    }
}

/// Decides per frame whether detection runs.
///
/// The frame counter used by [`ThrottlePolicy::FrameCount`] lives here and
/// nowhere else; [`ThrottleGate::reset`] restarts it.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    policy: ThrottlePolicy,
    frames_seen: u64,
}

impl ThrottleGate {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            policy,
            frames_seen: 0,
        }
    }

    pub fn policy(&self) -> ThrottlePolicy {
        self.policy
    }

    pub fn should_sample(&mut self, frame: &Frame) -> bool {
        match self.policy {
            ThrottlePolicy::Timestamp { rate } => {
                rate <= 0 || frame.timestamp().rem_euclid(rate) == 0
            }
            ThrottlePolicy::FrameCount { every } => {
                let index = self.frames_seen;
                self.frames_seen = self.frames_seen.wrapping_add(1);
                every <= 0 || index % every as u64 == 0
            }
        }
    }

    pub fn reset(&mut self) {
        self.frames_seen = 0;
    }
}

impl Default for ThrottleGate {
    fn default() -> Self {
        Self::new(ThrottlePolicy::default())
    }
}
