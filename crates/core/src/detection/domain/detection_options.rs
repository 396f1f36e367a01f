use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_MIN_FACE_SIZE;
use crate::shared::error::OverlayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    Fast,
    Accurate,
}

/// Whether an optional detector feature (classification, landmarks,
/// contours) is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMode {
    None,
    All,
}

impl FeatureMode {
    pub fn enabled(self) -> bool {
        self == FeatureMode::All
    }
}

/// Detector configuration, fixed when the pipeline is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    pub performance_mode: PerformanceMode,
    pub classification_mode: FeatureMode,
    pub landmark_mode: FeatureMode,
    pub contour_mode: FeatureMode,
    /// Smallest reported face relative to the frame's shorter side, `0..=1`.
    pub min_face_size: f64,
    pub tracking_enabled: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            performance_mode: PerformanceMode::Accurate,
            classification_mode: FeatureMode::All,
            landmark_mode: FeatureMode::All,
            contour_mode: FeatureMode::All,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            tracking_enabled: true,
        }
    }
}

impl DetectionOptions {
    pub fn validate(&self) -> Result<(), OverlayError> {
        if !(0.0..=1.0).contains(&self.min_face_size) {
            return Err(OverlayError::Config(format!(
                "min_face_size must be within 0..=1, got {}",
                self.min_face_size
            )));
        }
        Ok(())
    }
}
