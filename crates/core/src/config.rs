use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detection::domain::detection_options::DetectionOptions;
use crate::detection::domain::throttle_gate::ThrottlePolicy;
use crate::overlay::domain::overlay_projector::{OverlayProjector, OverlayStyle};
use crate::overlay::domain::screen_transform::ViewConfig;
use crate::pipeline::detection_pipeline::EmptyResultPolicy;
use crate::shared::constants::{DEFAULT_PADDING, DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
use crate::shared::error::OverlayError;

/// Session configuration. Every field has a default, so a JSON file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub throttle: ThrottlePolicy,
    pub detection: DetectionOptions,
    pub empty_results: EmptyResultPolicy,
    pub padding: f64,
    pub landmark_markers: bool,
    pub view: Option<ViewConfig>,
    pub style: OverlayStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            throttle: ThrottlePolicy::default(),
            detection: DetectionOptions::default(),
            empty_results: EmptyResultPolicy::default(),
            padding: DEFAULT_PADDING,
            landmark_markers: true,
            view: Some(ViewConfig {
                width: DEFAULT_VIEW_WIDTH,
                height: DEFAULT_VIEW_HEIGHT,
                mirror: true,
            }),
            style: OverlayStyle::default(),
        }
    }
}

impl OverlayConfig {
    pub fn load(path: &Path) -> Result<Self, OverlayError> {
        let json = fs::read_to_string(path)
            .map_err(|e| OverlayError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| OverlayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OverlayError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(OverlayError::Config(format!(
                "padding must be a non-negative number, got {}",
                self.padding
            )));
        }
        if let Some(view) = &self.view {
            if view.width == 0 || view.height == 0 {
                return Err(OverlayError::Config(format!(
                    "view size must be positive, got {}x{}",
                    view.width, view.height
                )));
            }
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.style.stroke_width) || !positive(self.style.marker_radius) {
            return Err(OverlayError::Config(
                "stroke_width and marker_radius must be positive".to_string(),
            ));
        }
        self.detection.validate()
    }

    pub fn projector(&self) -> OverlayProjector {
        OverlayProjector::new(self.padding, self.landmark_markers, self.view, self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.throttle, ThrottlePolicy::Timestamp { rate: 10 });
        assert_eq!(config.empty_results, EmptyResultPolicy::Publish);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = OverlayConfig::from_json(
            r#"{"padding": 0.4, "empty_results": "suppress", "throttle": {"kind": "timestamp", "rate": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.padding, 0.4);
        assert_eq!(config.empty_results, EmptyResultPolicy::Suppress);
        assert_eq!(config.throttle, ThrottlePolicy::Timestamp { rate: 5 });
        assert_eq!(config.detection, DetectionOptions::default());
    }

    #[test]
    fn test_null_view_disables_scaling() {
        let config = OverlayConfig::from_json(r#"{"view": null}"#).unwrap();
        assert!(config.view.is_none());
    }

    #[rstest]
    #[case::negative_padding(r#"{"padding": -0.1}"#)]
    #[case::zero_view(r#"{"view": {"width": 0, "height": 10}}"#)]
    #[case::zero_stroke(r#"{"style": {"stroke_width": 0}}"#)]
    #[case::bad_min_face(r#"{"detection": {"min_face_size": 2.0}}"#)]
    #[case::malformed("{not json")]
    fn test_invalid_config_rejected(#[case] json: &str) {
        assert!(matches!(
            OverlayConfig::from_json(json),
            Err(OverlayError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"landmark_markers": false}}"#).unwrap();

        let config = OverlayConfig::load(file.path()).unwrap();
        assert!(!config.landmark_markers);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OverlayConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, OverlayError::Config(_)));
    }

    #[test]
    fn test_projector_uses_padding() {
        let config = OverlayConfig {
            padding: 0.25,
            ..OverlayConfig::default()
        };
        assert_eq!(config.projector().padding(), 0.25);
    }
}
