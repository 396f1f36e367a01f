use thiserror::Error;

/// Errors surfaced by the overlay pipeline.
///
/// Only `PermissionDenied`, `DeviceUnavailable`, `InvalidTransition` and
/// `Config` ever leave the crate. Detector and geometry failures are handled
/// on the capture thread and only show up in logs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OverlayError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device available")]
    DeviceUnavailable,

    #[error("face detector failed: {0}")]
    DetectorInvocation(String),

    #[error("degenerate face bounds {width}x{height}")]
    DegenerateGeometry { width: f64, height: f64 },

    #[error("cannot {action} while {from}")]
    InvalidTransition { from: String, action: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),
}
