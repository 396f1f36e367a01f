/// Detector runs on frames whose timestamp is a multiple of this value.
pub const DEFAULT_THROTTLE_RATE: i64 = 10;

/// Fraction by which overlay boxes grow in each dimension, recentered.
pub const DEFAULT_PADDING: f64 = 0.3;

/// Smallest face, as a fraction of the frame's shorter side, the detector reports.
pub const DEFAULT_MIN_FACE_SIZE: f64 = 0.2;

pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

pub const DEFAULT_MARKER_RADIUS: f64 = 3.0;

/// Reference view size of the portrait preview the overlay is laid out for.
pub const DEFAULT_VIEW_WIDTH: u32 = 720;
pub const DEFAULT_VIEW_HEIGHT: u32 = 1280;
