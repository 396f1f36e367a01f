use serde::{Deserialize, Serialize};

use crate::shared::bounds::{Bounds, Point};
use crate::shared::error::OverlayError;

/// Face record as returned by a detector, before validation.
///
/// Bounds may be degenerate and probabilities may fall outside `[0, 1]`;
/// [`DetectedFace::try_from_raw`] is the only way into the published model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFace {
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub pitch_angle: f64,
    #[serde(default)]
    pub roll_angle: f64,
    #[serde(default)]
    pub yaw_angle: f64,
    #[serde(default)]
    pub smile_probability: Option<f64>,
    #[serde(default)]
    pub left_eye_open_probability: Option<f64>,
    #[serde(default)]
    pub right_eye_open_probability: Option<f64>,
    #[serde(default)]
    pub landmarks: Option<Vec<Point>>,
    #[serde(default)]
    pub tracking_id: Option<u32>,
}

impl RawFace {
    pub fn with_bounds(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            bounds: Some(Bounds::new(x, y, width, height)),
            ..Self::default()
        }
    }
}

/// One face found in a sampled frame. Bounds are always drawable.
///
/// Deserializes through [`RawFace`], so the same validation applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFace")]
pub struct DetectedFace {
    bounds: Bounds,
    pub pitch_angle: f64,
    pub roll_angle: f64,
    pub yaw_angle: f64,
    pub smile_probability: Option<f64>,
    pub left_eye_open_probability: Option<f64>,
    pub right_eye_open_probability: Option<f64>,
    pub landmarks: Option<Vec<Point>>,
    pub tracking_id: Option<u32>,
}

impl DetectedFace {
    /// Validates a raw detector record.
    ///
    /// Missing or degenerate bounds are rejected with
    /// [`OverlayError::DegenerateGeometry`]. Probabilities are clamped to
    /// `[0, 1]` and non-finite ones discarded; non-finite landmark points are
    /// dropped.
    pub fn try_from_raw(raw: RawFace) -> Result<Self, OverlayError> {
        let bounds = match raw.bounds {
            Some(b) if !b.is_degenerate() => b,
            Some(b) => {
                return Err(OverlayError::DegenerateGeometry {
                    width: b.width,
                    height: b.height,
                })
            }
            None => {
                return Err(OverlayError::DegenerateGeometry {
                    width: 0.0,
                    height: 0.0,
                })
            }
        };

        let landmarks = raw.landmarks.map(|points| {
            points
                .into_iter()
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .collect::<Vec<_>>()
        });

        Ok(Self {
            bounds,
            pitch_angle: finite_or_zero(raw.pitch_angle),
            roll_angle: finite_or_zero(raw.roll_angle),
            yaw_angle: finite_or_zero(raw.yaw_angle),
            smile_probability: probability(raw.smile_probability),
            left_eye_open_probability: probability(raw.left_eye_open_probability),
            right_eye_open_probability: probability(raw.right_eye_open_probability),
            landmarks: landmarks.filter(|l| !l.is_empty()),
            tracking_id: raw.tracking_id,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl TryFrom<RawFace> for DetectedFace {
    type Error = OverlayError;

    fn try_from(raw: RawFace) -> Result<Self, Self::Error> {
        Self::try_from_raw(raw)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn probability(p: Option<f64>) -> Option<f64> {
    p.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0))
}

/// All faces found in one sampled frame.
///
/// Published whole behind an `Arc`; a new set replaces the previous one and is
/// never merged with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceSet {
    pub faces: Vec<DetectedFace>,
    pub timestamp: i64,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Handoff generation this set was computed under.
    pub epoch: u64,
    /// Position among sets published by one pipeline, starting at 1.
    pub sequence: u64,
}

impl FaceSet {
    /// The "no faces" value shown after a reset.
    pub fn empty(epoch: u64) -> Self {
        Self {
            faces: Vec::new(),
            timestamp: 0,
            frame_width: 0,
            frame_height: 0,
            epoch,
            sequence: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Publication order key: later epochs win, then later sequences.
    pub fn order_key(&self) -> (u64, u64) {
        (self.epoch, self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_valid_raw_face_converts() {
        let raw = RawFace {
            pitch_angle: 1.0,
            roll_angle: -2.0,
            yaw_angle: 3.5,
            tracking_id: Some(4),
            ..RawFace::with_bounds(10.0, 20.0, 30.0, 40.0)
        };
        let face = DetectedFace::try_from_raw(raw).unwrap();
        assert_eq!(face.bounds(), Bounds::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(face.yaw_angle, 3.5);
        assert_eq!(face.tracking_id, Some(4));
    }

    #[rstest]
    #[case::zero_width(RawFace::with_bounds(0.0, 0.0, 0.0, 10.0))]
    #[case::negative_height(RawFace::with_bounds(0.0, 0.0, 10.0, -1.0))]
    #[case::missing_bounds(RawFace::default())]
    fn test_degenerate_raw_face_rejected(#[case] raw: RawFace) {
        let err = DetectedFace::try_from_raw(raw).unwrap_err();
        assert!(matches!(err, OverlayError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_deserialize_rejects_degenerate_bounds() {
        let json = r#"{"bounds": {"x": 0, "y": 0, "width": 0, "height": 10}}"#;
        let err = serde_json::from_str::<DetectedFace>(json).unwrap_err();
        assert!(err.to_string().contains("degenerate face bounds"));
    }

    #[test]
    fn test_deserialize_validates_like_try_from_raw() {
        let json = r#"{"bounds": {"x": 1, "y": 2, "width": 3, "height": 4},
                       "smile_probability": 3.0}"#;
        let face: DetectedFace = serde_json::from_str(json).unwrap();
        assert_eq!(face.bounds(), Bounds::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(face.smile_probability, Some(1.0));

        let back: DetectedFace =
            serde_json::from_str(&serde_json::to_string(&face).unwrap()).unwrap();
        assert_eq!(back, face);
    }

    #[test]
    fn test_probabilities_clamped_and_nan_dropped() {
        let raw = RawFace {
            smile_probability: Some(1.7),
            left_eye_open_probability: Some(-0.2),
            right_eye_open_probability: Some(f64::NAN),
            ..RawFace::with_bounds(0.0, 0.0, 1.0, 1.0)
        };
        let face = DetectedFace::try_from_raw(raw).unwrap();
        assert_eq!(face.smile_probability, Some(1.0));
        assert_eq!(face.left_eye_open_probability, Some(0.0));
        assert_eq!(face.right_eye_open_probability, None);
    }

    #[test]
    fn test_non_finite_landmarks_dropped() {
        let raw = RawFace {
            landmarks: Some(vec![Point::new(1.0, 2.0), Point::new(f64::NAN, 2.0)]),
            ..RawFace::with_bounds(0.0, 0.0, 1.0, 1.0)
        };
        let face = DetectedFace::try_from_raw(raw).unwrap();
        assert_eq!(face.landmarks, Some(vec![Point::new(1.0, 2.0)]));
    }

    #[test]
    fn test_all_invalid_landmarks_become_none() {
        let raw = RawFace {
            landmarks: Some(vec![Point::new(f64::INFINITY, 0.0)]),
            ..RawFace::with_bounds(0.0, 0.0, 1.0, 1.0)
        };
        let face = DetectedFace::try_from_raw(raw).unwrap();
        assert!(face.landmarks.is_none());
    }

    #[test]
    fn test_non_finite_angles_zeroed() {
        let raw = RawFace {
            pitch_angle: f64::NAN,
            ..RawFace::with_bounds(0.0, 0.0, 1.0, 1.0)
        };
        let face = DetectedFace::try_from_raw(raw).unwrap();
        assert_eq!(face.pitch_angle, 0.0);
    }

    #[test]
    fn test_empty_face_set() {
        let set = FaceSet::empty(3);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.order_key(), (3, 0));
    }

    #[test]
    fn test_raw_face_deserializes_with_defaults() {
        let raw: RawFace =
            serde_json::from_str(r#"{"bounds":{"x":1,"y":2,"width":3,"height":4}}"#).unwrap();
        assert_eq!(raw.bounds, Some(Bounds::new(1.0, 2.0, 3.0, 4.0)));
        assert!(raw.landmarks.is_none());
    }
}
