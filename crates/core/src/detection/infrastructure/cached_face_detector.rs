use std::collections::HashMap;
use std::sync::Arc;

use crate::detection::domain::detection_options::DetectionOptions;
use crate::detection::domain::face_detector::{DetectorError, FaceDetector};
use crate::shared::face::RawFace;
use crate::shared::frame::Frame;

/// Replays pre-computed detector output by frame timestamp.
///
/// Stands in for a real detector when driving the pipeline from a recorded
/// or synthetic feed. Timestamps without an entry yield no faces.
pub struct CachedFaceDetector {
    cache: Arc<HashMap<i64, Vec<RawFace>>>,
    calls: usize,
}

impl CachedFaceDetector {
    pub fn new(cache: Arc<HashMap<i64, Vec<RawFace>>>) -> Self {
        Self { cache, calls: 0 }
    }

    /// Parses a JSON object mapping timestamps to raw face lists.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let by_key: HashMap<String, Vec<RawFace>> = serde_json::from_str(json)?;
        let mut cache = HashMap::with_capacity(by_key.len());
        for (key, faces) in by_key {
            let ts = key.parse::<i64>().map_err(serde::de::Error::custom)?;
            cache.insert(ts, faces);
        }
        Ok(Self::new(Arc::new(cache)))
    }

    /// Number of `detect` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl FaceDetector for CachedFaceDetector {
    fn detect(
        &mut self,
        frame: &Frame,
        _options: &DetectionOptions,
    ) -> Result<Vec<RawFace>, DetectorError> {
        self.calls += 1;
        Ok(self
            .cache
            .get(&frame.timestamp())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ts: i64) -> Frame {
        Frame::empty(100, 100, ts)
    }

    fn face(x: f64) -> RawFace {
        RawFace {
            tracking_id: Some(x as u32),
            ..RawFace::with_bounds(x, 20.0, 50.0, 50.0)
        }
    }

    fn detect(detector: &mut CachedFaceDetector, ts: i64) -> Vec<RawFace> {
        detector
            .detect(&frame(ts), &DetectionOptions::default())
            .unwrap()
    }

    #[test]
    fn test_returns_cached_faces_for_known_timestamp() {
        let faces = vec![face(10.0), face(60.0)];
        let cache = Arc::new(HashMap::from([(0, faces.clone())]));
        let mut detector = CachedFaceDetector::new(cache);

        assert_eq!(detect(&mut detector, 0), faces);
    }

    #[test]
    fn test_returns_empty_for_unknown_timestamp() {
        let cache = Arc::new(HashMap::from([(0, vec![face(10.0)])]));
        let mut detector = CachedFaceDetector::new(cache);

        assert!(detect(&mut detector, 5).is_empty());
    }

    #[test]
    fn test_counts_calls() {
        let mut detector = CachedFaceDetector::new(Arc::new(HashMap::new()));
        detect(&mut detector, 0);
        detect(&mut detector, 99);
        assert_eq!(detector.calls(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "10": [{"bounds": {"x": 1, "y": 2, "width": 3, "height": 4}, "yaw_angle": 12.5}],
            "20": []
        }"#;
        let mut detector = CachedFaceDetector::from_json(json).unwrap();

        let at_10 = detect(&mut detector, 10);
        assert_eq!(at_10.len(), 1);
        assert_eq!(at_10[0].yaw_angle, 12.5);
        assert!(detect(&mut detector, 20).is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_numeric_keys() {
        assert!(CachedFaceDetector::from_json(r#"{"abc": []}"#).is_err());
    }
}
