use crate::detection::domain::detection_options::DetectionOptions;
use crate::shared::face::RawFace;
use crate::shared::frame::Frame;

pub type DetectorError = Box<dyn std::error::Error + Send + Sync>;

/// Domain interface for face detection.
///
/// Called on the capture thread for sampled frames only. Implementations may
/// be stateful (e.g., tracking across frames), hence `&mut self`. `options`
/// is the same value on every call for the lifetime of a pipeline.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectionOptions,
    ) -> Result<Vec<RawFace>, DetectorError>;
}
