pub mod detection_options;
pub mod face_detector;
pub mod throttle_gate;
