pub mod detection_pipeline;
pub mod handoff;
pub mod infrastructure;
pub mod pipeline_controller;
pub mod pipeline_logger;
