pub mod log_surface;
pub mod recording_surface;
