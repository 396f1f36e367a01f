pub mod synthetic_frame_source;
