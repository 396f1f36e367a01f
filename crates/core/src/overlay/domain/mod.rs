pub mod draw_command;
pub mod drawing_surface;
pub mod overlay_projector;
pub mod screen_transform;
