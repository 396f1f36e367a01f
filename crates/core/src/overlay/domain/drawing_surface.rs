use crate::overlay::domain::draw_command::DrawCommand;

/// Whatever actually paints the overlay. Called from the UI thread only.
pub trait DrawingSurface {
    /// Starts a new overlay frame, discarding what was drawn before.
    fn clear(&mut self);

    fn draw(&mut self, command: &DrawCommand);
}
