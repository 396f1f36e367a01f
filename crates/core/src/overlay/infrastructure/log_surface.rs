use crate::overlay::domain::draw_command::DrawCommand;
use crate::overlay::domain::drawing_surface::DrawingSurface;

/// Headless surface that writes each command to the `log` facade.
///
/// Rectangles and text go out at `debug`, point markers at `trace`.
#[derive(Debug, Default)]
pub struct LogSurface {
    frames: usize,
    drawn: usize,
}

impl LogSurface {
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Total commands received over the surface's lifetime.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl DrawingSurface for LogSurface {
    fn clear(&mut self) {
        self.frames += 1;
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.drawn += 1;
        match command {
            DrawCommand::Rect { bounds, .. } => log::debug!(
                "[overlay {}] rect x={:.1} y={:.1} w={:.1} h={:.1}",
                self.frames,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height
            ),
            DrawCommand::Point { center, .. } => log::trace!(
                "[overlay {}] point ({:.1}, {:.1})",
                self.frames,
                center.x,
                center.y
            ),
            DrawCommand::Text { text, .. } => log::debug!("[overlay {}] {text}", self.frames),
        }
    }
}
