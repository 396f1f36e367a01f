use crate::overlay::domain::draw_command::DrawCommand;
use crate::overlay::domain::drawing_surface::DrawingSurface;

/// Keeps the commands of the most recent overlay frame in memory.
///
/// Useful for snapshot-style assertions and for hosts that paint the overlay
/// themselves after the fact.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// How many overlay frames have been started.
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}
