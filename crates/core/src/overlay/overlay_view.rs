use std::sync::Arc;

use crate::overlay::domain::draw_command::{Color, DrawCommand};
use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_projector::OverlayProjector;
use crate::pipeline::handoff::HandoffConsumer;
use crate::shared::bounds::Point;
use crate::shared::face::{DetectedFace, FaceSet};

/// Top-left corner of the text panel.
const TEXT_ORIGIN: Point = Point { x: 10.0, y: 50.0 };
const LINE_HEIGHT: f64 = 20.0;

/// UI-thread side of the overlay.
///
/// Reads the latest face set from the handoff at its own cadence and turns it
/// into draw commands plus a short text panel. Owns the render snapshot:
/// between refreshes every query answers from the same set.
pub struct OverlayView {
    consumer: HandoffConsumer,
    projector: OverlayProjector,
    snapshot: Arc<FaceSet>,
    text_color: Color,
}

impl OverlayView {
    pub fn new(consumer: HandoffConsumer, projector: OverlayProjector) -> Self {
        let snapshot = consumer.snapshot();
        Self {
            consumer,
            projector,
            snapshot,
            text_color: Color::WHITE,
        }
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Pulls the latest set from the handoff. Returns `true` when it changed.
    pub fn refresh(&mut self) -> bool {
        let latest = self.consumer.consume();
        let changed = !Arc::ptr_eq(&latest, &self.snapshot);
        self.snapshot = latest;
        changed
    }

    pub fn snapshot(&self) -> &FaceSet {
        &self.snapshot
    }

    pub fn current_face_count(&self) -> usize {
        self.snapshot.len()
    }

    pub fn current_faces(&self) -> &[DetectedFace] {
        &self.snapshot.faces
    }

    /// "Detected Faces: N" followed by one line per face.
    pub fn overlay_text(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.snapshot.len() + 1);
        lines.push(format!("Detected Faces: {}", self.current_face_count()));
        for (i, face) in self.current_faces().iter().enumerate() {
            let b = face.bounds();
            lines.push(format!(
                "Face {}: Bounds(x={:.0}, y={:.0}, w={:.0}, h={:.0})",
                i + 1,
                b.x,
                b.y,
                b.width,
                b.height
            ));
        }
        lines
    }

    /// Shapes for every face followed by the text panel.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut commands = self.projector.project(&self.snapshot);
        commands.extend(
            self.overlay_text()
                .into_iter()
                .enumerate()
                .map(|(i, text)| DrawCommand::Text {
                    origin: Point::new(TEXT_ORIGIN.x, TEXT_ORIGIN.y + i as f64 * LINE_HEIGHT),
                    text,
                    color: self.text_color,
                }),
        );
        commands
    }

    /// Refreshes and redraws the whole overlay. Returns the command count.
    pub fn render(&mut self, surface: &mut dyn DrawingSurface) -> usize {
        self.refresh();
        let commands = self.draw_commands();
        surface.clear();
        for command in &commands {
            surface.draw(command);
        }
        commands.len()
    }
}
