use serde::{Deserialize, Serialize};

use crate::overlay::domain::draw_command::{Color, DrawCommand};
use crate::overlay::domain::screen_transform::{ScreenTransform, ViewConfig};
use crate::shared::bounds::Bounds;
use crate::shared::constants::{DEFAULT_MARKER_RADIUS, DEFAULT_PADDING, DEFAULT_STROKE_WIDTH};
use crate::shared::face::{DetectedFace, FaceSet};

/// Marker positions as fractions of the padded box, used when the detector
/// supplies no landmarks: [left_eye, right_eye, nose, mouth].
const DERIVED_MARKERS: [(f64, f64); 4] = [(0.3, 0.38), (0.7, 0.38), (0.5, 0.55), (0.5, 0.75)];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub box_color: Color,
    pub stroke_width: f64,
    pub marker_color: Color,
    pub marker_radius: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: Color::GREEN,
            stroke_width: DEFAULT_STROKE_WIDTH,
            marker_color: Color::RED,
            marker_radius: DEFAULT_MARKER_RADIUS,
        }
    }
}

/// Maps a face set to screen-space draw commands.
///
/// Pure: the same set always yields the same commands. Each face gets one
/// stroked rectangle, padded symmetrically around the detector box so tight
/// crops still frame the whole face, plus landmark markers when enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayProjector {
    padding: f64,
    landmark_markers: bool,
    view: Option<ViewConfig>,
    style: OverlayStyle,
}

impl OverlayProjector {
    /// Negative or non-finite padding is treated as none.
    pub fn new(
        padding: f64,
        landmark_markers: bool,
        view: Option<ViewConfig>,
        style: OverlayStyle,
    ) -> Self {
        let padding = if padding.is_finite() {
            padding.max(0.0)
        } else {
            0.0
        };
        Self {
            padding,
            landmark_markers,
            view,
            style,
        }
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn project(&self, set: &FaceSet) -> Vec<DrawCommand> {
        let transform =
            ScreenTransform::for_frame(set.frame_width, set.frame_height, self.view.as_ref());
        let mut commands = Vec::with_capacity(set.len());

        for face in &set.faces {
            let Some(padded) = self.padded_box(face) else {
                continue;
            };
            let screen = transform.bounds(padded);
            if screen.is_degenerate() {
                continue;
            }

            commands.push(DrawCommand::Rect {
                bounds: screen,
                stroke_width: self.style.stroke_width,
                color: self.style.box_color,
            });

            if self.landmark_markers {
                self.push_markers(face, padded, &transform, &mut commands);
            }
        }

        commands
    }

    /// Padded box in frame space, or `None` when padding overflows.
    pub fn padded_box(&self, face: &DetectedFace) -> Option<Bounds> {
        let padded = face.bounds().padded(self.padding);
        (!padded.is_degenerate()).then_some(padded)
    }

    fn push_markers(
        &self,
        face: &DetectedFace,
        padded: Bounds,
        transform: &ScreenTransform,
        commands: &mut Vec<DrawCommand>,
    ) {
        let marker = |p| DrawCommand::Point {
            center: transform.point(p),
            radius: self.style.marker_radius,
            color: self.style.marker_color,
        };

        match &face.landmarks {
            Some(points) => commands.extend(points.iter().copied().map(marker)),
            None => commands.extend(
                DERIVED_MARKERS
                    .iter()
                    .map(|&(fx, fy)| marker(padded.fraction(fx, fy))),
            ),
        }
    }
}

impl Default for OverlayProjector {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING, false, None, OverlayStyle::default())
    }
}
