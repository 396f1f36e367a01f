use serde::{Deserialize, Serialize};

use crate::shared::bounds::{Bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
}

/// Screen-space instruction for the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Stroked, unfilled rectangle.
    Rect {
        bounds: Bounds,
        stroke_width: f64,
        color: Color,
    },
    /// Filled dot.
    Point {
        center: Point,
        radius: f64,
        color: Color,
    },
    /// Single line of text with its top-left corner at `origin`.
    Text {
        origin: Point,
        text: String,
        color: Color,
    },
}
