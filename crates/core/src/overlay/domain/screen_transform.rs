use serde::{Deserialize, Serialize};

use crate::shared::bounds::{Bounds, Point};

/// Size and orientation of the view the overlay is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
    /// Flip horizontally, as front camera previews are shown mirrored.
    #[serde(default)]
    pub mirror: bool,
}

/// Maps frame pixel coordinates to view coordinates.
///
/// Scales each axis independently so the frame fills the view, then
/// optionally mirrors around the view's vertical center line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    scale_x: f64,
    scale_y: f64,
    mirror_width: Option<f64>,
}

impl ScreenTransform {
    pub const IDENTITY: ScreenTransform = ScreenTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        mirror_width: None,
    };

    /// Identity when no view is configured or the frame size is unknown.
    pub fn for_frame(frame_width: u32, frame_height: u32, view: Option<&ViewConfig>) -> Self {
        let Some(view) = view else {
            return Self::IDENTITY;
        };
        if frame_width == 0 || frame_height == 0 {
            return Self::IDENTITY;
        }
        Self {
            scale_x: view.width as f64 / frame_width as f64,
            scale_y: view.height as f64 / frame_height as f64,
            mirror_width: view.mirror.then_some(view.width as f64),
        }
    }

    pub fn point(&self, p: Point) -> Point {
        let x = p.x * self.scale_x;
        let y = p.y * self.scale_y;
        match self.mirror_width {
            Some(w) => Point::new(w - x, y),
            None => Point::new(x, y),
        }
    }

    pub fn bounds(&self, b: Bounds) -> Bounds {
        let width = b.width * self.scale_x;
        let height = b.height * self.scale_y;
        let y = b.y * self.scale_y;
        let x = match self.mirror_width {
            Some(w) => w - (b.x * self.scale_x + width),
            None => b.x * self.scale_x,
        };
        Bounds::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn view(width: u32, height: u32, mirror: bool) -> ViewConfig {
        ViewConfig {
            width,
            height,
            mirror,
        }
    }

    #[test]
    fn test_no_view_is_identity() {
        let t = ScreenTransform::for_frame(640, 480, None);
        let b = Bounds::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(t.bounds(b), b);
    }

    #[test]
    fn test_unknown_frame_size_is_identity() {
        let v = view(720, 1280, true);
        assert_eq!(
            ScreenTransform::for_frame(0, 480, Some(&v)),
            ScreenTransform::IDENTITY
        );
    }

    #[test]
    fn test_scales_each_axis() {
        let v = view(720, 1280, false);
        let t = ScreenTransform::for_frame(360, 640, Some(&v));
        let b = t.bounds(Bounds::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(b, Bounds::new(20.0, 40.0, 60.0, 80.0));
    }

    #[test]
    fn test_mirror_flips_horizontally() {
        let v = view(100, 100, true);
        let t = ScreenTransform::for_frame(100, 100, Some(&v));
        let b = t.bounds(Bounds::new(10.0, 5.0, 20.0, 30.0));
        // Right edge 30 → left edge 70.
        assert_relative_eq!(b.x, 70.0);
        assert_relative_eq!(b.y, 5.0);
        assert_relative_eq!(b.width, 20.0);
        assert_relative_eq!(b.height, 30.0);

        let p = t.point(Point::new(10.0, 5.0));
        assert_relative_eq!(p.x, 90.0);
    }

    #[test]
    fn test_mirrored_box_keeps_mirrored_center() {
        let v = view(200, 100, true);
        let t = ScreenTransform::for_frame(100, 100, Some(&v));
        let src = Bounds::new(10.0, 10.0, 20.0, 20.0);
        let mapped = t.bounds(src);
        let mapped_center = t.point(src.center());
        assert_relative_eq!(mapped.center().x, mapped_center.x, epsilon = 1e-9);
        assert_relative_eq!(mapped.center().y, mapped_center.y, epsilon = 1e-9);
    }
}
