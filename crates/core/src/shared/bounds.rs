use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box, top-left origin, in whatever pixel space the caller uses.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the box cannot be drawn: a non-positive or non-finite
    /// dimension, or a non-finite origin.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        !finite || self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grows both dimensions by `factor` and keeps the box centered on its
    /// original center. A factor of `0.2` yields a box 20% wider and taller.
    ///
    /// Negative factors shrink the box; callers validate the factor.
    pub fn padded(&self, factor: f64) -> Bounds {
        let center = self.center();
        let width = self.width * (1.0 + factor);
        let height = self.height * (1.0 + factor);
        Bounds {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Point at fractional offsets `(fx, fy)` inside the box; `(0, 0)` is the
    /// top-left corner and `(1, 1)` the bottom-right.
    pub fn fraction(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x + self.width * fx, self.y + self.height * fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    // ── Degeneracy ──────────────────────────────────────────────────

    #[rstest]
    #[case::zero_width(Bounds::new(0.0, 0.0, 0.0, 10.0))]
    #[case::zero_height(Bounds::new(0.0, 0.0, 10.0, 0.0))]
    #[case::negative_width(Bounds::new(0.0, 0.0, -5.0, 10.0))]
    #[case::nan_height(Bounds::new(0.0, 0.0, 10.0, f64::NAN))]
    #[case::infinite_width(Bounds::new(0.0, 0.0, f64::INFINITY, 10.0))]
    #[case::nan_origin(Bounds::new(f64::NAN, 0.0, 10.0, 10.0))]
    fn test_degenerate(#[case] b: Bounds) {
        assert!(b.is_degenerate());
    }

    #[test]
    fn test_positive_box_is_not_degenerate() {
        assert!(!Bounds::new(-5.0, -5.0, 1.0, 1.0).is_degenerate());
    }

    // ── Padding ─────────────────────────────────────────────────────

    #[test]
    fn test_padding_keeps_center() {
        let b = Bounds::new(10.0, 10.0, 100.0, 100.0);
        let p = b.padded(0.2);
        assert_relative_eq!(p.center().x, b.center().x, epsilon = 1e-9);
        assert_relative_eq!(p.center().y, b.center().y, epsilon = 1e-9);
        assert!(p.width > b.width);
        assert!(p.height > b.height);
    }

    #[test]
    fn test_padding_values() {
        // 100x100 at (10,10), +20% → 120x120 centered on (60,60)
        let p = Bounds::new(10.0, 10.0, 100.0, 100.0).padded(0.2);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.width, 120.0, epsilon = 1e-9);
        assert_relative_eq!(p.height, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_padding_non_square() {
        let b = Bounds::new(0.0, 0.0, 40.0, 80.0);
        let p = b.padded(0.4);
        assert_relative_eq!(p.width, 56.0, epsilon = 1e-9);
        assert_relative_eq!(p.height, 112.0, epsilon = 1e-9);
        assert_relative_eq!(p.center().x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(p.center().y, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_padding_is_identity() {
        let b = Bounds::new(3.0, 4.0, 5.0, 6.0);
        assert_eq!(b.padded(0.0), b);
    }

    // ── Fractions ───────────────────────────────────────────────────

    #[test]
    fn test_fraction_corners() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(b.fraction(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(b.fraction(1.0, 1.0), Point::new(110.0, 70.0));
        assert_eq!(b.fraction(0.5, 0.5), b.center());
    }
}
