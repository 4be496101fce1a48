//! The rectangle that particles are born in and bounce around inside.

use crate::config::preset::Area;

/// An axis-aligned rectangle in logical pixels. `top` is smaller than `bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "It's a rectangle, it's not going to grow new sides"
)]
pub struct Bounds {
    /// Left edge
    pub left: f64,
    /// Right edge
    pub right: f64,
    /// Top edge
    pub top: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl Bounds {
    /// Work out the active rectangle for a surface of the given logical size.
    ///
    /// The right-hand strip only applies when it's actually narrower than the surface, otherwise
    /// the whole surface is used.
    #[must_use]
    pub fn resolve(width: f64, height: f64, area: Area, strip_width: f64) -> Self {
        match area {
            Area::RightStrip if strip_width < width => Self {
                left: width - strip_width,
                right: width,
                top: 0.0,
                bottom: height,
            },
            Area::RightStrip | Area::FullSurface => Self {
                left: 0.0,
                right: width,
                top: 0.0,
                bottom: height,
            },
        }
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Is the point inside the rectangle? Edges count as inside.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn right_strip_on_a_wide_surface() {
        let bounds = Bounds::resolve(1920.0, 1080.0, Area::RightStrip, 795.0);
        assert!((bounds.left - 1125.0).abs() < f64::EPSILON);
        assert!((bounds.right - 1920.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 795.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 1080.0).abs() < f64::EPSILON);
    }

    #[test]
    fn right_strip_wider_than_the_surface_uses_everything() {
        let bounds = Bounds::resolve(600.0, 400.0, Area::RightStrip, 795.0);
        assert_eq!(
            bounds,
            Bounds {
                left: 0.0,
                right: 600.0,
                top: 0.0,
                bottom: 400.0
            }
        );

        let exactly = Bounds::resolve(795.0, 400.0, Area::RightStrip, 795.0);
        assert!(exactly.left.abs() < f64::EPSILON);
    }

    #[test]
    fn full_surface_ignores_the_strip() {
        let bounds = Bounds::resolve(1920.0, 1080.0, Area::FullSurface, 795.0);
        assert!(bounds.left.abs() < f64::EPSILON);
        assert!(bounds.contains(0.0, 1080.0));
        assert!(!bounds.contains(1920.1, 10.0));
    }
}
