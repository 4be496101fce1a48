//! The seam between the engine and whatever actually shows the pixels.

use crate::config::preset::Colour;

/// The name of the surface the engine draws on.
pub const SURFACE_ID: &str = "bubbles";

/// The largest device pixel ratio that the backing resolution will follow.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// A 2D drawing surface.
///
/// A canvas has two sizes: the logical size that the host lays it out at, and the backing size of
/// its actual pixel store. The [`SurfaceManager`] keeps the two in sync and installs a transform so
/// that all drawing calls can use logical coordinates.
pub trait Canvas {
    /// The size the host lays the surface out at, in logical pixels.
    fn client_size(&self) -> (f64, f64);
    /// How many device pixels the host has for every logical pixel.
    fn device_pixel_ratio(&self) -> f64;
    /// Resize the pixel store. Resizing discards the existing contents.
    fn set_backing_size(&mut self, width: usize, height: usize);
    /// Scale every subsequent drawing call by `scale`.
    fn set_transform(&mut self, scale: f64);
    /// Make a rectangle fully transparent. Uses logical coordinates.
    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Fill a circle. Uses logical coordinates.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, colour: Colour);
}

/// Anything that can give the engine a named surface to draw on.
pub trait Host {
    /// The kind of canvas this host hands out.
    type Canvas: Canvas;

    /// Look up a surface by name. `None` if the host doesn't have one.
    fn find_surface(&mut self, id: &str) -> Option<Self::Canvas>;
}

/// Owns the engine's canvas and keeps its resolution in step with the host.
#[derive(Debug)]
pub struct SurfaceManager<C: Canvas> {
    /// The canvas being managed.
    canvas: C,
    /// Logical width.
    width: f64,
    /// Logical height.
    height: f64,
    /// The device pixel ratio currently in use.
    ratio: f64,
}

impl<C: Canvas> SurfaceManager<C> {
    /// Take ownership of a canvas and set up its backing resolution.
    pub fn new(canvas: C) -> Self {
        let mut manager = Self {
            canvas,
            width: 1.0,
            height: 1.0,
            ratio: 1.0,
        };
        manager.sync();
        manager
    }

    /// Re-read the canvas's layout and device pixel ratio, then resize the backing store and
    /// reinstall the transform to match. Safe to call as often as the host likes.
    pub fn sync(&mut self) {
        let (client_width, client_height) = self.canvas.client_size();
        self.width = at_least_one(client_width);
        self.height = at_least_one(client_height);
        self.ratio = Self::clamp_ratio(self.canvas.device_pixel_ratio());

        let backing_width = to_pixels(self.width * self.ratio);
        let backing_height = to_pixels(self.height * self.ratio);
        self.canvas.set_backing_size(backing_width, backing_height);
        self.canvas.set_transform(self.ratio);

        tracing::debug!(
            "Surface synced: logical {}x{}, ratio {}, backing {backing_width}x{backing_height}",
            self.width,
            self.height,
            self.ratio
        );
    }

    /// Keep the ratio within `[1, MAX_DEVICE_PIXEL_RATIO]`. Nonsense ratios count as 1.
    #[must_use]
    pub fn clamp_ratio(ratio: f64) -> f64 {
        if !ratio.is_finite() {
            return 1.0;
        }
        ratio.clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
    }

    /// The logical size of the surface.
    #[must_use]
    pub const fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// The device pixel ratio in use.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The managed canvas.
    #[must_use]
    pub const fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The managed canvas, mutably. Call [`Self::sync`] after changing its layout.
    pub const fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }
}

/// Layout sizes below 1 pixel are treated as 1 pixel.
fn at_least_one(size: f64) -> f64 {
    if size.is_nan() {
        return 1.0;
    }
    size.max(1.0)
}

/// Backing stores are whole pixels, fractional sizes are truncated.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Sizes are always at least 1 and we want truncation"
)]
fn to_pixels(size: f64) -> usize {
    size.floor() as usize
}
