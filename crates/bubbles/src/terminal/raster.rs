//! A canvas that draws into plain memory, so that it can be shown in a terminal afterwards.

use crate::canvas::Canvas;
use crate::config::preset::Colour;

/// A premultiplied RGBA pixel.
pub type Pixel = [f32; 4];

/// A fully transparent pixel.
const TRANSPARENT: Pixel = [0.0; 4];

/// Software rasteriser implementing [`Canvas`].
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    /// The logical size the host lays this canvas out at.
    client_size: (f64, f64),
    /// Device pixels per logical pixel, as the host reports it.
    device_pixel_ratio: f64,
    /// Width of the pixel store.
    width: usize,
    /// Height of the pixel store.
    height: usize,
    /// The scale applied to every drawing call.
    scale: f64,
    /// Every pixel, row by row.
    pixels: Vec<Pixel>,
}

impl RasterCanvas {
    /// Instantiate. The pixel store is empty until the canvas is given a backing size.
    #[must_use]
    pub const fn new(client_size: (f64, f64), device_pixel_ratio: f64) -> Self {
        Self {
            client_size,
            device_pixel_ratio,
            width: 0,
            height: 0,
            scale: 1.0,
            pixels: Vec::new(),
        }
    }

    /// Change the logical size the canvas is laid out at. The backing store doesn't change until
    /// it is resized.
    pub const fn layout(&mut self, client_size: (f64, f64)) {
        self.client_size = client_size;
    }

    /// Size of the pixel store.
    #[must_use]
    pub const fn backing_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get a single pixel from the store.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// The average of all the pixels inside a rectangle of the store. The rectangle is clipped to
    /// the store and an empty rectangle is transparent.
    #[must_use]
    pub fn average(&self, left: usize, top: usize, right: usize, bottom: usize) -> Pixel {
        let right = right.min(self.width);
        let bottom = bottom.min(self.height);
        if left >= right || top >= bottom {
            return TRANSPARENT;
        }

        let mut sum = [0.0f32; 4];
        for y in top..bottom {
            let row_start = y * self.width;
            let Some(row) = self.pixels.get(row_start + left..row_start + right) else {
                continue;
            };
            for pixel in row {
                for (total, channel) in sum.iter_mut().zip(pixel) {
                    *total += channel;
                }
            }
        }

        #[expect(
            clippy::as_conversions,
            clippy::cast_precision_loss,
            reason = "Pixel counts are far below f32's exact integer range"
        )]
        let count = ((right - left) * (bottom - top)) as f32;
        sum.map(|total| total / count)
    }

    /// Convert a logical span to a clipped range of store indices.
    fn span(&self, from: f64, to: f64, limit: usize) -> std::ops::Range<usize> {
        let start = to_index((from * self.scale).floor(), limit);
        let end = to_index((to * self.scale).ceil(), limit);
        start..end.max(start)
    }
}

/// Clamp a float coordinate to `[0, limit]`.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The value is clamped to a valid index first"
)]
fn to_index(value: f64, limit: usize) -> usize {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, limit as f64) as usize
}

/// Composite a premultiplied source over a premultiplied destination.
fn over(source: Pixel, destination: Pixel) -> Pixel {
    let remaining = 1.0 - source[3];
    [
        source[0] + destination[0] * remaining,
        source[1] + destination[1] * remaining,
        source[2] + destination[2] * remaining,
        source[3] + destination[3] * remaining,
    ]
}

impl Canvas for RasterCanvas {
    fn client_size(&self) -> (f64, f64) {
        self.client_size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn set_backing_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![TRANSPARENT; width * height];
    }

    fn set_transform(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let columns = self.span(x, x + width, self.width);
        let rows = self.span(y, y + height, self.height);
        for row in rows {
            let start = row * self.width;
            if let Some(slice) = self
                .pixels
                .get_mut(start + columns.start..start + columns.end)
            {
                slice.fill(TRANSPARENT);
            }
        }
    }

    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "Pixel coordinates are small and coverage is within 0 to 1"
    )]
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, colour: Colour) {
        if radius <= 0.0 || colour.alpha <= 0.0 {
            return;
        }

        let centre_x = x * self.scale;
        let centre_y = y * self.scale;
        let scaled_radius = radius * self.scale;
        let columns = self.span(x - radius - 1.0, x + radius + 1.0, self.width);
        let rows = self.span(y - radius - 1.0, y + radius + 1.0, self.height);

        let alpha = colour.alpha.clamp(0.0, 1.0);
        for row in rows {
            for column in columns.clone() {
                let dx = column as f64 + 0.5 - centre_x;
                let dy = row as f64 + 0.5 - centre_y;
                let distance = dx.hypot(dy);
                // One pixel of anti-aliasing around the edge.
                let coverage = (scaled_radius - distance + 0.5).clamp(0.0, 1.0) as f32;
                if coverage <= 0.0 {
                    continue;
                }

                let source_alpha = alpha * coverage;
                let source = [
                    colour.color.red * source_alpha,
                    colour.color.green * source_alpha,
                    colour.color.blue * source_alpha,
                    source_alpha,
                ];
                if let Some(pixel) = self.pixels.get_mut(row * self.width + column) {
                    *pixel = over(source, *pixel);
                }
            }
        }
    }
}
