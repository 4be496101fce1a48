//! The user's terminal, as seen by the engine: one named surface and a steady frame tick.

use crate::canvas::{Host, SURFACE_ID};

use super::raster::RasterCanvas;

/// Microseconds in a second.
pub const ONE_SECOND_IN_MICROSECONDS: u64 = 1_000_000;

/// Hands out a raster canvas sized to fit the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalHost {
    /// Terminal width in cells.
    pub columns: usize,
    /// Terminal height in cells.
    pub rows: usize,
    /// Logical pixels per cell, `(width, height)`.
    pub cell_size: (f64, f64),
    /// Reported to the canvas as its device pixel ratio.
    pub device_pixel_ratio: f64,
}

impl TerminalHost {
    /// Instantiate
    #[must_use]
    pub const fn new(
        columns: usize,
        rows: usize,
        cell_size: (f64, f64),
        device_pixel_ratio: f64,
    ) -> Self {
        Self {
            columns,
            rows,
            cell_size,
            device_pixel_ratio,
        }
    }

    /// The terminal changed size.
    pub const fn resize(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
    }

    /// How big the surface is laid out, in logical pixels.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Terminal sizes are tiny"
    )]
    #[must_use]
    pub fn client_size(&self) -> (f64, f64) {
        (
            self.columns as f64 * self.cell_size.0,
            self.rows as f64 * self.cell_size.1,
        )
    }
}

impl Host for TerminalHost {
    type Canvas = RasterCanvas;

    fn find_surface(&mut self, id: &str) -> Option<Self::Canvas> {
        if id != SURFACE_ID {
            tracing::trace!("The terminal has no '{id}' surface");
            return None;
        }
        Some(RasterCanvas::new(
            self.client_size(),
            self.device_pixel_ratio,
        ))
    }
}

/// Paces the render loop.
#[derive(Debug)]
pub struct FrameTicker {
    /// Target frames per second.
    frame_rate: u32,
    /// When the last frame was let through.
    last_frame_tick: tokio::time::Instant,
}

impl FrameTicker {
    /// Instantiate
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate: frame_rate.max(1),
            last_frame_tick: tokio::time::Instant::now(),
        }
    }

    /// How long a single frame should take.
    #[must_use]
    pub fn frame_duration(&self) -> std::time::Duration {
        let target = ONE_SECOND_IN_MICROSECONDS.wrapping_div(self.frame_rate.into());
        std::time::Duration::from_micros(target)
    }

    /// Sleep until the next frame is due. Returns straight away if we're already late.
    pub async fn sleep_until_next_frame_tick(&mut self) {
        let target = self.frame_duration();
        if let Some(wait) = target.checked_sub(self.last_frame_tick.elapsed()) {
            tokio::time::sleep(wait).await;
        }
        self.last_frame_tick = tokio::time::Instant::now();
    }
}
