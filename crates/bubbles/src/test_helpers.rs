//! Shared test scaffolding.

use crate::canvas::Canvas;
use crate::config::preset::Colour;

/// A single call made against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    /// `clear()`
    Clear(f64, f64, f64, f64),
    /// `fill_circle()`
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        colour: Colour,
    },
}

/// A canvas that just remembers what was drawn on it.
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub client_size: (f64, f64),
    pub ratio: f64,
    pub backing_size: (usize, usize),
    pub transform: f64,
    pub calls: Vec<Call>,
}

impl RecordingCanvas {
    pub(crate) fn new(width: f64, height: f64, ratio: f64) -> Self {
        Self {
            client_size: (width, height),
            ratio,
            ..Self::default()
        }
    }

    pub(crate) fn circles(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Circle { .. }))
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn client_size(&self) -> (f64, f64) {
        self.client_size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn set_backing_size(&mut self, width: usize, height: usize) {
        self.backing_size = (width, height);
    }

    fn set_transform(&mut self, scale: f64) {
        self.transform = scale;
    }

    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.calls.push(Call::Clear(x, y, width, height));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, colour: Colour) {
        self.calls.push(Call::Circle {
            x,
            y,
            radius,
            colour,
        });
    }
}
