//! Generally useful shared code.

use rand::Rng;

/// How many pixels fit in a millimetre, using the CSS reference of 96 pixels per inch.
pub const PIXELS_PER_MILLIMETRE: f64 = 96.0 / 25.4;

/// Convert millimetres to device-independent pixels.
#[must_use]
pub fn mm_to_px(millimetres: f64) -> f64 {
    millimetres * PIXELS_PER_MILLIMETRE
}

/// Linearly interpolate between `from` and `to`.
#[must_use]
pub fn lerp(from: f64, to: f64, amount: f64) -> f64 {
    from + (to - from) * amount
}

/// A uniform sample from `[min, max)`. Unlike `gen_range()` it doesn't panic when `min == max`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}
