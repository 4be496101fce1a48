//! Decides how many particles are due each frame.

/// The most particles a single frame will ever emit, whatever the rate asks for.
pub const MAX_PER_FRAME: usize = 1_000;

/// Turns a continuous emission rate into whole particles per frame.
///
/// The fractional part of every frame's request is carried over to the next frame, so that the
/// long-run average matches the rate exactly, even when each frame only asks for a fraction of a
/// particle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Emitter {
    /// The fraction of a particle still owed from previous frames. Always in `[0, 1)`.
    leftover: f64,
}

impl Emitter {
    /// How many particles should be emitted for this frame. Negative rates count as 0, and no
    /// frame emits more than [`MAX_PER_FRAME`].
    pub fn due(&mut self, rate_per_second: f64, delta: f64) -> usize {
        let requested = rate_per_second.max(0.0) * delta.max(0.0) + self.leftover;
        if !requested.is_finite() {
            self.leftover = 0.0;
            return 0;
        }

        #[expect(
            clippy::as_conversions,
            clippy::cast_precision_loss,
            reason = "The ceiling is small enough to be exact as an `f64`"
        )]
        let ceiling = MAX_PER_FRAME as f64;
        if requested >= ceiling {
            tracing::warn!(
                "{requested} particles requested in one frame, capping at {MAX_PER_FRAME}"
            );
            self.leftover = 0.0;
            return MAX_PER_FRAME;
        }

        let whole = requested.floor();
        self.leftover = requested - whole;

        #[expect(
            clippy::as_conversions,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "`whole` is a non-negative integer below `MAX_PER_FRAME`"
        )]
        let count = whole as usize;
        count
    }

    /// The fraction of a particle carried over to the next frame.
    #[must_use]
    pub const fn leftover(&self) -> f64 {
        self.leftover
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fractions_carry_over() {
        let mut emitter = Emitter::default();
        // 120 per second at 1/240th of a second is half a particle per frame.
        assert_eq!(emitter.due(120.0, 1.0 / 240.0), 0);
        assert!((emitter.leftover() - 0.5).abs() < 0.000_001);
        assert_eq!(emitter.due(120.0, 1.0 / 240.0), 1);
        assert!(emitter.leftover().abs() < 0.000_001);
    }

    #[test]
    fn long_run_average_matches_the_rate() {
        let mut emitter = Emitter::default();
        let mut total = 0;
        let delta = 1.0 / 61.0;
        let frames = 6100;
        for _ in 0..frames {
            total += emitter.due(120.0, delta);
        }
        let expected = 120.0 * delta * f64::from(frames);
        #[expect(
            clippy::as_conversions,
            clippy::cast_precision_loss,
            reason = "Tests aren't so strict"
        )]
        let difference = (total as f64 - expected).abs();
        assert!(difference <= 1.0, "emitted {total}, expected {expected}");
    }

    #[test]
    fn negative_rate_emits_nothing() {
        let mut emitter = Emitter::default();
        assert_eq!(emitter.due(-50.0, 1.0), 0);
        assert!(emitter.leftover().abs() < f64::EPSILON);
    }

    #[test]
    fn huge_rates_are_capped() {
        let mut emitter = Emitter::default();
        assert_eq!(emitter.due(1e300, 0.05), MAX_PER_FRAME);
        assert!(emitter.leftover().abs() < f64::EPSILON);

        // Back to normal as soon as the rate is.
        assert_eq!(emitter.due(120.0, 0.05), 6);
    }
}
