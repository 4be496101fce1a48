//! All the variables that shape the particles.
//!
//! Only the emission rate can be overridden at runtime, see [`crate::parameters`]. Everything else
//! here is fixed once the engine starts.

use rand::Rng;

/// A straight RGBA colour.
pub type Colour = palette::Srgba;

/// Where particles are allowed to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Area {
    /// The entire surface.
    FullSurface,
    /// A strip hugging the right-hand edge of the surface.
    #[default]
    RightStrip,
}

/// A closed range of values to sample from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A range only ever has two ends"
)]
pub struct Span {
    /// The smallest value.
    pub min: f64,
    /// The largest value.
    pub max: f64,
}

impl Span {
    /// Instantiate
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Pick a value uniformly from the span.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        crate::utils::uniform(rng, self.min, self.max)
    }
}

/// How likely each of the two ways of disappearing are.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "There are only ever two ways to disappear"
)]
pub struct DisappearanceRatio {
    /// Weight of particles that fade out.
    pub fade: f64,
    /// Weight of particles that shrink away.
    pub shrink: f64,
}

impl DisappearanceRatio {
    /// The probability that a new particle fades rather than shrinks.
    ///
    /// Weights don't need to add up to 1. If neither weight is positive then everything fades.
    #[must_use]
    pub fn fade_probability(&self) -> f64 {
        let total = self.fade + self.shrink;
        if total <= 0.0 || !total.is_finite() {
            return 1.0;
        }
        (self.fade / total).clamp(0.0, 1.0)
    }
}

/// The whole configuration of the particle engine.
#[derive(bon::Builder, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Preset {
    /// Where particles are emitted and bounce around.
    #[builder(default)]
    pub area: Area,
    /// Width of the strip in [`Area::RightStrip`] mode, in logical pixels.
    #[builder(default = 795.0)]
    pub strip_width: f64,
    /// The candidate particle diameters in millimetres. Each particle picks one at random.
    #[builder(default = vec![9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0])]
    pub diameters_mm: Vec<f64>,
    /// How many particles to emit per second when the parameters don't say otherwise.
    #[builder(default = 120.0)]
    pub emit_per_second: f64,
    /// Linear speed in pixels per second.
    #[builder(default = Span::new(15.0, 60.0))]
    pub speed: Span,
    /// How many seconds a particle lives for.
    #[builder(default = Span::new(2.0, 4.0))]
    pub lifetime: Span,
    /// The split between fading and shrinking particles.
    #[builder(default = DisappearanceRatio { fade: 0.6, shrink: 0.4 })]
    pub disappearance: DisappearanceRatio,
    /// Opacity of a newly born particle.
    #[builder(default = 1.0)]
    pub alpha_start: f64,
    /// Opacity of a fading particle at the very end of its life.
    #[builder(default = 0.0)]
    pub alpha_end: f64,
    /// The colour every particle is drawn with.
    #[builder(default = Colour::new(1.0, 1.0, 1.0, 1.0))]
    pub colour: Colour,
    /// Amplitude of the wobble, in pixels.
    #[builder(default = 10.0)]
    pub wobble_strength: f64,
    /// Angular frequency of the wobble, in radians per second.
    #[builder(default = 4.0)]
    pub wobble_frequency: f64,
}

impl Default for Preset {
    fn default() -> Self {
        Self::builder().build()
    }
}
