//! A single bubble: where it is, where it's going, and how it disappears.

use rand::Rng;

use palette::WithAlpha as _;

use super::bounds::Bounds;
use crate::canvas::Canvas;
use crate::config::preset::Preset;

/// The four directions a particle can set off in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Direction {
    /// Towards the top of the surface.
    Up,
    /// Towards the bottom of the surface.
    Down,
    /// Towards the left of the surface.
    Left,
    /// Towards the right of the surface.
    Right,
}

impl rand::distributions::Distribution<Direction> for rand::distributions::Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        match rng.gen_range(0u8..4u8) {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}

impl Direction {
    /// A velocity of the given speed in this direction. Screen coordinates, so up is negative.
    #[must_use]
    pub fn velocity(self, speed: f64) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -speed),
            Self::Down => (0.0, speed),
            Self::Left => (-speed, 0.0),
            Self::Right => (speed, 0.0),
        }
    }
}

/// How a particle visually leaves the scene as it ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Disappearance {
    /// Becomes more and more transparent.
    #[default]
    Fade,
    /// Gets smaller and smaller.
    Shrink,
}

/// What a particle looks like at a given moment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A circle only needs a size and an opacity"
)]
pub struct Appearance {
    /// Radius in logical pixels.
    pub radius: f64,
    /// Opacity from 0 to 1.
    pub alpha: f64,
}

/// A single particle.
#[derive(bon::Builder, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Particle {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Horizontal base velocity, in pixels per second.
    #[builder(default)]
    pub vx: f64,
    /// Vertical base velocity, in pixels per second.
    #[builder(default)]
    pub vy: f64,
    /// The radius at birth, in pixels. Shrinking particles head towards 0.
    pub radius: f64,
    /// How many seconds the particle lives for.
    pub lifetime: f64,
    /// How many seconds the particle has been alive.
    #[builder(default)]
    pub age: f64,
    /// How the particle disappears.
    #[builder(default)]
    pub mode: Disappearance,
    /// Offsets the wobble so that particles don't all wobble in unison.
    #[builder(default)]
    pub phase: f64,
}

impl Particle {
    /// Create a brand new particle somewhere random inside the bounds.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, preset: &Preset, bounds: &Bounds) -> Self {
        let diameter = pick_diameter(rng, &preset.diameters_mm);
        let radius = crate::utils::mm_to_px(diameter) / 2.0;

        let x = crate::utils::uniform(rng, bounds.left, bounds.right);
        let y = crate::utils::uniform(rng, bounds.top, bounds.bottom);

        let lifetime = preset.lifetime.sample(rng);

        let mode = if rng.gen::<f64>() < preset.disappearance.fade_probability() {
            Disappearance::Fade
        } else {
            Disappearance::Shrink
        };

        let direction: Direction = rng.gen();
        let speed = preset.speed.sample(rng);
        let (vx, vy) = direction.velocity(speed);

        let phase = rng.gen::<f64>() * std::f64::consts::TAU;

        Self {
            x,
            y,
            vx,
            vy,
            radius,
            lifetime,
            age: 0.0,
            mode,
            phase,
        }
    }

    /// Is the particle still alive?
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Move and age the particle by one frame. Returns whether it's still alive afterwards.
    ///
    /// `clock` is the simulation's global time in seconds, it drives the wobble.
    pub fn update(&mut self, delta: f64, bounds: &Bounds, clock: f64, preset: &Preset) -> bool {
        let angle = clock * preset.wobble_frequency + self.phase;
        let wobble_x = angle.sin() * preset.wobble_strength;
        let wobble_y = angle.cos() * preset.wobble_strength;

        self.x += (self.vx + wobble_x) * delta;
        self.y += (self.vy + wobble_y) * delta;

        if self.x < bounds.left {
            self.x = bounds.left;
            self.vx = self.vx.abs();
        }
        if self.x > bounds.right {
            self.x = bounds.right;
            self.vx = -self.vx.abs();
        }
        if self.y < bounds.top {
            self.y = bounds.top;
            self.vy = self.vy.abs();
        }
        if self.y > bounds.bottom {
            self.y = bounds.bottom;
            self.vy = -self.vy.abs();
        }

        self.age += delta;
        self.is_alive()
    }

    /// How far through its life the particle is, from 0 to 1.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// The particle's current size and opacity. `None` when it wouldn't be visible anyway.
    #[must_use]
    pub fn appearance(&self, preset: &Preset) -> Option<Appearance> {
        let progress = self.progress();
        let (radius, alpha) = match self.mode {
            Disappearance::Fade => (
                self.radius,
                crate::utils::lerp(preset.alpha_start, preset.alpha_end, progress),
            ),
            Disappearance::Shrink => (
                crate::utils::lerp(self.radius, 0.0, progress),
                preset.alpha_start,
            ),
        };

        if radius <= 0.0 || alpha <= 0.0 {
            return None;
        }
        Some(Appearance { radius, alpha })
    }

    /// Draw the particle. Only the alpha of the preset's colour changes.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, preset: &Preset) {
        let Some(appearance) = self.appearance(preset) else {
            return;
        };

        #[expect(
            clippy::as_conversions,
            clippy::cast_possible_truncation,
            reason = "Colour channels are `f32`, and alpha is always within 0 to 1 here"
        )]
        let alpha = appearance.alpha.min(1.0) as f32;
        let colour = preset.colour.with_alpha(alpha);
        canvas.fill_circle(self.x, self.y, appearance.radius, colour);
    }
}

/// Pick one of the diameters. An empty set gives 0, so the particle is never drawn.
fn pick_diameter<R: Rng + ?Sized>(rng: &mut R, diameters: &[f64]) -> f64 {
    use rand::seq::SliceRandom as _;
    diameters.choose(rng).copied().unwrap_or(0.0)
}
