//! The engine owns every particle and advances them all, one frame at a time.

use rand::Rng;

use super::bounds::Bounds;
use super::emitter::Emitter;
use super::particle::Particle;
use crate::canvas::{Canvas, SurfaceManager};
use crate::config::preset::Preset;
use crate::parameters::Parameters;

/// What happened during a single step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Tick {
    /// New particles created this step.
    pub emitted: usize,
    /// Particles that died this step.
    pub expired: usize,
    /// Particles still alive after the step.
    pub alive: usize,
}

/// All the state of a running particle simulation.
///
/// The engine doesn't know about real time. Hosts feed it frame deltas with [`Engine::step`],
/// which makes it fully deterministic for a given random source.
#[derive(Debug)]
pub struct Engine<R: Rng> {
    /// The fixed configuration.
    preset: Preset,
    /// The runtime overrides.
    parameters: Parameters,
    /// Every living particle.
    particles: Vec<Particle>,
    /// Turns the emission rate into whole particles.
    emitter: Emitter,
    /// Simulated seconds since the engine started.
    clock: f64,
    /// Where all the randomness comes from.
    rng: R,
}

impl<R: Rng> Engine<R> {
    /// Instantiate
    pub fn new(preset: Preset, parameters: Parameters, rng: R) -> Self {
        Self {
            preset,
            parameters,
            particles: Vec::new(),
            emitter: Emitter::default(),
            clock: 0.0,
            rng,
        }
    }

    /// Advance the simulation by `delta` seconds and draw the result.
    ///
    /// In order: clear the surface, work out the bounds, emit, move everything and drop the dead,
    /// then draw whatever survived.
    pub fn step<C: Canvas>(&mut self, delta: f64, surface: &mut SurfaceManager<C>) -> Tick {
        let (width, height) = surface.logical_size();
        let canvas = surface.canvas_mut();
        canvas.clear(0.0, 0.0, width, height);

        let bounds = Bounds::resolve(width, height, self.preset.area, self.preset.strip_width);
        let tick = self.advance(delta, &bounds);
        self.draw(canvas);

        tracing::trace!("Step of {delta:.4}s: {tick:?}");
        tick
    }

    /// Advance the simulation without drawing anything.
    pub fn advance(&mut self, delta: f64, bounds: &Bounds) -> Tick {
        let delta = delta.max(0.0);
        self.clock += delta;

        let rate = self.emit_rate();
        let emitted = self.emitter.due(rate, delta);
        for _ in 0..emitted {
            let particle = Particle::spawn(&mut self.rng, &self.preset, bounds);
            self.particles.push(particle);
        }

        let before = self.particles.len();
        let clock = self.clock;
        let preset = &self.preset;
        self.particles
            .retain_mut(|particle| particle.update(delta, bounds, clock, preset));
        let alive = self.particles.len();

        Tick {
            emitted,
            expired: before - alive,
            alive,
        }
    }

    /// Draw every living particle.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for particle in &self.particles {
            particle.draw(canvas, &self.preset);
        }
    }

    /// The current emission rate. Re-read on every step so that it can change at runtime.
    #[must_use]
    pub fn emit_rate(&self) -> f64 {
        self.parameters.emit_rate(self.preset.emit_per_second)
    }

    /// Replace the runtime parameters.
    pub const fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    /// The runtime parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The fixed configuration.
    #[must_use]
    pub const fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Every living particle.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Simulated seconds since the engine started.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// The fraction of a particle that will be carried into the next step.
    #[must_use]
    pub const fn leftover(&self) -> f64 {
        self.emitter.leftover()
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng as _;

    use super::*;
    use crate::test_helpers::{Call, RecordingCanvas};

    fn engine(preset: Preset) -> Engine<rand::rngs::StdRng> {
        Engine::new(
            preset,
            Parameters::default(),
            rand::rngs::StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn step_clears_then_draws() {
        let mut engine = engine(Preset::default());
        let mut surface = SurfaceManager::new(RecordingCanvas::new(1920.0, 1080.0, 1.0));

        let tick = engine.step(0.05, &mut surface);
        assert_eq!(tick.emitted, 6);
        assert_eq!(tick.alive, 6);
        assert_eq!(tick.expired, 0);

        let calls = &surface.canvas().calls;
        assert_eq!(calls.first(), Some(&Call::Clear(0.0, 0.0, 1920.0, 1080.0)));
        assert_eq!(surface.canvas().circles().len(), 6);
    }

    #[test]
    fn particles_stay_in_the_right_strip() {
        let mut engine = engine(Preset::default());
        let mut surface = SurfaceManager::new(RecordingCanvas::new(1920.0, 1080.0, 1.0));
        for _ in 0..200 {
            engine.step(0.05, &mut surface);
            for particle in engine.particles() {
                assert!(particle.x >= 1125.0 && particle.x <= 1920.0);
                assert!(particle.y >= 0.0 && particle.y <= 1080.0);
            }
        }
    }

    #[test]
    fn parameters_override_the_preset_rate() {
        let mut engine = engine(Preset::default());
        let bounds = Bounds::resolve(100.0, 100.0, crate::config::preset::Area::FullSurface, 0.0);

        engine.set_parameters(Parameters::with_emit_frequency(20.0));
        assert_eq!(engine.advance(0.5, &bounds).emitted, 10);

        engine.set_parameters(Parameters::with_emit_frequency(-5.0));
        assert_eq!(engine.advance(0.5, &bounds).emitted, 0);

        engine.set_parameters(Parameters::default());
        assert_eq!(engine.advance(0.5, &bounds).emitted, 60);
    }

    #[test]
    fn absurd_rates_cannot_flood_the_engine() {
        let mut engine = engine(Preset::default());
        let bounds = Bounds::resolve(100.0, 100.0, crate::config::preset::Area::FullSurface, 0.0);
        engine.set_parameters(Parameters::with_emit_frequency(1e300));

        let tick = engine.advance(0.05, &bounds);
        assert_eq!(tick.emitted, crate::simulation::emitter::MAX_PER_FRAME);
        assert_eq!(engine.particles().len(), crate::simulation::emitter::MAX_PER_FRAME);
    }

    #[test]
    fn clock_only_moves_forward() {
        let mut engine = engine(Preset::default());
        let bounds = Bounds::resolve(100.0, 100.0, crate::config::preset::Area::FullSurface, 0.0);
        engine.advance(0.02, &bounds);
        engine.advance(-1.0, &bounds);
        assert!((engine.clock() - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn same_seed_same_trajectories() {
        let mut first = engine(Preset::default());
        let mut second = engine(Preset::default());
        let bounds = Bounds::resolve(800.0, 600.0, crate::config::preset::Area::FullSurface, 0.0);
        for _ in 0..50 {
            first.advance(1.0 / 60.0, &bounds);
            second.advance(1.0 / 60.0, &bounds);
        }
        assert_eq!(first.particles(), second.particles());
    }
}
