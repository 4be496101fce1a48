//! Starting the engine and driving it frame by frame.

use rand::Rng;

use crate::canvas::{Canvas, Host, SurfaceManager, SURFACE_ID};
use crate::config::preset::Preset;
use crate::parameters::ParameterSource;
use crate::simulation::engine::{Engine, Tick};

/// The longest step the simulation will take in a single frame, in seconds. Long gaps between
/// frames (a suspended process, a slow terminal) are integrated as if they were this long.
pub const MAX_FRAME_DELTA: f64 = 0.05;

/// Makes sure that the animation is only ever started once.
///
/// The composition root creates exactly one of these and passes it to anything that might start
/// the animation.
#[derive(Debug, Default)]
pub struct Lifecycle {
    /// Whether an animation has been started.
    is_started: std::sync::atomic::AtomicBool,
}

impl Lifecycle {
    /// Instantiate
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_started: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Try to be the one that starts the animation. Only the first caller gets `true`.
    pub fn claim(&self) -> bool {
        !self
            .is_started
            .swap(true, std::sync::atomic::Ordering::SeqCst)
    }

    /// Has an animation already been started?
    pub fn is_started(&self) -> bool {
        self.is_started.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Measures the time between frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// When the previous frame happened.
    last: tokio::time::Instant,
}

impl FrameClock {
    /// Start measuring from `now`.
    #[must_use]
    pub const fn new(now: tokio::time::Instant) -> Self {
        Self { last: now }
    }

    /// Seconds since the previous frame, capped at [`MAX_FRAME_DELTA`].
    pub fn tick(&mut self, now: tokio::time::Instant) -> f64 {
        let gap = now.saturating_duration_since(self.last).as_secs_f64();
        self.last = now;
        gap.min(MAX_FRAME_DELTA)
    }
}

/// A running animation: the engine, the surface it draws on, and the frame clock.
#[derive(Debug)]
pub struct Animation<C: Canvas, R: Rng> {
    /// The surface being drawn on.
    surface: SurfaceManager<C>,
    /// The particle simulation.
    engine: Engine<R>,
    /// Time between frames.
    clock: FrameClock,
}

impl<C: Canvas, R: Rng> Animation<C, R> {
    /// Find the surface, load the parameters and get ready for the first frame.
    ///
    /// Returns `None`, doing nothing at all, when an animation has already been started with this
    /// lifecycle or when the host doesn't have the surface.
    pub async fn start<H: Host<Canvas = C>>(
        lifecycle: &Lifecycle,
        host: &mut H,
        source: &ParameterSource,
        preset: Preset,
        rng: R,
    ) -> Option<Self> {
        if !lifecycle.claim() {
            tracing::debug!("Animation already started, not starting another one");
            return None;
        }

        let Some(canvas) = host.find_surface(SURFACE_ID) else {
            tracing::debug!("No '{SURFACE_ID}' surface, nothing to animate");
            return None;
        };

        let surface = SurfaceManager::new(canvas);
        let clock = FrameClock::new(tokio::time::Instant::now());
        let parameters = source.load(preset.emit_per_second).await;
        let engine = Engine::new(preset, parameters, rng);

        tracing::debug!(
            "Animation started, emitting {} particles per second",
            engine.emit_rate()
        );
        Some(Self {
            surface,
            engine,
            clock,
        })
    }

    /// Draw the next frame.
    pub fn frame(&mut self, now: tokio::time::Instant) -> Tick {
        let delta = self.clock.tick(now);
        self.engine.step(delta, &mut self.surface)
    }

    /// The host's surface changed size.
    pub fn resize(&mut self) {
        self.surface.sync();
    }

    /// The particle simulation.
    #[must_use]
    pub const fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    /// The particle simulation, mutably.
    pub const fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }

    /// The surface being drawn on.
    #[must_use]
    pub const fn surface(&self) -> &SurfaceManager<C> {
        &self.surface
    }

    /// The surface being drawn on, mutably.
    pub const fn surface_mut(&mut self) -> &mut SurfaceManager<C> {
        &mut self.surface
    }
}
