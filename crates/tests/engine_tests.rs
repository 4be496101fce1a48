//! Long running tests of the particle engine on its own, without a terminal.
#[cfg(test)]
mod engine {
    use rand::{Rng as _, SeedableRng as _};

    use bubbles::config::preset::{Area, Preset};
    use bubbles::parameters::Parameters;
    use bubbles::simulation::bounds::Bounds;
    use bubbles::simulation::engine::Engine;
    use bubbles::simulation::particle::{Disappearance, Particle};

    fn engine(seed: u64, parameters: Parameters) -> Engine<rand::rngs::StdRng> {
        Engine::new(
            Preset::default(),
            parameters,
            rand::rngs::StdRng::seed_from_u64(seed),
        )
    }

    fn bounds() -> Bounds {
        Bounds::resolve(1920.0, 1080.0, Area::RightStrip, 795.0)
    }

    #[test]
    fn right_strip_on_a_wide_surface() {
        let bounds = bounds();
        assert!((bounds.left - 1125.0).abs() < f64::EPSILON);
        assert!((bounds.right - 1920.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_particle_outlives_its_lifetime() {
        let mut engine = engine(1, Parameters::default());
        let mut frame_rng = rand::rngs::StdRng::seed_from_u64(2);
        let bounds = bounds();

        for _ in 0..3_000 {
            let delta = frame_rng.gen_range(0.0..0.05);
            engine.advance(delta, &bounds);
            for particle in engine.particles() {
                assert!(particle.age >= 0.0);
                assert!(particle.age < particle.lifetime);
            }
        }
    }

    #[test]
    fn particles_never_leave_their_bounds() {
        let mut engine = engine(3, Parameters::default());
        let bounds = bounds();

        for _ in 0..2_000 {
            engine.advance(1.0 / 30.0, &bounds);
            for particle in engine.particles() {
                assert!(
                    bounds.contains(particle.x, particle.y),
                    "{particle:?} escaped {bounds:?}"
                );
            }
        }
    }

    #[test]
    fn particles_at_an_edge_head_back_inside() {
        let mut engine = engine(4, Parameters::default());
        let bounds = bounds();

        for _ in 0..1_000 {
            engine.advance(0.05, &bounds);
            for particle in engine.particles() {
                if (particle.x - bounds.left).abs() < f64::EPSILON {
                    assert!(particle.vx >= 0.0);
                }
                if (particle.x - bounds.right).abs() < f64::EPSILON {
                    assert!(particle.vx <= 0.0);
                }
                if particle.y.abs() < f64::EPSILON {
                    assert!(particle.vy >= 0.0);
                }
                if (particle.y - bounds.bottom).abs() < f64::EPSILON {
                    assert!(particle.vy <= 0.0);
                }
            }
        }
    }

    #[test]
    fn emission_keeps_up_with_the_rate() {
        let rate = 80.0;
        let mut engine = engine(5, Parameters::with_emit_frequency(rate));
        let mut frame_rng = rand::rngs::StdRng::seed_from_u64(6);
        let bounds = bounds();

        let mut elapsed = 0.0;
        let mut emitted = 0;
        for _ in 0..2_000 {
            let delta = frame_rng.gen_range(0.001..0.05);
            elapsed += delta;
            emitted += engine.advance(delta, &bounds).emitted;

            #[expect(
                clippy::as_conversions,
                clippy::cast_precision_loss,
                reason = "Counts are small"
            )]
            let difference = (emitted as f64 - rate * elapsed).abs();
            assert!(difference <= 1.0 + 1e-6, "off by {difference}");
        }
    }

    #[test]
    fn nothing_is_emitted_at_a_zero_rate() {
        let mut engine = engine(7, Parameters::with_emit_frequency(0.0));
        let bounds = bounds();
        for _ in 0..100 {
            assert_eq!(engine.advance(0.05, &bounds).emitted, 0);
        }
        assert!(engine.particles().is_empty());
    }

    #[test]
    fn fading_particle_keeps_its_size() {
        let preset = Preset::default();
        let bounds = bounds();
        let mut particle = Particle::builder()
            .x(1500.0)
            .y(500.0)
            .radius(10.0)
            .lifetime(2.0)
            .mode(Disappearance::Fade)
            .build();

        let mut previous_alpha = f64::INFINITY;
        while particle.update(0.1, &bounds, 0.0, &preset) {
            let appearance = particle.appearance(&preset).unwrap();
            assert!((appearance.radius - 10.0).abs() < f64::EPSILON);
            assert!(appearance.alpha <= previous_alpha);
            previous_alpha = appearance.alpha;
        }
        assert!(particle.appearance(&preset).is_none());
    }

    #[test]
    fn shrinking_particle_keeps_its_opacity() {
        let preset = Preset::default();
        let bounds = bounds();
        let mut particle = Particle::builder()
            .x(1500.0)
            .y(500.0)
            .radius(10.0)
            .lifetime(2.0)
            .mode(Disappearance::Shrink)
            .build();

        let mut previous_radius = f64::INFINITY;
        while particle.update(0.1, &bounds, 0.0, &preset) {
            let appearance = particle.appearance(&preset).unwrap();
            assert!((appearance.alpha - preset.alpha_start).abs() < f64::EPSILON);
            assert!(appearance.radius <= previous_radius);
            previous_radius = appearance.radius;
        }
        assert!(particle.appearance(&preset).is_none());
    }
}
