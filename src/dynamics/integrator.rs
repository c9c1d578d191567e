use crate::core::particle::Particle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Integrator responsible for stepping cloth particles forward in time.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    parallel: bool,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn step(&self, particles: &mut [Particle], dt: f32) {
        if self.parallel {
            Self::step_parallel(particles, dt);
        } else {
            for particle in particles.iter_mut() {
                particle.integrate(dt);
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn step_parallel(particles: &mut [Particle], dt: f32) {
        particles
            .par_iter_mut()
            .for_each(|particle| particle.integrate(dt));
    }

    #[cfg(not(feature = "parallel"))]
    fn step_parallel(particles: &mut [Particle], dt: f32) {
        for particle in particles.iter_mut() {
            particle.integrate(dt);
        }
    }
}
