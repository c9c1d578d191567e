//! Data-parallel constraint force accumulation.
//!
//! Constraints sharing a particle cannot add into its accumulator
//! concurrently, so each rayon worker folds into its own force buffer and the
//! buffers are summed afterwards.

use glam::Vec3;
use rayon::prelude::*;

use crate::core::constraints::{Constraint, ParticleConstraint};
use crate::core::particle::Particle;

/// Evaluates all constraints in parallel and adds the reduced forces to the particles.
pub fn accumulate_constraint_forces(constraints: &[Constraint], particles: &mut [Particle]) {
    let count = particles.len();
    let snapshot: &[Particle] = particles;

    let forces = constraints
        .par_iter()
        .fold(
            || vec![Vec3::ZERO; count],
            |mut buffer, constraint| {
                constraint.evaluate(snapshot).accumulate(&mut buffer);
                buffer
            },
        )
        .reduce(
            || vec![Vec3::ZERO; count],
            |mut lhs, rhs| {
                for (l, r) in lhs.iter_mut().zip(rhs) {
                    *l += r;
                }
                lhs
            },
        );

    for (particle, force) in particles.iter_mut().zip(forces) {
        particle.apply_force(force);
    }
}
