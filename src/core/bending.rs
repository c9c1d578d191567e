use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::constraints::{ForceContribution, ParticleConstraint};
use super::particle::Particle;
use super::types::SpringCoefficients;

/// Hinge penalty over three particles `a - b - c` resisting folding at `b`.
///
/// The pivot `b` is pulled towards its rest offset from the midpoint of `a` and
/// `c`; the reaction is split evenly between the outer particles so the net
/// force on the triplet stays zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BendingConstraint {
    indices: [usize; 3],
    rest_offset: Vec3,
    coefficients: SpringCoefficients,
}

impl BendingConstraint {
    pub fn new(
        particles: &[Particle],
        a: usize,
        b: usize,
        c: usize,
        coefficients: SpringCoefficients,
    ) -> Self {
        let rest_offset = particles[b].position - midpoint(&particles[a], &particles[c]);
        Self {
            indices: [a, b, c],
            rest_offset,
            coefficients,
        }
    }

    pub fn pivot(&self) -> usize {
        self.indices[1]
    }

    pub fn outer(&self) -> (usize, usize) {
        (self.indices[0], self.indices[2])
    }

    pub fn coefficients(&self) -> SpringCoefficients {
        self.coefficients
    }

    pub fn set_coefficients(&mut self, coefficients: SpringCoefficients) {
        self.coefficients = coefficients;
    }

    /// Displacement of the pivot away from its rest placement.
    pub fn deviation(&self, particles: &[Particle]) -> Vec3 {
        let [a, b, c] = self.indices;
        particles[b].position - midpoint(&particles[a], &particles[c]) - self.rest_offset
    }
}

fn midpoint(a: &Particle, c: &Particle) -> Vec3 {
    (a.position + c.position) * 0.5
}

impl ParticleConstraint for BendingConstraint {
    fn evaluate(&self, particles: &[Particle]) -> ForceContribution {
        let mut contribution = ForceContribution::new();
        let [a, b, c] = self.indices;

        let deviation = self.deviation(particles);
        let relative_velocity =
            particles[b].velocity() - (particles[a].velocity() + particles[c].velocity()) * 0.5;

        let force_b = -deviation * self.coefficients.stiffness
            - relative_velocity * self.coefficients.damping;
        if force_b == Vec3::ZERO {
            return contribution;
        }

        let reaction = -force_b * 0.5;
        if particles[a].is_movable() {
            contribution.push(a, reaction);
        }
        if particles[b].is_movable() {
            contribution.push(b, force_b);
        }
        if particles[c].is_movable() {
            contribution.push(c, reaction);
        }
        contribution
    }

    fn set_stiffness(&mut self, stiffness: f32) {
        debug_assert!(stiffness >= 0.0, "stiffness must be non-negative");
        self.coefficients.stiffness = stiffness;
    }

    fn set_damping(&mut self, damping: f32) {
        debug_assert!(damping >= 0.0, "damping must be non-negative");
        self.coefficients.damping = damping;
    }

    fn particle_indices(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line() -> Vec<Particle> {
        vec![
            Particle::new(Vec3::new(-1.0, 0.0, 0.0), 1.0),
            Particle::new(Vec3::ZERO, 1.0),
            Particle::new(Vec3::new(1.0, 0.0, 0.0), 1.0),
        ]
    }

    #[test]
    fn rest_configuration_is_force_free() {
        let particles = straight_line();
        let constraint =
            BendingConstraint::new(&particles, 0, 1, 2, SpringCoefficients::new(0.45, 0.55));

        assert!(constraint.evaluate(&particles).is_empty());
    }

    #[test]
    fn folded_pivot_is_pushed_back_and_momentum_is_conserved() {
        let mut particles = straight_line();
        let constraint =
            BendingConstraint::new(&particles, 0, 1, 2, SpringCoefficients::new(2.0, 0.0));
        particles[1].position.y = 0.5;

        let contribution = constraint.evaluate(&particles);
        let total: Vec3 = contribution.iter().map(|(_, f)| *f).sum();
        let pivot = contribution
            .iter()
            .find(|(i, _)| *i == 1)
            .map(|(_, f)| *f)
            .expect("pivot force");

        assert!((pivot.y + 1.0).abs() < 1e-6);
        assert!(total.length() < 1e-6);
    }

    #[test]
    fn moving_pivot_is_damped_against_its_motion() {
        let mut particles = straight_line();
        let constraint =
            BendingConstraint::new(&particles, 0, 1, 2, SpringCoefficients::new(2.0, 4.0));
        particles[1].previous_position.y = -0.1;

        let contribution = constraint.evaluate(&particles);
        let forces: Vec<_> = contribution.iter().copied().collect();

        // zero deviation, relative velocity 0.1 up: force_b = -4.0 * 0.1
        assert_eq!(forces.len(), 3);
        assert_eq!(forces[1].0, 1);
        assert!((forces[1].1.y + 0.4).abs() < 1e-6);
        assert!((forces[0].1.y - 0.2).abs() < 1e-6);
        assert!((forces[2].1.y - 0.2).abs() < 1e-6);
    }
}
