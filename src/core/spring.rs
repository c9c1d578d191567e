use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::constraints::{ForceContribution, ParticleConstraint};
use super::particle::Particle;
use super::types::SpringCoefficients;
use crate::utils::math::direction_and_length;

/// How a spring was created; fixed for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringKind {
    /// Mesh edge; switches between tension and compression coefficients.
    Structural,
    /// Quad diagonal.
    Shear,
}

/// Hookean spring between two particles with asymmetric tension/compression response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpringConstraint {
    indices: [usize; 2],
    rest_length: f32,
    kind: SpringKind,
    tension: SpringCoefficients,
    compression: SpringCoefficients,
    stretch_limit: Option<f32>,
}

impl SpringConstraint {
    /// Builds a spring whose rest length is the current separation of `a` and `b`.
    ///
    /// Returns `None` when the particles are coincident.
    pub fn new(
        particles: &[Particle],
        a: usize,
        b: usize,
        kind: SpringKind,
        tension: SpringCoefficients,
        compression: SpringCoefficients,
    ) -> Option<Self> {
        let rest_length = particles[a].position.distance(particles[b].position);
        if rest_length <= f32::EPSILON {
            return None;
        }
        Some(Self {
            indices: [a, b],
            rest_length,
            kind,
            tension,
            compression,
            stretch_limit: None,
        })
    }

    /// Spring using the same coefficients in both directions.
    pub fn symmetric(
        particles: &[Particle],
        a: usize,
        b: usize,
        kind: SpringKind,
        coefficients: SpringCoefficients,
    ) -> Option<Self> {
        Self::new(particles, a, b, kind, coefficients, coefficients)
    }

    pub fn with_stretch_limit(mut self, limit: Option<f32>) -> Self {
        self.stretch_limit = limit;
        self
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.indices[0], self.indices[1])
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn kind(&self) -> SpringKind {
        self.kind
    }

    pub fn tension(&self) -> SpringCoefficients {
        self.tension
    }

    pub fn compression(&self) -> SpringCoefficients {
        self.compression
    }

    pub fn set_tension(&mut self, coefficients: SpringCoefficients) {
        self.tension = coefficients;
    }

    pub fn set_compression(&mut self, coefficients: SpringCoefficients) {
        self.compression = coefficients;
    }

    pub fn current_length(&self, particles: &[Particle]) -> f32 {
        let (a, b) = self.endpoints();
        particles[a].position.distance(particles[b].position)
    }

    /// Signed deformation: positive when stretched, negative when compressed.
    pub fn deformation(&self, particles: &[Particle]) -> f32 {
        self.current_length(particles) - self.rest_length
    }

    fn coefficients_for(&self, deformation: f32) -> SpringCoefficients {
        if deformation > 0.0 {
            self.tension
        } else {
            self.compression
        }
    }
}

impl ParticleConstraint for SpringConstraint {
    fn evaluate(&self, particles: &[Particle]) -> ForceContribution {
        let mut contribution = ForceContribution::new();
        let (a, b) = self.endpoints();
        let (pa, pb) = (&particles[a], &particles[b]);

        let Some((direction, length)) = direction_and_length(pb.position - pa.position) else {
            return contribution;
        };

        let deformation = length - self.rest_length;
        if deformation == 0.0 {
            return contribution;
        }

        let coefficients = self.coefficients_for(deformation);
        let relative_speed = (pb.velocity() - pa.velocity()).dot(direction);
        let magnitude =
            coefficients.stiffness * deformation + coefficients.damping * relative_speed;
        let force = direction * magnitude;

        if pa.is_movable() {
            contribution.push(a, force);
        }
        if pb.is_movable() {
            contribution.push(b, -force);
        }
        contribution
    }

    fn satisfy(&self, particles: &mut [Particle]) {
        let Some(limit) = self.stretch_limit else {
            return;
        };

        let (a, b) = self.endpoints();
        let Some((direction, length)) =
            direction_and_length(particles[b].position - particles[a].position)
        else {
            return;
        };

        let max_length = self.rest_length * limit;
        if length <= max_length {
            return;
        }

        let excess = length - max_length;
        match (particles[a].is_movable(), particles[b].is_movable()) {
            (true, true) => {
                particles[a].offset(direction * (excess * 0.5));
                particles[b].offset(-direction * (excess * 0.5));
            }
            (true, false) => particles[a].offset(direction * excess),
            (false, true) => particles[b].offset(-direction * excess),
            (false, false) => {}
        }
    }

    fn set_stiffness(&mut self, stiffness: f32) {
        debug_assert!(stiffness >= 0.0, "stiffness must be non-negative");
        self.tension.stiffness = stiffness;
        self.compression.stiffness = stiffness;
    }

    fn set_damping(&mut self, damping: f32) {
        debug_assert!(damping >= 0.0, "damping must be non-negative");
        self.tension.damping = damping;
        self.compression.damping = damping;
    }

    fn particle_indices(&self) -> &[usize] {
        &self.indices
    }
}
