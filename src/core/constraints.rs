use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bending::BendingConstraint;
use super::particle::Particle;
use super::spring::{SpringConstraint, SpringKind};

/// Maximum number of particles a single constraint touches.
pub const MAX_CONSTRAINT_PARTICLES: usize = 3;

/// Forces produced by one constraint evaluation, keyed by particle index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceContribution {
    entries: [(usize, Vec3); MAX_CONSTRAINT_PARTICLES],
    len: usize,
}

impl ForceContribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, force: Vec3) {
        debug_assert!(self.len < MAX_CONSTRAINT_PARTICLES);
        self.entries[self.len] = (index, force);
        self.len += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, Vec3)> {
        self.entries[..self.len].iter()
    }

    /// Adds every entry to the matching particle accumulator.
    pub fn apply(&self, particles: &mut [Particle]) {
        for &(index, force) in self.iter() {
            particles[index].apply_force(force);
        }
    }

    /// Adds every entry to a detached force buffer.
    pub fn accumulate(&self, buffer: &mut [Vec3]) {
        for &(index, force) in self.iter() {
            buffer[index] += force;
        }
    }
}

/// Force law acting on a handful of particles addressed by index.
pub trait ParticleConstraint {
    /// Computes the instantaneous forces without touching the particles.
    fn evaluate(&self, particles: &[Particle]) -> ForceContribution;

    /// Optional position correction run after force accumulation.
    fn satisfy(&self, _particles: &mut [Particle]) {}

    fn set_stiffness(&mut self, stiffness: f32);

    fn set_damping(&mut self, damping: f32);

    /// Indices of the particles this constraint reads.
    fn particle_indices(&self) -> &[usize];

    fn calculate_force(&self, particles: &mut [Particle]) {
        let contribution = self.evaluate(particles);
        contribution.apply(particles);
    }
}

/// Constraint variants owned by a cloth solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constraint {
    Spring(SpringConstraint),
    Bending(BendingConstraint),
}

impl Constraint {
    pub fn as_spring(&self) -> Option<&SpringConstraint> {
        match self {
            Constraint::Spring(spring) => Some(spring),
            Constraint::Bending(_) => None,
        }
    }

    pub fn as_bending(&self) -> Option<&BendingConstraint> {
        match self {
            Constraint::Bending(bending) => Some(bending),
            Constraint::Spring(_) => None,
        }
    }

    pub fn is_spring_of(&self, kind: SpringKind) -> bool {
        matches!(self, Constraint::Spring(spring) if spring.kind() == kind)
    }

    fn inner(&self) -> &dyn ParticleConstraint {
        match self {
            Constraint::Spring(spring) => spring,
            Constraint::Bending(bending) => bending,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ParticleConstraint {
        match self {
            Constraint::Spring(spring) => spring,
            Constraint::Bending(bending) => bending,
        }
    }
}

impl ParticleConstraint for Constraint {
    fn evaluate(&self, particles: &[Particle]) -> ForceContribution {
        self.inner().evaluate(particles)
    }

    fn satisfy(&self, particles: &mut [Particle]) {
        self.inner().satisfy(particles);
    }

    fn set_stiffness(&mut self, stiffness: f32) {
        self.inner_mut().set_stiffness(stiffness);
    }

    fn set_damping(&mut self, damping: f32) {
        self.inner_mut().set_damping(damping);
    }

    fn particle_indices(&self) -> &[usize] {
        match self {
            Constraint::Spring(spring) => spring.particle_indices(),
            Constraint::Bending(bending) => bending.particle_indices(),
        }
    }
}

impl From<SpringConstraint> for Constraint {
    fn from(spring: SpringConstraint) -> Self {
        Constraint::Spring(spring)
    }
}

impl From<BendingConstraint> for Constraint {
    fn from(bending: BendingConstraint) -> Self {
        Constraint::Bending(bending)
    }
}
