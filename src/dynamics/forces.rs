use glam::Vec3;

use crate::core::particle::Particle;
use crate::utils::random::WindRng;

/// Trait describing an external force applied to cloth particles.
pub trait ForceGenerator: Send + Sync {
    fn apply(&self, particle: &mut Particle, dt: f32);
}

/// Constant gravity scaled by particle mass.
///
/// Applied to pinned particles as well; integration ignores them.
#[derive(Debug, Clone, Copy)]
pub struct GravityForce {
    pub gravity: Vec3,
}

impl GravityForce {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl ForceGenerator for GravityForce {
    fn apply(&self, particle: &mut Particle, _dt: f32) {
        particle.apply_force(self.gravity * particle.mass());
    }
}

/// Slowly drifting wind vector built from random perturbations.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindField {
    force: Vec3,
    pressure: f32,
}

impl WindField {
    pub fn new(pressure: f32) -> Self {
        Self {
            force: Vec3::ZERO,
            pressure,
        }
    }

    /// Adds one random perturbation of magnitude `pressure`.
    pub fn update(&mut self, rng: &mut WindRng) {
        self.force += rng.point_on_sphere(self.pressure);
    }

    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn reset(&mut self) {
        self.force = Vec3::ZERO;
    }
}

impl ForceGenerator for WindField {
    fn apply(&self, particle: &mut Particle, _dt: f32) {
        if particle.is_movable() {
            particle.apply_force(self.force);
        }
    }
}

/// Quadratic air drag resisting particle motion.
#[derive(Debug, Clone, Copy)]
pub struct DragForce {
    pub drag_coefficient: f32,
}

impl DragForce {
    pub fn new(drag_coefficient: f32) -> Self {
        Self { drag_coefficient }
    }
}

impl ForceGenerator for DragForce {
    fn apply(&self, particle: &mut Particle, _dt: f32) {
        if !particle.is_movable() {
            return;
        }

        let velocity = particle.velocity();
        let speed = velocity.length();
        if speed < 1e-6 {
            return;
        }

        let drag = -velocity * speed * self.drag_coefficient;
        particle.apply_force(drag);
    }
}

/// User supplied forces applied after gravity and wind.
pub struct ForceRegistry {
    forces: Vec<Box<dyn ForceGenerator>>,
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceRegistry")
            .field("forces", &self.forces.len())
            .finish()
    }
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.push(Box::new(force));
    }

    pub fn clear(&mut self) {
        self.forces.clear();
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn apply_all(&self, particles: &mut [Particle], dt: f32) {
        for force in &self.forces {
            for particle in particles.iter_mut() {
                force.apply(particle, dt);
            }
        }
    }
}
