use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Point mass integrated with time-corrected Verlet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub previous_position: Vec3,
    pub force: Vec3,
    mass: f32,
    movable: bool,
    /// Step length of the last integration, `None` while the particle is at rest.
    last_dt: Option<f32>,
}

impl Particle {
    /// Creates a movable particle at rest.
    ///
    /// # Panics
    /// Panics if `mass` is not a positive finite number.
    pub fn new(position: Vec3, mass: f32) -> Self {
        assert!(
            mass.is_finite() && mass > 0.0,
            "particle mass must be positive, got {mass}"
        );
        Self {
            position,
            previous_position: position,
            force: Vec3::ZERO,
            mass,
            movable: true,
            last_dt: None,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    /// Anchors the particle and drops its motion history.
    pub fn pin(&mut self) {
        self.movable = false;
        self.previous_position = self.position;
        self.last_dt = None;
    }

    pub fn unpin(&mut self) {
        self.movable = true;
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn reset_force(&mut self) {
        self.force = Vec3::ZERO;
    }

    /// Implicit velocity as the displacement of the last step, not divided by `dt`.
    ///
    /// Damping coefficients are calibrated against this per-step value.
    pub fn velocity(&self) -> Vec3 {
        self.position - self.previous_position
    }

    /// Moves the particle without touching its motion history.
    pub fn offset(&mut self, delta: Vec3) {
        if self.movable {
            self.position += delta;
        }
    }

    /// Advances the particle by `dt` using the accumulated force.
    pub fn integrate(&mut self, dt: f32) {
        if !self.movable {
            return;
        }

        let acceleration = self.force / self.mass;
        let current = self.position;
        let displacement = match self.last_dt {
            Some(last_dt) if last_dt > 0.0 => {
                (current - self.previous_position) * (dt / last_dt)
                    + acceleration * dt * (dt + last_dt) * 0.5
            }
            _ => acceleration * dt * dt * 0.5,
        };

        self.previous_position = current;
        self.position = current + displacement;
        self.last_dt = Some(dt);
    }
}
