//! Simulation dynamics: external forces, integration, and parallel accumulation.

pub mod forces;
pub mod integrator;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use forces::{DragForce, ForceGenerator, ForceRegistry, GravityForce, WindField};
pub use integrator::Integrator;
