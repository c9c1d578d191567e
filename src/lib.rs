//! Cloth Engine – mass-spring cloth simulation for Rust.
//!
//! A cloth is built from any polygon mesh exposed through [`MeshTopology`]:
//! every vertex becomes a [`Particle`], every unique edge a structural
//! [`SpringConstraint`] and every quad diagonal a shear spring. The
//! [`ClothSolver`] then steps the sheet under gravity (and optionally wind),
//! and hands back positions in mesh vertex order for rendering.

pub mod cloth;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;

pub use glam::Vec3;

pub use cloth::ClothSolver;
pub use config::ClothConfig;
pub use crate::core::{
    bending::BendingConstraint,
    constraints::{Constraint, ForceContribution, ParticleConstraint},
    mesh::{Aabb, GroupKind, MeshBuilder, MeshTopology, PolygonMesh, VertexGroup},
    particle::Particle,
    spring::{SpringConstraint, SpringKind},
    topology::{EdgeKey, Topology},
    types::{CoefficientTable, SpringCoefficients, SpringType},
};
pub use dynamics::{
    forces::{DragForce, ForceGenerator, ForceRegistry, GravityForce, WindField},
    integrator::Integrator,
};
pub use error::{ClothError, ClothResult, MeshError};
pub use utils::{profiling::StepProfiler, random::WindRng};

/// High-level wrapper that drives a [`ClothSolver`] at a fixed timestep.
#[derive(Debug)]
pub struct ClothEngine {
    solver: ClothSolver,
    time_step: f32,
    time_accumulated: f32,
}

impl ClothEngine {
    /// Wraps a solver, stepping it with the solver's configured time step.
    pub fn new(solver: ClothSolver) -> Self {
        let configured = solver.config().time_step;
        let time_step = if configured > 0.0 {
            configured
        } else {
            config::DEFAULT_TIME_STEP
        };
        Self {
            solver,
            time_step,
            time_accumulated: 0.0,
        }
    }

    /// Consumes frame time in fixed steps and returns how many were taken.
    ///
    /// Leftover time is carried to the next call; steps beyond the configured
    /// per-frame maximum are dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return 0;
        }

        self.time_accumulated += frame_dt;
        let max_steps = self.solver.config().max_steps_per_frame.max(1);
        let mut steps = 0;
        while self.time_accumulated >= self.time_step && steps < max_steps {
            self.time_accumulated -= self.time_step;
            self.solver.step(self.time_step);
            steps += 1;
        }

        if self.time_accumulated >= self.time_step {
            log::warn!(
                "cloth fell behind by {:.1} ms, dropping backlog",
                self.time_accumulated * 1000.0
            );
            self.time_accumulated %= self.time_step;
        }
        steps
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn solver(&self) -> &ClothSolver {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut ClothSolver {
        &mut self.solver
    }

    pub fn into_solver(self) -> ClothSolver {
        self.solver
    }
}
