//! Core types: particles, constraints, mesh input, and spring topology.

pub mod bending;
pub mod constraints;
pub mod mesh;
pub mod particle;
pub mod spring;
pub mod topology;
pub mod types;

pub use bending::BendingConstraint;
pub use constraints::{Constraint, ForceContribution, ParticleConstraint};
pub use mesh::{Aabb, GroupKind, MeshBuilder, MeshTopology, PolygonMesh, VertexGroup};
pub use particle::Particle;
pub use spring::{SpringConstraint, SpringKind};
pub use topology::{EdgeKey, Topology};
pub use types::{CoefficientTable, SpringCoefficients, SpringType};
