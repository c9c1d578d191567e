use thiserror::Error;

/// Errors raised while assembling a polygon mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("face {face} has {corners} corners, at least 3 are required")]
    DegenerateFace { face: usize, corners: usize },
    #[error("group '{name}' references vertex {index} but the mesh has {vertex_count} vertices")]
    GroupIndexOutOfRange {
        name: String,
        index: u32,
        vertex_count: usize,
    },
}

/// Errors surfaced by the cloth solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    #[error("total mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("cannot build a cloth from a mesh without vertices")]
    EmptyMesh,
    #[error("mesh references vertex {index} but only {vertex_count} exist")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("particle {index} out of range ({particle_count} particles)")]
    ParticleOutOfRange { index: usize, particle_count: usize },
    #[error("vertex group '{0}' not found")]
    GroupNotFound(String),
    #[error("group '{0}' is not a vertex group")]
    NotAVertexGroup(String),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type ClothResult<T> = Result<T, ClothError>;
