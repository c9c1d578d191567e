#![allow(dead_code)]

use cloth_engine::{MeshBuilder, PolygonMesh, Vec3};

/// Vertical sheet of `cols` x `rows` vertices, row 0 on top, built from quads.
pub fn grid_builder(cols: u32, rows: u32, spacing: f32) -> MeshBuilder {
    let mut vertices = Vec::with_capacity((cols * rows) as usize);
    for y in 0..rows {
        for x in 0..cols {
            vertices.push(Vec3::new(x as f32 * spacing, -(y as f32) * spacing, 0.0));
        }
    }

    let mut builder = PolygonMesh::builder(vertices);
    for y in 0..rows - 1 {
        for x in 0..cols - 1 {
            let i = y * cols + x;
            builder = builder.quad(i, i + 1, i + cols + 1, i + cols);
        }
    }
    builder.vertex_group("top", (0..cols).collect())
}

pub fn grid(cols: u32, rows: u32, spacing: f32) -> PolygonMesh {
    grid_builder(cols, rows, spacing)
        .build()
        .expect("grid mesh is valid")
}
