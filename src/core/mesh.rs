use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::topology::EdgeKey;
use crate::error::MeshError;

/// Axis-aligned bounding box used for mesh and cloth bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.extend(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Element type a named group refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Vertex,
    Edge,
    Face,
}

/// Named index subset attached to a mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexGroup {
    kind: GroupKind,
    indices: Vec<u32>,
}

impl VertexGroup {
    /// Stores `indices` sorted and deduplicated.
    pub fn new(kind: GroupKind, mut indices: Vec<u32>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { kind, indices }
    }

    pub fn vertices(indices: Vec<u32>) -> Self {
        Self::new(GroupKind::Vertex, indices)
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn contains(&self, index: u32) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

/// Read-only topology provider a cloth is built from.
pub trait MeshTopology {
    fn positions(&self) -> &[Vec3];

    fn face_count(&self) -> usize;

    /// Ordered corner indices of face `index`.
    fn face(&self, index: usize) -> &[u32];

    fn group(&self, name: &str) -> Option<&VertexGroup>;

    /// Every named group; the cloth snapshots these for pinning.
    fn groups(&self) -> Vec<(&str, &VertexGroup)>;

    fn vertex_count(&self) -> usize {
        self.positions().len()
    }

    fn faces(&self) -> FaceIter<'_, Self> {
        FaceIter {
            mesh: self,
            next: 0,
        }
    }

    /// Deduplicated undirected edges as a flat `v0, v1, v0, v1, ...` array.
    fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for face in self.faces() {
            for (a, b) in face_edges(face) {
                if seen.insert(EdgeKey::new(a, b)) {
                    out.extend_from_slice(&[a, b]);
                }
            }
        }
        out
    }

    /// Corners of every four-sided face, flat and in winding order.
    fn quad_indices(&self) -> Vec<u32> {
        self.faces()
            .filter(|face| face.len() == 4)
            .flat_map(|face| face.iter().copied())
            .collect()
    }
}

/// Iterator over the faces of a [`MeshTopology`].
pub struct FaceIter<'a, M: ?Sized> {
    mesh: &'a M,
    next: usize,
}

impl<'a, M: MeshTopology + ?Sized> Iterator for FaceIter<'a, M> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.mesh.face_count() {
            return None;
        }
        let face = self.mesh.face(self.next);
        self.next += 1;
        Some(face)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.mesh.face_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

/// Consecutive corner pairs of a face, closing back to the first corner.
pub fn face_edges(face: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    let n = face.len();
    (0..n).map(move |i| (face[i], face[(i + 1) % n]))
}

/// Polygon mesh with mixed face arity and named groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonMesh {
    vertices: Vec<Vec3>,
    face_indices: Vec<u32>,
    face_offsets: Vec<usize>,
    loose_edges: Vec<[u32; 2]>,
    groups: HashMap<String, VertexGroup>,
    bounds: Aabb,
}

impl PolygonMesh {
    pub fn builder(vertices: Vec<Vec3>) -> MeshBuilder {
        MeshBuilder::new(vertices)
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn loose_edges(&self) -> &[[u32; 2]] {
        &self.loose_edges
    }
}

impl MeshTopology for PolygonMesh {
    fn positions(&self) -> &[Vec3] {
        &self.vertices
    }

    fn face_count(&self) -> usize {
        self.face_offsets.len().saturating_sub(1)
    }

    fn face(&self, index: usize) -> &[u32] {
        &self.face_indices[self.face_offsets[index]..self.face_offsets[index + 1]]
    }

    fn group(&self, name: &str) -> Option<&VertexGroup> {
        self.groups.get(name)
    }

    fn groups(&self) -> Vec<(&str, &VertexGroup)> {
        self.groups
            .iter()
            .map(|(name, group)| (name.as_str(), group))
            .collect()
    }

    fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let face_pairs = self.faces().flat_map(face_edges);
        let loose_pairs = self.loose_edges.iter().map(|e| (e[0], e[1]));
        for (a, b) in face_pairs.chain(loose_pairs) {
            if seen.insert(EdgeKey::new(a, b)) {
                out.extend_from_slice(&[a, b]);
            }
        }
        out
    }
}

/// Helper used to cook polygon meshes from raw vertex/face data.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<u32>>,
    loose_edges: Vec<[u32; 2]>,
    groups: HashMap<String, VertexGroup>,
}

impl MeshBuilder {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            faces: Vec::new(),
            loose_edges: Vec::new(),
            groups: HashMap::new(),
        }
    }

    pub fn face(mut self, corners: &[u32]) -> Self {
        self.faces.push(corners.to_vec());
        self
    }

    pub fn triangle(self, a: u32, b: u32, c: u32) -> Self {
        self.face(&[a, b, c])
    }

    pub fn quad(self, a: u32, b: u32, c: u32, d: u32) -> Self {
        self.face(&[a, b, c, d])
    }

    /// Edge that belongs to no face, e.g. a hanging thread.
    pub fn edge(mut self, a: u32, b: u32) -> Self {
        self.loose_edges.push([a, b]);
        self
    }

    pub fn group(mut self, name: impl Into<String>, group: VertexGroup) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    pub fn vertex_group(self, name: impl Into<String>, indices: Vec<u32>) -> Self {
        self.group(name, VertexGroup::vertices(indices))
    }

    /// Deduplicates vertices using a quantized grid for stability.
    pub fn weld_vertices(mut self, epsilon: f32) -> Self {
        if epsilon <= 0.0 || self.vertices.is_empty() {
            return self;
        }

        let inv = 1.0 / epsilon;
        let mut map: HashMap<(i32, i32, i32), u32> = HashMap::new();
        let mut new_vertices: Vec<Vec3> = Vec::new();
        let mut remap: Vec<u32> = Vec::with_capacity(self.vertices.len());

        for v in &self.vertices {
            let key = (
                (v.x * inv).round() as i32,
                (v.y * inv).round() as i32,
                (v.z * inv).round() as i32,
            );
            let index = *map.entry(key).or_insert_with(|| {
                let idx = new_vertices.len() as u32;
                new_vertices.push(*v);
                idx
            });
            remap.push(index);
        }

        let lookup = |i: u32| remap.get(i as usize).copied().unwrap_or(i);
        for face in &mut self.faces {
            for corner in face.iter_mut() {
                *corner = lookup(*corner);
            }
            face.dedup();
            if face.len() > 1 && face.first() == face.last() {
                face.pop();
            }
        }
        for edge in &mut self.loose_edges {
            *edge = [lookup(edge[0]), lookup(edge[1])];
        }
        self.loose_edges.retain(|edge| edge[0] != edge[1]);
        for group in self.groups.values_mut() {
            if group.kind == GroupKind::Vertex {
                *group = VertexGroup::new(
                    GroupKind::Vertex,
                    group.indices.iter().map(|&i| lookup(i)).collect(),
                );
            }
        }

        self.vertices = new_vertices;
        self
    }

    /// Recenters vertices around their centroid.
    pub fn recenter(mut self) -> Self {
        if self.vertices.is_empty() {
            return self;
        }
        let centroid: Vec3 =
            self.vertices.iter().copied().sum::<Vec3>() / self.vertices.len() as f32;
        for vertex in &mut self.vertices {
            *vertex -= centroid;
        }
        self
    }

    pub fn build(self) -> Result<PolygonMesh, MeshError> {
        let vertex_count = self.vertices.len();
        let mut face_indices = Vec::new();
        let mut face_offsets = Vec::with_capacity(self.faces.len() + 1);
        face_offsets.push(0);

        for (face_id, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: face_id,
                    corners: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_id,
                    index,
                    vertex_count,
                });
            }
            face_indices.extend_from_slice(face);
            face_offsets.push(face_indices.len());
        }

        if let Some(edge) = self
            .loose_edges
            .iter()
            .find(|e| e.iter().any(|&i| i as usize >= vertex_count))
        {
            let index = edge[0].max(edge[1]);
            return Err(MeshError::IndexOutOfRange {
                face: self.faces.len(),
                index,
                vertex_count,
            });
        }

        for (name, group) in &self.groups {
            if group.kind != GroupKind::Vertex {
                continue;
            }
            if let Some(&index) = group.indices.last().filter(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::GroupIndexOutOfRange {
                    name: name.clone(),
                    index,
                    vertex_count,
                });
            }
        }

        Ok(PolygonMesh {
            bounds: Aabb::from_points(&self.vertices),
            vertices: self.vertices,
            face_indices,
            face_offsets,
            loose_edges: self.loose_edges,
            groups: self.groups,
        })
    }
}
