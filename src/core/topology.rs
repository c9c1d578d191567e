//! Spring network topology derived from polygon connectivity.
//!
//! Collects the unique undirected edges of a mesh (structural springs), the
//! quad diagonals (shear springs) and, on request, nearly straight vertex
//! triplets (bending constraints). Edge identity is an [`EdgeKey`], so the
//! same edge seen from two faces is only ever emitted once.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use log::{debug, warn};

use super::mesh::{face_edges, MeshTopology};
use crate::error::ClothError;
use crate::utils::math::cos_angle;

/// Undirected edge packed into 64 bits, smaller index in the low half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(u64);

impl EdgeKey {
    pub fn new(a: u32, b: u32) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(((hi as u64) << 32) | lo as u64)
    }

    /// Endpoints as `(min, max)`.
    pub fn endpoints(&self) -> (u32, u32) {
        (self.0 as u32, (self.0 >> 32) as u32)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Edge of the spring network with the number of faces it borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyEdge {
    pub key: EdgeKey,
    pub face_count: u32,
}

impl TopologyEdge {
    pub fn is_boundary(&self) -> bool {
        self.face_count == 1
    }

    pub fn is_manifold(&self) -> bool {
        self.face_count == 1 || self.face_count == 2
    }
}

/// Three vertices forming a nearly straight chain through `pivot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BendTriplet {
    pub a: u32,
    pub pivot: u32,
    pub c: u32,
}

/// Connectivity extracted from a mesh once per cloth.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub edges: Vec<TopologyEdge>,
    pub shear_pairs: Vec<EdgeKey>,
    pub bend_triplets: Vec<BendTriplet>,
    pub skipped_faces: usize,
}

impl Topology {
    /// Extracts edges and shear diagonals.
    pub fn extract<M: MeshTopology + ?Sized>(mesh: &M) -> Result<Self, ClothError> {
        let vertex_count = mesh.vertex_count();
        let check = |index: u32| -> Result<u32, ClothError> {
            if (index as usize) < vertex_count {
                Ok(index)
            } else {
                Err(ClothError::IndexOutOfRange {
                    index,
                    vertex_count,
                })
            }
        };

        let mut topology = Topology::default();
        let mut edge_slots: HashMap<EdgeKey, usize> = HashMap::new();

        for face in mesh.faces() {
            if face.len() < 3 {
                topology.skipped_faces += 1;
                continue;
            }
            for (a, b) in face_edges(face) {
                let key = EdgeKey::new(check(a)?, check(b)?);
                if a == b {
                    continue;
                }
                let slot = *edge_slots.entry(key).or_insert_with(|| {
                    topology.edges.push(TopologyEdge { key, face_count: 0 });
                    topology.edges.len() - 1
                });
                topology.edges[slot].face_count += 1;
            }
        }

        for pair in mesh.edge_indices().chunks_exact(2) {
            let (a, b) = (check(pair[0])?, check(pair[1])?);
            if a == b {
                continue;
            }
            let key = EdgeKey::new(a, b);
            edge_slots.entry(key).or_insert_with(|| {
                topology.edges.push(TopologyEdge { key, face_count: 0 });
                topology.edges.len() - 1
            });
        }

        let mut seen_shear = HashSet::new();
        for quad in mesh.quad_indices().chunks_exact(4) {
            for (a, b) in [(quad[0], quad[2]), (quad[1], quad[3])] {
                let key = EdgeKey::new(check(a)?, check(b)?);
                if a != b && seen_shear.insert(key) {
                    topology.shear_pairs.push(key);
                }
            }
        }

        topology.report();
        Ok(topology)
    }

    /// Extracts edges, shear diagonals and bend triplets.
    pub fn extract_with_bending<M: MeshTopology + ?Sized>(
        mesh: &M,
        straightness: f32,
    ) -> Result<Self, ClothError> {
        let mut topology = Self::extract(mesh)?;
        topology.bend_triplets = topology.find_bend_triplets(mesh.positions(), straightness);
        Ok(topology)
    }

    /// Pairs of structural neighbours around each vertex whose edges are
    /// nearly opposite (`cos <= -straightness`).
    fn find_bend_triplets(&self, positions: &[Vec3], straightness: f32) -> Vec<BendTriplet> {
        let mut neighbours: Vec<Vec<u32>> = vec![Vec::new(); positions.len()];
        for edge in &self.edges {
            let (a, b) = edge.key.endpoints();
            neighbours[a as usize].push(b);
            neighbours[b as usize].push(a);
        }

        let mut triplets = Vec::new();
        for (pivot, around) in neighbours.iter_mut().enumerate() {
            around.sort_unstable();
            let origin = positions[pivot];
            for (i, &a) in around.iter().enumerate() {
                for &c in &around[i + 1..] {
                    let to_a = positions[a as usize] - origin;
                    let to_c = positions[c as usize] - origin;
                    let cos = cos_angle(to_a, to_c);
                    if cos.is_some_and(|cos| cos <= -straightness) {
                        triplets.push(BendTriplet {
                            a,
                            pivot: pivot as u32,
                            c,
                        });
                    }
                }
            }
        }
        triplets
    }

    pub fn non_manifold_edges(&self) -> impl Iterator<Item = &TopologyEdge> {
        self.edges.iter().filter(|edge| edge.face_count > 2)
    }

    pub fn loose_edges(&self) -> impl Iterator<Item = &TopologyEdge> {
        self.edges.iter().filter(|edge| edge.face_count == 0)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.is_boundary()).count()
    }

    fn report(&self) {
        for edge in self.non_manifold_edges() {
            let (a, b) = edge.key.endpoints();
            warn!(
                "non-manifold edge ({a}, {b}) shared by {} faces, continuing",
                edge.face_count
            );
        }
        let loose = self.loose_edges().count();
        if loose > 0 {
            warn!("{loose} edges have no adjacent face");
        }
        if self.skipped_faces > 0 {
            warn!("skipped {} faces with fewer than 3 corners", self.skipped_faces);
        }
        debug!(
            "topology: {} edges ({} boundary), {} shear pairs",
            self.edges.len(),
            self.boundary_edge_count(),
            self.shear_pairs.len()
        );
    }
}
