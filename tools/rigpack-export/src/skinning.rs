//! Per-vertex bone influences
//!
//! Each vertex keeps at most [`Vertex::MAX_INFLUENCES`] influences. Binding is
//! an online top-4 selection by weight: slots are kept in insertion/eviction
//! order, never sorted. Weights are renormalized once, after every bone of the
//! mesh has been bound; a vertex whose total weight is negligible ends up
//! unskinned.

use rigpack_common::Vertex;

/// Below this total weight a vertex counts as unskinned
pub const WEIGHT_EPSILON: f32 = 1e-6;

/// Add one influence to `vertex`.
///
/// Fills the first empty slot; when all slots are taken, replaces the lightest
/// slot if `weight` is strictly heavier, otherwise drops `weight`.
pub fn bind(vertex: &mut Vertex, bone_id: u32, weight: f32) {
    let bone_id = bone_id as i32;

    if let Some(slot) = vertex.bone_ids.iter().position(|&id| id == Vertex::NO_BONE) {
        vertex.bone_ids[slot] = bone_id;
        vertex.weights[slot] = weight;
        return;
    }

    let mut lightest = 0;
    for slot in 1..Vertex::MAX_INFLUENCES {
        if vertex.weights[slot] < vertex.weights[lightest] {
            lightest = slot;
        }
    }
    if weight > vertex.weights[lightest] {
        vertex.bone_ids[lightest] = bone_id;
        vertex.weights[lightest] = weight;
    }
}

/// Scale the weights of `vertex` to sum to 1.
///
/// A total at or below [`WEIGHT_EPSILON`] cannot be scaled meaningfully; the
/// vertex is reset to unskinned (all weights 0, all slots [`Vertex::NO_BONE`]).
pub fn normalize(vertex: &mut Vertex) {
    let sum: f32 = vertex.weights.iter().sum();
    if sum > WEIGHT_EPSILON {
        let inv = 1.0 / sum;
        for weight in &mut vertex.weights {
            *weight *= inv;
        }
    } else {
        vertex.bone_ids = [Vertex::NO_BONE; Vertex::MAX_INFLUENCES];
        vertex.weights = [0.0; Vertex::MAX_INFLUENCES];
    }
}

/// Binds all influences of one mesh, then normalizes every vertex exactly once
pub struct VertexBoneBinder {
    vertices: Vec<Vertex>,
}

impl VertexBoneBinder {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `false` if `vertex` is out of range
    pub fn bind(&mut self, vertex: usize, bone_id: u32, weight: f32) -> bool {
        match self.vertices.get_mut(vertex) {
            Some(v) => {
                bind(v, bone_id, weight);
                true
            }
            None => false,
        }
    }

    pub fn finish(mut self) -> Vec<Vertex> {
        for vertex in &mut self.vertices {
            normalize(vertex);
        }
        self.vertices
    }
}
