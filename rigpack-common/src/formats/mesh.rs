//! Packed mesh binary format (.mesh)
//!
//! POD format - no magic bytes, no version field.
//!
//! # Layout
//! ```text
//! 0x00: vertex_count u32
//! 0x04: index_count u32
//! 0x08: material_index u32
//! 0x0C: vertex_data (vertex_count * 76 bytes, see [`Vertex`])
//! var:  index_data (index_count * 4 bytes, u32)
//! ```
//!
//! All values are written in the native byte order of the producing machine.
//! Producer and consumer must agree on endianness; no byte swapping is done.

use bytemuck::{Pod, Zeroable};
use std::io::Write;
use thiserror::Error;

/// Errors raised while reading a packed mesh back
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("mesh data too short for header: {len} bytes, need {needed}")]
    TruncatedHeader { len: usize, needed: usize },

    #[error(
        "mesh size mismatch: header declares {vertex_count} vertices and {index_count} indices \
         ({expected} bytes), got {actual} bytes"
    )]
    SizeMismatch {
        vertex_count: u32,
        index_count: u32,
        expected: usize,
        actual: usize,
    },
}

/// Mesh header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct MeshHeader {
    pub vertex_count: u32,
    pub index_count: u32,
    pub material_index: u32,
}

impl MeshHeader {
    pub const SIZE: usize = 12;

    pub fn new(vertex_count: u32, index_count: u32, material_index: u32) -> Self {
        Self {
            vertex_count,
            index_count,
            material_index,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.vertex_count.to_ne_bytes());
        bytes[4..8].copy_from_slice(&self.index_count.to_ne_bytes());
        bytes[8..12].copy_from_slice(&self.material_index.to_ne_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            index_count: u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            material_index: u32::from_ne_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Total file size described by this header
    pub fn packed_size(&self) -> usize {
        Self::SIZE
            + self.vertex_count as usize * Vertex::SIZE
            + self.index_count as usize * std::mem::size_of::<u32>()
    }
}

/// Fixed-layout vertex record (76 bytes)
///
/// Every field is 4-byte aligned, so the `repr(C)` layout has no padding:
/// position (12) → texcoord (8) → normal (12) → tangent (12) → bone_ids (16) → weights (16).
///
/// Unused bone slots hold id `-1` and weight `0`. Slots are not sorted by weight.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bone_ids: [i32; 4],
    pub weights: [f32; 4],
}

impl Vertex {
    pub const SIZE: usize = 76;

    /// Bone id marking an empty influence slot
    pub const NO_BONE: i32 = -1;

    /// Number of influence slots per vertex
    pub const MAX_INFLUENCES: usize = 4;

    /// Vertex with all attributes zeroed and no bone influences
    pub fn unskinned() -> Self {
        Self {
            bone_ids: [Self::NO_BONE; Self::MAX_INFLUENCES],
            ..<Self as Zeroable>::zeroed()
        }
    }

    /// True if no slot references a bone
    pub fn is_unskinned(&self) -> bool {
        self.bone_ids.iter().all(|&id| id == Self::NO_BONE)
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::unskinned()
    }
}

/// In-memory form of a `.mesh` file
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    pub header: MeshHeader,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    /// Build a buffer; the header counts are taken from the slices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, material_index: u32) -> Self {
        let header = MeshHeader::new(vertices.len() as u32, indices.len() as u32, material_index);
        Self {
            header,
            vertices,
            indices,
        }
    }

    /// Write header, vertices and indices
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.header.to_bytes())?;
        w.write_all(bytemuck::cast_slice(&self.vertices))?;
        w.write_all(bytemuck::cast_slice(&self.indices))?;
        Ok(())
    }

    /// Pack into a byte vector. Identical input always yields identical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.header.packed_size());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(bytemuck::cast_slice(&self.vertices));
        bytes.extend_from_slice(bytemuck::cast_slice(&self.indices));
        bytes
    }

    /// Parse a packed mesh. Trailing bytes are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let header = MeshHeader::from_bytes(bytes).ok_or(FormatError::TruncatedHeader {
            len: bytes.len(),
            needed: MeshHeader::SIZE,
        })?;

        let expected = header.packed_size();
        if bytes.len() != expected {
            return Err(FormatError::SizeMismatch {
                vertex_count: header.vertex_count,
                index_count: header.index_count,
                expected,
                actual: bytes.len(),
            });
        }

        let vertex_end = MeshHeader::SIZE + header.vertex_count as usize * Vertex::SIZE;
        // Slices of a file buffer are not guaranteed to be 4-byte aligned
        let vertices: Vec<Vertex> =
            bytemuck::pod_collect_to_vec(&bytes[MeshHeader::SIZE..vertex_end]);
        let indices: Vec<u32> = bytemuck::pod_collect_to_vec(&bytes[vertex_end..]);

        Ok(Self {
            header,
            vertices,
            indices,
        })
    }
}
