use std::path::PathBuf;
use thiserror::Error;

use crate::skeleton::SkeletonError;

/// Errors raised while converting scene data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("mesh '{mesh}': face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh '{mesh}': bone '{bone}' weights vertex {vertex}, but the mesh has {vertex_count} vertices")]
    InfluenceOutOfRange {
        mesh: String,
        bone: String,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("unsupported input format: {0:?} (expected .gltf or .glb)")]
    UnsupportedInput(PathBuf),

    #[error(transparent)]
    Skeleton(#[from] SkeletonError),
}
