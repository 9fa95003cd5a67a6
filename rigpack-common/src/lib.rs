//! Shared file formats for rigpack scene exports
//!
//! This crate is used by:
//! - `rigpack-export` (asset pipeline, writes the files)
//! - engine-side loaders (read the files back)
//!
//! # Modules
//!
//! - [`formats`] - binary mesh layout and JSON descriptor types

pub mod formats;

pub use formats::{
    AnimationChannel, AnimationFile, BoneEntry, FormatError, MaterialFile, MeshBuffer, MeshEntry,
    MeshHeader, NO_PARENT, QuatKey, SKELETON_FILE_NAME, SCENE_FILE_NAME, SceneManifest,
    SkeletonFile, VectorKey, Vertex, animation_file_name, material_file_name, mesh_file_name,
    texture_file_name,
};
