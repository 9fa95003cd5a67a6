//! rigpack-export library
//!
//! Splits an imported 3D scene into engine-ready files: packed meshes, a
//! topologically sorted skeleton, material and animation descriptors, and a
//! scene manifest. See [`pipeline::export_scene`] for the whole flow.

pub mod animation;
pub mod bones;
pub mod config;
pub mod error;
pub mod manifest;
pub mod material;
pub mod mesh;
pub mod output;
pub mod pipeline;
pub mod scene;
pub mod skeleton;
pub mod skinning;

pub use bones::BoneTable;
pub use config::{AxisCorrection, Basis, ExportConfig, load_config};
pub use error::ExportError;
pub use pipeline::{ExportSummary, export_file, export_scene};
pub use scene::{GltfScene, MemoryScene, SceneSource};
pub use skeleton::{Skeleton, SkeletonBuilder, SkeletonError};
pub use skinning::VertexBoneBinder;
