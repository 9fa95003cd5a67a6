//! Programmatic glTF generation for integration tests.
//!
//! Writes a `.gltf` document plus its `.bin` buffer containing:
//! - a skinned triangle bound to a 3-joint skin listed out of hierarchy order
//!   (joints: hand, root, arm; hierarchy: root -> arm -> hand)
//! - an unskinned triangle without a material
//! - one material whose base color texture is embedded in the buffer
//! - a one-channel translation clip on `arm`

#![allow(dead_code)]

mod binary_packing;
mod gltf_json;

use binary_packing::BufferBuilder;
use glam::{Mat4, Vec3};
use self::gltf_json::{RigAccessors, build_gltf_json};
use std::path::{Path, PathBuf};

use ::gltf_json::accessor::{ComponentType, Type};

/// Bone names in the order the exported skeleton must list them
pub const SORTED_BONES: [&str; 3] = ["root", "arm", "hand"];

/// 12-byte header + 3 vertices * 76 bytes + 3 indices * 4 bytes
pub const TRIANGLE_MESH_SIZE: u64 = 12 + 3 * 76 + 3 * 4;

/// Bind-pose height of each joint, in source units
pub const JOINT_HEIGHTS: [(&str, f32); 3] = [("root", 0.0), ("arm", 100.0), ("hand", 200.0)];

/// Bytes of the embedded base color image. Declared as `image/png` but not a
/// decodable PNG: the exporter must copy it without decoding.
pub const EMBEDDED_TEXTURE: &[u8] = b"rigpack embedded texture";

fn inverse_bind(height: f32) -> [f32; 16] {
    Mat4::from_translation(Vec3::new(0.0, height, 0.0))
        .inverse()
        .to_cols_array()
}

/// Write `<dir>/rig.gltf` and `<dir>/rig.bin`; returns the `.gltf` path
pub fn write_rig_gltf(dir: &Path) -> PathBuf {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [0.0, 100.0, 0.0]];
    // Joint indices point into the skin's joint list (hand, root, arm)
    let joints: [[u16; 4]; 3] = [[1, 0, 0, 0], [1, 2, 0, 0], [0, 0, 0, 0]];
    let weights: [[f32; 4]; 3] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.5, 0.5, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
    ];
    let indices: [u32; 3] = [0, 1, 2];
    let inverse_binds = [inverse_bind(200.0), inverse_bind(0.0), inverse_bind(100.0)];
    let times: [f32; 2] = [0.0, 1.0];
    let translations: [[f32; 3]; 2] = [[0.0, 100.0, 0.0], [0.0, 150.0, 0.0]];

    let mut buffers = BufferBuilder::default();
    let accessors = RigAccessors {
        positions: buffers.push_accessor(
            &positions,
            ComponentType::F32,
            Type::Vec3,
            Some((vec![0.0, 0.0, 0.0], vec![100.0, 100.0, 0.0])),
        ),
        joints: buffers.push_accessor(&joints, ComponentType::U16, Type::Vec4, None),
        weights: buffers.push_accessor(&weights, ComponentType::F32, Type::Vec4, None),
        indices: buffers.push_accessor(&indices, ComponentType::U32, Type::Scalar, None),
        inverse_binds: buffers.push_accessor(&inverse_binds, ComponentType::F32, Type::Mat4, None),
        times: buffers.push_accessor(
            &times,
            ComponentType::F32,
            Type::Scalar,
            Some((vec![0.0], vec![1.0])),
        ),
        translations: buffers.push_accessor(&translations, ComponentType::F32, Type::Vec3, None),
        texture_view: buffers.push_view(EMBEDDED_TEXTURE, None),
    };

    let bin = buffers.data.clone();
    let root = build_gltf_json(buffers, &accessors, "rig.bin");

    let gltf_path = dir.join("rig.gltf");
    std::fs::write(dir.join("rig.bin"), &bin).expect("Failed to write rig.bin");
    std::fs::write(
        &gltf_path,
        ::gltf_json::serialize::to_vec_pretty(&root).expect("Failed to serialize glTF"),
    )
    .expect("Failed to write rig.gltf");
    gltf_path
}
