//! rigpack output formats
//!
//! One exported scene is a directory holding:
//!
//! ```text
//! scene.json                  manifest tying the files together
//! skeleton.json               topologically sorted bone list
//! mesh_<i>.mesh               packed vertex/index buffers (binary, see [`mesh`])
//! material_<i>.material.json  diffuse color + optional texture file name
//! texture_<i>.<ext>           embedded textures extracted verbatim
//! anim_<i>.anim               keyframe channels (JSON)
//! ```

pub mod animation;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod skeleton;

pub use animation::*;
pub use material::*;
pub use mesh::*;
pub use scene::*;
pub use skeleton::*;

/// File name of the skeleton descriptor inside an export directory
pub const SKELETON_FILE_NAME: &str = "skeleton.json";

/// File name of the scene manifest inside an export directory
pub const SCENE_FILE_NAME: &str = "scene.json";

pub fn mesh_file_name(index: usize) -> String {
    format!("mesh_{index}.mesh")
}

pub fn material_file_name(index: usize) -> String {
    format!("material_{index}.material.json")
}

pub fn animation_file_name(index: usize) -> String {
    format!("anim_{index}.anim")
}

/// Texture files are named after the material that references them
pub fn texture_file_name(material_index: usize, extension: &str) -> String {
    format!("texture_{material_index}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(mesh_file_name(0), "mesh_0.mesh");
        assert_eq!(material_file_name(3), "material_3.material.json");
        assert_eq!(animation_file_name(12), "anim_12.anim");
        assert_eq!(texture_file_name(1, "jpg"), "texture_1.jpg");
    }
}
