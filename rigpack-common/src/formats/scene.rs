//! Scene manifest (scene.json)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    pub mesh_count: usize,
    pub material_count: usize,
    pub animation_count: usize,
    pub meshes: Vec<MeshEntry>,
    pub materials: Vec<String>,
    pub animations: Vec<String>,
    pub skeleton: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshEntry {
    pub file: String,
    pub material_index: u32,
}
