//! Material descriptor (material_<i>.material.json)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialFile {
    /// RGBA, white when the source material has no diffuse color
    pub diffuse_color: [f32; 4],
    /// File name of the diffuse texture, relative to the export directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse_texture: Option<String>,
}

impl Default for MaterialFile {
    fn default() -> Self {
        Self {
            diffuse_color: [1.0, 1.0, 1.0, 1.0],
            diffuse_texture: None,
        }
    }
}
