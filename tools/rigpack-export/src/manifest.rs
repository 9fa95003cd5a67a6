//! scene.json

use anyhow::Result;
use rigpack_common::{MeshEntry, SCENE_FILE_NAME, SKELETON_FILE_NAME, SceneManifest};
use std::path::Path;

use crate::output::{JSON_INDENT, write_json_file};

/// Build the manifest from the file names the exporters produced.
///
/// `meshes` pairs each mesh file with its material index.
pub fn build_manifest(
    meshes: Vec<MeshEntry>,
    materials: Vec<String>,
    animations: Vec<String>,
) -> SceneManifest {
    SceneManifest {
        mesh_count: meshes.len(),
        material_count: materials.len(),
        animation_count: animations.len(),
        meshes,
        materials,
        animations,
        skeleton: SKELETON_FILE_NAME.to_string(),
    }
}

pub fn write_manifest(manifest: &SceneManifest, out_dir: &Path) -> Result<()> {
    write_json_file(&out_dir.join(SCENE_FILE_NAME), manifest, JSON_INDENT)?;
    tracing::info!(
        "Wrote {}: {} meshes, {} materials, {} animations",
        SCENE_FILE_NAME,
        manifest.mesh_count,
        manifest.material_count,
        manifest.animation_count
    );
    Ok(())
}
