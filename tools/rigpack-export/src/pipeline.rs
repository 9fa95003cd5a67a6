//! Whole-scene export
//!
//! Order of work for one scene:
//! 1. bone table and skeleton (fails on a cyclic hierarchy before any mesh is written)
//! 2. meshes, built in parallel against the finished skeleton and written in order
//! 3. materials and extracted textures
//! 4. animation clips
//! 5. scene.json

use anyhow::{Context, Result};
use rayon::prelude::*;
use rigpack_common::{MeshBuffer, MeshEntry, SKELETON_FILE_NAME, mesh_file_name};
use std::path::{Path, PathBuf};

use crate::animation::export_animation;
use crate::bones::BoneTable;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::manifest::{build_manifest, write_manifest};
use crate::material::export_material;
use crate::mesh::{build_mesh, write_mesh};
use crate::scene::{GltfScene, SceneSource};
use crate::skeleton::{Skeleton, SkeletonBuilder, write_skeleton};

/// What one export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub out_dir: PathBuf,
    pub bones: usize,
    pub meshes: usize,
    pub materials: usize,
    pub animations: usize,
}

/// Build the scene's skeleton with the configured axis correction
pub fn build_skeleton<S: SceneSource + ?Sized>(
    source: &S,
    config: &ExportConfig,
) -> Result<(BoneTable, Skeleton), ExportError> {
    let table = BoneTable::from_scene(source);
    let skeleton = SkeletonBuilder::new(source)
        .with_correction(config.axis_correction())
        .build(&table)?;
    Ok((table, skeleton))
}

/// Export every part of `source` into `out_dir`
pub fn export_scene<S: SceneSource + ?Sized>(
    source: &S,
    out_dir: &Path,
    config: &ExportConfig,
) -> Result<ExportSummary> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    let (table, skeleton) = build_skeleton(source, config)?;
    tracing::debug!("Bone table: {} distinct bones", table.len());
    write_skeleton(&skeleton, &out_dir.join(SKELETON_FILE_NAME))?;

    let buffers: Vec<MeshBuffer> = source
        .meshes()
        .par_iter()
        .map(|mesh| build_mesh(mesh, &skeleton, config))
        .collect::<Result<_, ExportError>>()?;

    let mut mesh_entries = Vec::with_capacity(buffers.len());
    for (index, buffer) in buffers.iter().enumerate() {
        let file = mesh_file_name(index);
        write_mesh(buffer, &out_dir.join(&file))?;
        mesh_entries.push(MeshEntry {
            file,
            material_index: buffer.header.material_index,
        });
    }

    let materials = source
        .materials()
        .iter()
        .enumerate()
        .map(|(index, material)| export_material(index, material, out_dir))
        .collect::<Result<Vec<_>>>()?;

    let correction = config.axis_correction();
    let animations = source
        .animations()
        .iter()
        .enumerate()
        .map(|(index, animation)| {
            export_animation(
                index,
                animation,
                &correction,
                config.default_ticks_per_second,
                out_dir,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let manifest = build_manifest(mesh_entries, materials, animations);
    write_manifest(&manifest, out_dir)?;

    Ok(ExportSummary {
        out_dir: out_dir.to_path_buf(),
        bones: skeleton.len(),
        meshes: manifest.mesh_count,
        materials: manifest.material_count,
        animations: manifest.animation_count,
    })
}

/// Load a glTF/GLB file. Other extensions are rejected before reading.
pub fn load_scene(input: &Path) -> Result<GltfScene> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "gltf" | "glb" => GltfScene::open(input),
        _ => Err(ExportError::UnsupportedInput(input.to_path_buf()).into()),
    }
}

/// Directory named after the input file's stem, relative to the current
/// directory rather than the input's own directory
pub fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "export".into());
    PathBuf::from(stem)
}

/// Load `input` and export it into `out_dir` (default: [`default_output_dir`])
pub fn export_file(
    input: &Path,
    out_dir: Option<&Path>,
    config: &ExportConfig,
) -> Result<ExportSummary> {
    let out_dir = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(input));
    tracing::info!("Exporting {:?} -> {:?}", input, out_dir);

    let scene = load_scene(input)?;
    export_scene(&scene, &out_dir, config)
        .with_context(|| format!("Failed to export scene: {:?}", input))
}

/// Write only the skeleton of `input` to `output`
pub fn export_skeleton_file(input: &Path, output: &Path, config: &ExportConfig) -> Result<usize> {
    let scene = load_scene(input)?;
    let (_, skeleton) = build_skeleton(&scene, config)?;
    write_skeleton(&skeleton, output)?;
    Ok(skeleton.len())
}

/// Log an overview of the meshes, bones, materials and animations in `input`
pub fn list_contents(input: &Path) -> Result<()> {
    let scene = load_scene(input)?;
    let (_, skeleton) = build_skeleton(&scene, &ExportConfig::default())?;

    tracing::info!("Meshes in {:?}:", input);
    for (i, mesh) in scene.meshes().iter().enumerate() {
        tracing::info!(
            "  [{}] '{}': {} vertices, {} faces, {} bones, material {}",
            i,
            mesh.name,
            mesh.positions.len(),
            mesh.faces.len(),
            mesh.bones.len(),
            mesh.material_index
        );
    }

    tracing::info!("Bones (sorted): {}", skeleton.len());
    for bone in skeleton.bones() {
        let parent = bone
            .parent_final_id
            .and_then(|p| skeleton.bones().get(p as usize))
            .map_or("-", |p| p.name.as_str());
        tracing::info!("  [{}] '{}' parent: {}", bone.final_id, bone.name, parent);
    }

    tracing::info!("Materials: {}", scene.materials().len());
    for (i, material) in scene.materials().iter().enumerate() {
        tracing::info!(
            "  [{}] '{}'",
            i,
            material.name.as_deref().unwrap_or("unnamed")
        );
    }

    tracing::info!("Animations: {}", scene.animations().len());
    for (i, animation) in scene.animations().iter().enumerate() {
        tracing::info!(
            "  [{}] '{}': {} channels, {} ticks",
            i,
            animation.name.as_deref().unwrap_or("unnamed"),
            animation.channels.len(),
            animation.duration
        );
    }

    Ok(())
}
