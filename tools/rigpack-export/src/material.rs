//! Material converter (SourceMaterial -> .material.json)

use anyhow::Result;
use rigpack_common::{MaterialFile, material_file_name, texture_file_name};
use std::path::Path;

use crate::output::{MATERIAL_JSON_INDENT, write_bytes_file, write_json_file};
use crate::scene::{SourceMaterial, TextureRef};

/// Descriptor for material `index`, without touching the filesystem
pub fn material_file(index: usize, material: &SourceMaterial) -> MaterialFile {
    let diffuse_texture = material.diffuse_texture.as_ref().map(|texture| match texture {
        TextureRef::Embedded { extension, .. } => texture_file_name(index, extension),
        TextureRef::External(uri) => external_file_name(uri).to_string(),
    });

    MaterialFile {
        diffuse_color: material
            .diffuse_color
            .unwrap_or(MaterialFile::default().diffuse_color),
        diffuse_texture,
    }
}

/// Write `material_<index>.material.json`, plus `texture_<index>.<ext>` when
/// the texture is embedded. Returns the descriptor's file name.
pub fn export_material(index: usize, material: &SourceMaterial, out_dir: &Path) -> Result<String> {
    let file = material_file(index, material);

    if let Some(TextureRef::Embedded { data, extension }) = &material.diffuse_texture {
        let texture_name = texture_file_name(index, extension);
        write_bytes_file(&out_dir.join(&texture_name), data)?;
        tracing::info!("Extracted texture: {} ({} bytes)", texture_name, data.len());
    }

    let name = material_file_name(index);
    write_json_file(&out_dir.join(&name), &file, MATERIAL_JSON_INDENT)?;
    tracing::debug!(
        "Exported material {}: '{}'",
        index,
        material.name.as_deref().unwrap_or("")
    );
    Ok(name)
}

/// Last path segment of a relative URI or file path
fn external_file_name(uri: &str) -> &str {
    uri.rsplit(['/', '\\']).next().unwrap_or(uri)
}
