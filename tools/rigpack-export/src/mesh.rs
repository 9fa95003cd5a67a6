//! Mesh converter (SourceMesh -> .mesh)

use anyhow::Result;
use rigpack_common::{MeshBuffer, Vertex};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::scene::SourceMesh;
use crate::skeleton::Skeleton;
use crate::skinning::VertexBoneBinder;

/// Convert one source mesh into its packed form.
///
/// Influences are bound through `skeleton`'s final ids; bones the skeleton does
/// not know are skipped. Missing normals, tangents or UVs are written as zeros.
pub fn build_mesh(
    mesh: &SourceMesh,
    skeleton: &Skeleton,
    config: &ExportConfig,
) -> Result<MeshBuffer, ExportError> {
    let vertex_count = mesh.positions.len();
    let correction = config.axis_correction();

    let normals = attribute(mesh, "normals", mesh.normals.as_deref());
    let tangents = attribute(mesh, "tangents", mesh.tangents.as_deref());
    let texcoords = attribute(mesh, "texcoords", mesh.texcoords.as_deref());

    let vertices: Vec<Vertex> = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let mut vertex = Vertex::unskinned();
            vertex.position = correction.point(position);
            if let Some(normals) = normals {
                vertex.normal = correction.direction(normals[i]);
            }
            if let Some(tangents) = tangents {
                vertex.tangent = correction.direction(tangents[i]);
            }
            if let Some(texcoords) = texcoords {
                let [u, v] = texcoords[i];
                vertex.texcoord = if config.flip_uvs { [u, 1.0 - v] } else { [u, v] };
            }
            vertex
        })
        .collect();

    let mut binder = VertexBoneBinder::new(vertices);
    for bone in &mesh.bones {
        let Some(bone_id) = skeleton.final_id(&bone.name) else {
            continue;
        };
        for weight in &bone.weights {
            if !binder.bind(weight.vertex as usize, bone_id, weight.weight) {
                return Err(ExportError::InfluenceOutOfRange {
                    mesh: mesh.name.clone(),
                    bone: bone.name.clone(),
                    vertex: weight.vertex,
                    vertex_count,
                });
            }
        }
    }
    let vertices = binder.finish();

    let mut indices = Vec::with_capacity(mesh.faces.len() * 3);
    for (face, &[a, b, c]) in mesh.faces.iter().enumerate() {
        if let Some(&index) = [a, b, c].iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ExportError::IndexOutOfRange {
                mesh: mesh.name.clone(),
                face,
                index,
                vertex_count,
            });
        }
        if config.flip_winding {
            indices.extend_from_slice(&[a, c, b]);
        } else {
            indices.extend_from_slice(&[a, b, c]);
        }
    }

    Ok(MeshBuffer::new(vertices, indices, mesh.material_index))
}

/// An optional per-vertex attribute, dropped with a warning when its length
/// does not match the vertex count
fn attribute<'a, T>(mesh: &SourceMesh, label: &str, values: Option<&'a [T]>) -> Option<&'a [T]> {
    match values {
        Some(values) if values.len() == mesh.positions.len() => Some(values),
        Some(values) => {
            tracing::warn!(
                "Mesh '{}' has mismatched {} count ({} vs {} vertices), ignoring {}",
                mesh.name,
                label,
                values.len(),
                mesh.positions.len(),
                label
            );
            None
        }
        None => None,
    }
}

/// Write a packed mesh file
pub fn write_mesh(buffer: &MeshBuffer, output: &Path) -> Result<()> {
    use anyhow::Context;

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    buffer
        .write_to(&mut writer)
        .and_then(|()| std::io::Write::flush(&mut writer))
        .with_context(|| format!("Failed to write mesh: {:?}", output))?;

    tracing::info!(
        "Converted mesh: {} vertices, {} indices, material={}",
        buffer.header.vertex_count,
        buffer.header.index_count,
        buffer.header.material_index
    );
    Ok(())
}
