//! glTF/GLB scene import
//!
//! Maps a glTF document onto the exporter's scene records:
//! - every triangle primitive becomes one [`SourceMesh`]
//! - skin joints become the bones of the meshes instanced with that skin
//! - `JOINTS_n`/`WEIGHTS_n` become per-bone vertex weights
//! - the node graph becomes the [`NodeTree`]
//! - `baseColorFactor`/`baseColorTexture` become the diffuse color/texture
//! - animation channels are grouped per target node, times in ticks

use super::{
    Key, NodeTree, SceneSource, SourceAnimation, SourceBone, SourceChannel, SourceMaterial,
    SourceMesh, TextureRef, VertexWeight,
};
use anyhow::{Context, Result, bail};
use glam::Mat4;
use gltf::animation::Interpolation;
use gltf::animation::util::ReadOutputs;
use gltf::mesh::Mode;
use hashbrown::HashMap;
use std::path::{Path, PathBuf};

/// glTF times are seconds; channels are exported in milliseconds
pub const GLTF_TICKS_PER_SECOND: f64 = 1000.0;

/// Scene loaded from a `.gltf` or `.glb` file
#[derive(Debug)]
pub struct GltfScene {
    path: PathBuf,
    meshes: Vec<SourceMesh>,
    nodes: NodeTree,
    materials: Vec<SourceMaterial>,
    animations: Vec<SourceAnimation>,
}

impl GltfScene {
    pub fn open(input: &Path) -> Result<Self> {
        // Only buffers are resolved; embedded images are copied out verbatim,
        // never decoded, so any image format the document carries is accepted
        let gltf::Gltf { document, blob } =
            gltf::Gltf::open(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;
        let buffers = gltf::import_buffers(&document, input.parent(), blob)
            .with_context(|| format!("Failed to load glTF buffers: {:?}", input))?;

        let nodes = read_node_tree(&document);
        let (meshes, uses_default_material) = read_meshes(&document, &buffers)?;
        let mut materials: Vec<SourceMaterial> = document
            .materials()
            .map(|material| read_material(&material, &buffers))
            .collect();
        if uses_default_material {
            // Primitives without a material point one past the document's materials
            materials.push(SourceMaterial {
                name: Some("DefaultMaterial".to_string()),
                ..Default::default()
            });
        }
        let animations = document
            .animations()
            .map(|animation| read_animation(&animation, &buffers))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: input.to_path_buf(),
            meshes,
            nodes,
            materials,
            animations,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn nodes(&self) -> &NodeTree {
        &self.nodes
    }
}

impl SceneSource for GltfScene {
    fn meshes(&self) -> &[SourceMesh] {
        &self.meshes
    }

    fn node_parent(&self, name: &str) -> Option<&str> {
        self.nodes.parent(name)
    }

    fn materials(&self) -> &[SourceMaterial] {
        &self.materials
    }

    fn animations(&self) -> &[SourceAnimation] {
        &self.animations
    }
}

/// Node names are the bone keys; unnamed nodes get a stable synthetic name
fn node_name(node: &gltf::Node) -> String {
    match node.name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("node_{}", node.index()),
    }
}

fn read_node_tree(document: &gltf::Document) -> NodeTree {
    let mut parents: HashMap<usize, usize> = HashMap::new();
    for node in document.nodes() {
        for child in node.children() {
            parents.insert(child.index(), node.index());
        }
    }

    let names: Vec<String> = document.nodes().map(|node| node_name(&node)).collect();
    let mut tree = NodeTree::new();
    for node in document.nodes() {
        let parent = parents.get(&node.index()).map(|&p| names[p].as_str());
        tree.insert(names[node.index()].clone(), parent);
    }
    tree
}

/// Returns the meshes and whether any primitive uses the default material
fn read_meshes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<(Vec<SourceMesh>, bool)> {
    // A mesh is skinned by the skin of the first node instancing it
    let mut skins: HashMap<usize, gltf::Skin> = HashMap::new();
    for node in document.nodes() {
        if let (Some(mesh), Some(skin)) = (node.mesh(), node.skin()) {
            skins.entry(mesh.index()).or_insert(skin);
        }
    }

    let default_material = document.materials().count() as u32;
    let mut uses_default_material = false;
    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
        let primitive_count = mesh.primitives().count();

        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{}.{}", mesh_name, primitive.index())
            } else {
                mesh_name.clone()
            };

            if primitive.mode() != Mode::Triangles {
                tracing::warn!(
                    "Skipping primitive '{}': mode {:?} is not a triangle list",
                    name,
                    primitive.mode()
                );
                continue;
            }

            let material_index = match primitive.material().index() {
                Some(index) => index as u32,
                None => {
                    uses_default_material = true;
                    default_material
                }
            };

            let skin = skins.get(&mesh.index());
            meshes.push(read_primitive(name, &primitive, skin, buffers, material_index)?);
        }
    }

    Ok((meshes, uses_default_material))
}

fn read_primitive(
    name: String,
    primitive: &gltf::Primitive,
    skin: Option<&gltf::Skin>,
    buffers: &[gltf::buffer::Data],
    material_index: u32,
) -> Result<SourceMesh> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    // Positions (required)
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .with_context(|| format!("No positions in mesh '{}'", name))?
        .collect();

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

    // glTF tangents carry handedness in w, which the vertex layout does not store
    let tangents: Option<Vec<[f32; 3]>> = reader
        .read_tangents()
        .map(|iter| iter.map(|t| [t[0], t[1], t[2]]).collect());

    let texcoords: Option<Vec<[f32; 2]>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().collect());

    // Non-indexed primitives draw vertices in order
    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() % 3 != 0 {
        bail!(
            "Mesh '{}' has {} indices, which is not a whole number of triangles",
            name,
            indices.len()
        );
    }
    let faces = indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect();

    let bones = match skin {
        Some(skin) => read_skin_bones(&name, &reader, skin, buffers)?,
        None => {
            if reader.read_joints(0).is_some() {
                tracing::warn!(
                    "Mesh '{}' has joint attributes but no skinned node uses it, ignoring skinning",
                    name
                );
            }
            Vec::new()
        }
    };

    Ok(SourceMesh {
        name,
        positions,
        normals,
        tangents,
        texcoords,
        faces,
        bones,
        material_index,
    })
}

/// One bone per skin joint, with the weights every `JOINTS_n`/`WEIGHTS_n` set assigns to it
fn read_skin_bones<'a, 's, F>(
    mesh_name: &str,
    reader: &gltf::mesh::Reader<'a, 's, F>,
    skin: &gltf::Skin,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<SourceBone>>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let inverse_bind_matrices: Option<Vec<Mat4>> = skin
        .reader(|buffer| Some(&buffers[buffer.index()]))
        .read_inverse_bind_matrices()
        .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect());

    let mut bones: Vec<SourceBone> = skin
        .joints()
        .enumerate()
        .map(|(i, joint)| {
            let offset = inverse_bind_matrices
                .as_ref()
                .and_then(|matrices| matrices.get(i).copied())
                .unwrap_or(Mat4::IDENTITY);
            SourceBone::new(node_name(&joint), offset)
        })
        .collect();

    let mut set = 0;
    while let (Some(joints), Some(weights)) = (reader.read_joints(set), reader.read_weights(set))
    {
        for (vertex, (joint_set, weight_set)) in
            joints.into_u16().zip(weights.into_f32()).enumerate()
        {
            for (&joint, &weight) in joint_set.iter().zip(weight_set.iter()) {
                if weight <= 0.0 {
                    continue;
                }
                let Some(bone) = bones.get_mut(joint as usize) else {
                    bail!(
                        "Mesh '{}': vertex {} references joint {}, but skin '{}' has {} joints",
                        mesh_name,
                        vertex,
                        joint,
                        skin.name().unwrap_or("unnamed"),
                        skin.joints().count()
                    );
                };
                bone.weights.push(VertexWeight {
                    vertex: vertex as u32,
                    weight,
                });
            }
        }
        set += 1;
    }

    Ok(bones)
}

fn read_material(material: &gltf::Material, buffers: &[gltf::buffer::Data]) -> SourceMaterial {
    let pbr = material.pbr_metallic_roughness();

    let diffuse_texture = pbr.base_color_texture().and_then(|info| {
        let image = info.texture().source();
        match image.source() {
            gltf::image::Source::View { view, mime_type } => {
                let range = view.offset()..view.offset() + view.length();
                let Some(data) = buffers
                    .get(view.buffer().index())
                    .and_then(|buffer| buffer.get(range))
                else {
                    tracing::warn!(
                        "Material '{}': embedded texture lies outside its buffer, skipping",
                        material.name().unwrap_or("unnamed")
                    );
                    return None;
                };
                Some(TextureRef::Embedded {
                    data: data.to_vec(),
                    extension: extension_for_mime(mime_type).to_string(),
                })
            }
            gltf::image::Source::Uri { uri, .. } if uri.starts_with("data:") => {
                tracing::warn!(
                    "Material '{}': data URI textures are not extracted",
                    material.name().unwrap_or("unnamed")
                );
                None
            }
            gltf::image::Source::Uri { uri, .. } => Some(TextureRef::External(uri.to_string())),
        }
    });

    SourceMaterial {
        name: material.name().map(str::to_string),
        diffuse_color: Some(pbr.base_color_factor()),
        diffuse_texture,
    }
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/ktx2" => "ktx2",
        _ => "png",
    }
}

fn read_animation(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
) -> Result<SourceAnimation> {
    let mut channels: Vec<SourceChannel> = Vec::new();
    let mut by_node: HashMap<usize, usize> = HashMap::new();
    let mut max_time = 0.0f64;

    for channel in animation.channels() {
        let target = channel.target();
        let node = target.node();
        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));

        let times: Vec<f64> = reader
            .read_inputs()
            .context("Animation channel has no input times")?
            .map(|t| t as f64 * GLTF_TICKS_PER_SECOND)
            .collect();
        if let Some(&last) = times.last() {
            max_time = max_time.max(last);
        }

        let cubic = channel.sampler().interpolation() == Interpolation::CubicSpline;
        let slot = *by_node.entry(node.index()).or_insert_with(|| {
            channels.push(SourceChannel {
                node: node_name(&node),
                ..Default::default()
            });
            channels.len() - 1
        });
        let out = &mut channels[slot];

        match reader.read_outputs() {
            Some(ReadOutputs::Translations(iter)) => {
                out.position_keys = keys(&times, spline_values(iter.collect(), cubic));
            }
            Some(ReadOutputs::Rotations(iter)) => {
                out.rotation_keys = keys(&times, spline_values(iter.into_f32().collect(), cubic));
            }
            Some(ReadOutputs::Scales(iter)) => {
                out.scale_keys = keys(&times, spline_values(iter.collect(), cubic));
            }
            Some(ReadOutputs::MorphTargetWeights(_)) => {} // Morph targets are not exported
            None => bail!("Animation channel has no output values"),
        }
    }

    Ok(SourceAnimation {
        name: animation.name().map(str::to_string),
        duration: max_time,
        ticks_per_second: GLTF_TICKS_PER_SECOND,
        channels,
    })
}

/// Cubic spline samplers store (in-tangent, value, out-tangent) triplets
fn spline_values<T: Copy>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.chunks_exact(3).map(|triplet| triplet[1]).collect()
    } else {
        values
    }
}

fn keys<T: Copy>(times: &[f64], values: Vec<T>) -> Vec<Key<T>> {
    times
        .iter()
        .zip(values)
        .map(|(&time, value)| Key { time, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_values_keep_middle_element() {
        let values = vec![[0.0f32; 3], [1.0; 3], [2.0; 3], [3.0; 3], [4.0; 3], [5.0; 3]];
        assert_eq!(spline_values(values.clone(), true), vec![[1.0; 3], [4.0; 3]]);
        assert_eq!(spline_values(values.clone(), false), values);
    }

    #[test]
    fn test_keys_pair_times_and_values() {
        let keys = keys(&[0.0, 500.0], vec![[1.0f32, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].time, 500.0);
        assert_eq!(keys[1].value, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("image/ktx2"), "ktx2");
        assert_eq!(extension_for_mime("application/octet-stream"), "png");
    }
}
