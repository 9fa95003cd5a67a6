//! glTF document structure for the rig fixture.

use super::binary_packing::BufferBuilder;
use gltf_json as json;
use json::validation::Checked::Valid;
use std::collections::BTreeMap;

type Attributes = BTreeMap<json::validation::Checked<json::mesh::Semantic>, json::Index<json::Accessor>>;

/// Accessors the document refers to, as packed by [`super::write_rig_gltf`]
pub(crate) struct RigAccessors {
    pub positions: json::Index<json::Accessor>,
    pub joints: json::Index<json::Accessor>,
    pub weights: json::Index<json::Accessor>,
    pub indices: json::Index<json::Accessor>,
    pub inverse_binds: json::Index<json::Accessor>,
    pub times: json::Index<json::Accessor>,
    pub translations: json::Index<json::Accessor>,
    pub texture_view: json::Index<json::buffer::View>,
}

fn node(name: &str) -> json::Node {
    json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: None,
        name: Some(name.to_string()),
        rotation: None,
        scale: None,
        translation: None,
        skin: None,
        weights: None,
    }
}

fn mesh(
    name: &str,
    attributes: Attributes,
    indices: json::Index<json::Accessor>,
    material: Option<json::Index<json::Material>>,
) -> json::Mesh {
    json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some(name.to_string()),
        primitives: vec![json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(indices),
            material,
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        }],
        weights: None,
    }
}

/// Build the glTF JSON structure
pub(crate) fn build_gltf_json(
    buffers: BufferBuilder,
    accessors: &RigAccessors,
    uri: &str,
) -> json::Root {
    // Node indices
    const ROOT_NODE: u32 = 0;
    const ARM_NODE: u32 = 1;
    const HAND_NODE: u32 = 2;
    const BODY_NODE: u32 = 3;
    const PROP_NODE: u32 = 4;

    let nodes = vec![
        json::Node {
            children: Some(vec![json::Index::new(ARM_NODE)]),
            ..node("root")
        },
        json::Node {
            children: Some(vec![json::Index::new(HAND_NODE)]),
            translation: Some([0.0, 100.0, 0.0]),
            ..node("arm")
        },
        json::Node {
            translation: Some([0.0, 100.0, 0.0]),
            ..node("hand")
        },
        json::Node {
            mesh: Some(json::Index::new(0)),
            skin: Some(json::Index::new(0)),
            ..node("body")
        },
        json::Node {
            mesh: Some(json::Index::new(1)),
            ..node("prop")
        },
    ];

    // Joints are listed out of hierarchy order on purpose
    let skins = vec![json::Skin {
        extensions: Default::default(),
        extras: Default::default(),
        inverse_bind_matrices: Some(accessors.inverse_binds),
        joints: vec![
            json::Index::new(HAND_NODE),
            json::Index::new(ROOT_NODE),
            json::Index::new(ARM_NODE),
        ],
        name: None,
        skeleton: None,
    }];

    let mut skinned = BTreeMap::new();
    skinned.insert(Valid(json::mesh::Semantic::Positions), accessors.positions);
    skinned.insert(Valid(json::mesh::Semantic::Joints(0)), accessors.joints);
    skinned.insert(Valid(json::mesh::Semantic::Weights(0)), accessors.weights);
    let mut unskinned = BTreeMap::new();
    unskinned.insert(Valid(json::mesh::Semantic::Positions), accessors.positions);

    let meshes = vec![
        mesh("body", skinned, accessors.indices, Some(json::Index::new(0))),
        mesh("prop", unskinned, accessors.indices, None),
    ];

    let images = vec![json::Image {
        buffer_view: Some(accessors.texture_view),
        mime_type: Some(json::image::MimeType("image/png".to_string())),
        name: None,
        uri: None,
        extensions: Default::default(),
        extras: Default::default(),
    }];
    let textures = vec![json::Texture {
        name: None,
        sampler: None,
        source: json::Index::new(0),
        extensions: Default::default(),
        extras: Default::default(),
    }];
    let materials = vec![json::Material {
        name: Some("skin".to_string()),
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor([0.5, 0.25, 1.0, 1.0]),
            base_color_texture: Some(json::texture::Info {
                index: json::Index::new(0),
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            ..Default::default()
        },
        ..Default::default()
    }];

    let animations = vec![json::Animation {
        channels: vec![json::animation::Channel {
            sampler: json::Index::new(0),
            target: json::animation::Target {
                node: json::Index::new(ARM_NODE),
                path: Valid(json::animation::Property::Translation),
                extensions: Default::default(),
                extras: Default::default(),
            },
            extensions: Default::default(),
            extras: Default::default(),
        }],
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("wave".to_string()),
        samplers: vec![json::animation::Sampler {
            input: accessors.times,
            interpolation: Valid(json::animation::Interpolation::Linear),
            output: accessors.translations,
            extensions: Default::default(),
            extras: Default::default(),
        }],
    }];

    json::Root {
        accessors: buffers.accessors,
        animations,
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some("rigpack test generator".to_string()),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers: vec![json::Buffer {
            byte_length: buffers.data.len().into(),
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri: Some(uri.to_string()),
        }],
        buffer_views: buffers.views,
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images,
        materials,
        meshes,
        nodes,
        samplers: Vec::new(),
        scene: Some(json::Index::new(0)),
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            nodes: vec![
                json::Index::new(ROOT_NODE),
                json::Index::new(BODY_NODE),
                json::Index::new(PROP_NODE),
            ],
        }],
        skins,
        textures,
    }
}
