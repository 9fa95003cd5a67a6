//! Read-only scene access
//!
//! The exporter never walks an importer's object graph directly. Importers
//! hand their data over as plain [`SourceMesh`]/[`SourceMaterial`]/[`SourceAnimation`]
//! records plus a [`NodeTree`], and the pipeline queries them through [`SceneSource`].

mod gltf;
mod memory;

pub use self::gltf::GltfScene;
pub use self::memory::MemoryScene;

use glam::Mat4;
use hashbrown::HashMap;

/// Query interface over an imported scene
pub trait SceneSource {
    /// All meshes, in scene order. Mesh `i` is exported as `mesh_<i>.mesh`.
    fn meshes(&self) -> &[SourceMesh];

    /// Name of the parent node of `name`; `None` for a root or an unknown node
    fn node_parent(&self, name: &str) -> Option<&str>;

    fn materials(&self) -> &[SourceMaterial];

    fn animations(&self) -> &[SourceAnimation];

    /// Bind-pose offset matrix of a bone, searched across all meshes.
    ///
    /// The first mesh defining the bone wins. Two meshes defining different
    /// offsets for the same bone name is malformed input; it is reported but
    /// not resolved.
    fn bone_offset(&self, name: &str) -> Option<Mat4> {
        let mut definitions = self
            .meshes()
            .iter()
            .flat_map(|mesh| mesh.bones.iter())
            .filter(|bone| bone.name == name);

        let first = definitions.next()?;
        if definitions.any(|other| !other.offset.abs_diff_eq(first.offset, 1e-5)) {
            tracing::warn!(
                "Bone '{}' has conflicting offset matrices across meshes, using the first",
                name
            );
        }
        Some(first.offset)
    }
}

/// One triangle mesh as handed over by an importer
#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    /// First UV channel
    pub texcoords: Option<Vec<[f32; 2]>>,
    /// Triangles in face order, original winding
    pub faces: Vec<[u32; 3]>,
    /// Bones influencing this mesh, in the importer's order
    pub bones: Vec<SourceBone>,
    pub material_index: u32,
}

/// A bone as referenced by one mesh
#[derive(Debug, Clone)]
pub struct SourceBone {
    pub name: String,
    /// Mesh space to bone space at rest pose
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

impl SourceBone {
    pub fn new(name: impl Into<String>, offset: Mat4) -> Self {
        Self {
            name: name.into(),
            offset,
            weights: Vec::new(),
        }
    }

    pub fn with_weight(mut self, vertex: u32, weight: f32) -> Self {
        self.weights.push(VertexWeight { vertex, weight });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SourceMaterial {
    pub name: Option<String>,
    pub diffuse_color: Option<[f32; 4]>,
    pub diffuse_texture: Option<TextureRef>,
}

/// Where a material's diffuse texture lives
#[derive(Debug, Clone, PartialEq)]
pub enum TextureRef {
    /// Path or URI of a file next to the source asset
    External(String),
    /// Encoded image stored inside the source asset (PNG/JPEG bytes)
    Embedded { data: Vec<u8>, extension: String },
}

#[derive(Debug, Clone, Default)]
pub struct SourceAnimation {
    pub name: Option<String>,
    /// Length in ticks
    pub duration: f64,
    /// May be zero when the source format does not define it
    pub ticks_per_second: f64,
    pub channels: Vec<SourceChannel>,
}

/// Keyframes for one node; times are in ticks
#[derive(Debug, Clone, Default)]
pub struct SourceChannel {
    pub node: String,
    pub position_keys: Vec<Key<[f32; 3]>>,
    /// Quaternions as [x, y, z, w]
    pub rotation_keys: Vec<Key<[f32; 4]>>,
    pub scale_keys: Vec<Key<[f32; 3]>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key<T> {
    pub time: f64,
    pub value: T,
}

/// Node hierarchy keyed by node name
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    parents: HashMap<String, Option<String>>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A name seen before keeps its first parent.
    pub fn insert(&mut self, name: impl Into<String>, parent: Option<&str>) {
        self.parents
            .entry(name.into())
            .or_insert_with(|| parent.map(str::to_string));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    pub fn parent(&self, name: &str) -> Option<&str> {
        self.parents.get(name)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
