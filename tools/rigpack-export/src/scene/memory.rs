//! In-memory scene, for callers that already hold decoded scene data

use super::{NodeTree, SceneSource, SourceAnimation, SourceMaterial, SourceMesh};

/// Scene assembled directly from plain records
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    pub meshes: Vec<SourceMesh>,
    pub nodes: NodeTree,
    pub materials: Vec<SourceMaterial>,
    pub animations: Vec<SourceAnimation>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mesh(mut self, mesh: SourceMesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// Add a node under `parent`, or as a root when `parent` is `None`
    pub fn with_node(mut self, name: &str, parent: Option<&str>) -> Self {
        self.nodes.insert(name, parent);
        self
    }

    pub fn with_material(mut self, material: SourceMaterial) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_animation(mut self, animation: SourceAnimation) -> Self {
        self.animations.push(animation);
        self
    }
}

impl SceneSource for MemoryScene {
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
