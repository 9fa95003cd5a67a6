//! Bone name registry
//!
//! Assigns every distinct bone name of a scene a dense original id, in the
//! order bones are first seen. The order only decides tie-breaking during
//! skeleton sorting; final ids come from [`crate::skeleton`].

use crate::scene::SceneSource;
use hashbrown::HashMap;

#[derive(Debug, Clone, Default)]
pub struct BoneTable {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl BoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every bone of every mesh, mesh by mesh, in each mesh's bone order
    pub fn from_scene<S: SceneSource + ?Sized>(source: &S) -> Self {
        let mut table = Self::new();
        for mesh in source.meshes() {
            for bone in &mesh.bones {
                table.register(&bone.name);
            }
        }
        table
    }

    /// Id of `name`, allocating the next one on first sight
    pub fn register(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(original_id, name)` in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as u32, name.as_str()))
    }
}
