//! Skeleton descriptor (skeleton.json)
//!
//! Bones are listed in topological order: a bone's `parentId` is always smaller
//! than its own `id`, so world transforms can be computed in one forward pass.
//!
//! ```json
//! { "bones": [ { "id": 0, "name": "Hips", "parentId": -1, "offset": [16 floats] } ] }
//! ```
//!
//! `offset` is the inverse bind matrix flattened column by column; the
//! translation occupies elements 12..15.

use serde::{Deserialize, Serialize};

/// `parentId` of a root bone
pub const NO_PARENT: i32 = -1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFile {
    pub bones: Vec<BoneEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneEntry {
    /// Position of the bone in the file
    pub id: u32,
    pub name: String,
    /// Id of the parent bone or [`NO_PARENT`]
    pub parent_id: i32,
    /// Column-major 4x4 inverse bind matrix
    pub offset: [f32; 16],
}

impl BoneEntry {
    pub fn parent(&self) -> Option<u32> {
        u32::try_from(self.parent_id).ok()
    }
}

impl SkeletonFile {
    /// Check the ordering guarantees a consumer relies on
    pub fn is_topologically_sorted(&self) -> bool {
        self.bones.iter().enumerate().all(|(position, bone)| {
            bone.id as usize == position && bone.parent().is_none_or(|p| p < bone.id)
        })
    }
}
