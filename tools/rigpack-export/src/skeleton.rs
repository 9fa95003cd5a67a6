//! Skeleton construction (BoneTable + node tree -> skeleton.json)
//!
//! Bones reach the exporter as names scattered over meshes. This module
//! resolves each bone's parent through the scene's node tree, orders the
//! bones so every parent precedes its children, and hands out the final
//! dense ids used by vertex skinning and by `skeleton.json`.

use anyhow::{Context, Result};
use glam::Mat4;
use hashbrown::HashMap;
use rigpack_common::{BoneEntry, NO_PARENT, SkeletonFile};
use std::path::Path;
use thiserror::Error;

use crate::bones::BoneTable;
use crate::config::AxisCorrection;
use crate::output::{JSON_INDENT, write_json_file};
use crate::scene::SceneSource;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkeletonError {
    /// A sorting pass placed nothing while bones were left; their parent
    /// chains loop back on themselves
    #[error(
        "cyclic bone hierarchy: {} bone(s) are their own ancestor: {}",
        .bones.len(),
        .bones.join(", ")
    )]
    CyclicHierarchy { bones: Vec<String> },

    /// Records handed to [`sort_bones`] must carry ids `0..n` in order
    #[error("bone '{name}' has original id {original_id}, expected {expected}")]
    NonDenseId {
        name: String,
        original_id: u32,
        expected: u32,
    },
}

/// A bone before sorting
#[derive(Debug, Clone, PartialEq)]
pub struct BoneRecord {
    pub name: String,
    pub original_id: u32,
    pub parent_original_id: Option<u32>,
    pub offset: Mat4,
}

/// A bone in final order
#[derive(Debug, Clone, PartialEq)]
pub struct SortedBone {
    /// Position in the skeleton
    pub final_id: u32,
    pub name: String,
    /// Always smaller than `final_id`
    pub parent_final_id: Option<u32>,
    pub offset: Mat4,
}

/// Topologically sorted bones plus the name -> final id map used for skinning
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: Vec<SortedBone>,
    final_ids: HashMap<String, u32>,
}

impl Skeleton {
    pub fn new(bones: Vec<SortedBone>) -> Self {
        let final_ids = bones
            .iter()
            .map(|bone| (bone.name.clone(), bone.final_id))
            .collect();
        Self { bones, final_ids }
    }

    pub fn bones(&self) -> &[SortedBone] {
        &self.bones
    }

    pub fn final_id(&self, name: &str) -> Option<u32> {
        self.final_ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Descriptor written to skeleton.json
    pub fn to_file(&self) -> SkeletonFile {
        SkeletonFile {
            bones: self
                .bones
                .iter()
                .map(|bone| BoneEntry {
                    id: bone.final_id,
                    name: bone.name.clone(),
                    parent_id: bone.parent_final_id.map_or(NO_PARENT, |p| p as i32),
                    offset: bone.offset.to_cols_array(),
                })
                .collect(),
        }
    }
}

/// Builds a [`Skeleton`] from a registered bone set
pub struct SkeletonBuilder<'a, S: SceneSource + ?Sized> {
    source: &'a S,
    correction: AxisCorrection,
}

impl<'a, S: SceneSource + ?Sized> SkeletonBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            correction: AxisCorrection::default(),
        }
    }

    pub fn with_correction(mut self, correction: AxisCorrection) -> Self {
        self.correction = correction;
        self
    }

    /// Resolve parent and offset for every registered bone, in original-id order
    pub fn collect(&self, table: &BoneTable) -> Vec<BoneRecord> {
        table
            .iter()
            .map(|(original_id, name)| {
                // Parents that are plain nodes (not bones) make this bone a root
                let parent_original_id = self
                    .source
                    .node_parent(name)
                    .and_then(|parent| table.get(parent));

                let offset = self.source.bone_offset(name).unwrap_or_else(|| {
                    tracing::debug!("Bone '{}' has no offset matrix, using identity", name);
                    Mat4::IDENTITY
                });

                BoneRecord {
                    name: name.to_string(),
                    original_id,
                    parent_original_id,
                    offset,
                }
            })
            .collect()
    }

    pub fn build(&self, table: &BoneTable) -> Result<Skeleton, SkeletonError> {
        let mut bones = sort_bones(self.collect(table))?;
        for bone in &mut bones {
            bone.offset = self.correction.offset_matrix(bone.offset);
        }
        Ok(Skeleton::new(bones))
    }
}

/// Order bones so that parents precede children.
///
/// `records[i].original_id` must equal `i`, which is what [`SkeletonBuilder::collect`]
/// produces; anything else is a [`SkeletonError::NonDenseId`]. A parent id outside
/// the record set is treated as no parent, so that bone becomes a root.
///
/// Each pass scans the unplaced bones in original-id order and places every bone
/// that is a root or whose parent is already placed, so siblings and other
/// simultaneously eligible bones keep ascending original-id order. A pass that
/// places nothing means the remaining bones form a cycle.
pub fn sort_bones(mut records: Vec<BoneRecord>) -> Result<Vec<SortedBone>, SkeletonError> {
    let count = records.len();
    for (i, record) in records.iter_mut().enumerate() {
        if record.original_id as usize != i {
            return Err(SkeletonError::NonDenseId {
                name: record.name.clone(),
                original_id: record.original_id,
                expected: i as u32,
            });
        }
        match record.parent_original_id {
            Some(parent) if parent as usize >= count => {
                tracing::warn!(
                    "Bone '{}' names unknown parent id {}, treating it as a root",
                    record.name,
                    parent
                );
                record.parent_original_id = None;
            }
            _ => {}
        }
    }

    let mut placed = vec![false; count];
    let mut final_ids = vec![0u32; count];
    let mut order: Vec<usize> = Vec::with_capacity(count);

    while order.len() < count {
        let placed_before = order.len();

        for (id, record) in records.iter().enumerate() {
            if placed[id] {
                continue;
            }
            let eligible = match record.parent_original_id {
                None => true,
                Some(parent) => placed[parent as usize],
            };
            if eligible {
                final_ids[id] = order.len() as u32;
                placed[id] = true;
                order.push(id);
            }
        }

        if order.len() == placed_before {
            let bones = records
                .iter()
                .enumerate()
                .filter(|(id, _)| !placed[*id])
                .map(|(_, record)| record.name.clone())
                .collect();
            return Err(SkeletonError::CyclicHierarchy { bones });
        }
    }

    let mut records: Vec<Option<BoneRecord>> = records.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|id| records[id].take().map(|record| (id, record)))
        .map(|(id, record)| SortedBone {
            final_id: final_ids[id],
            parent_final_id: record.parent_original_id.map(|p| final_ids[p as usize]),
            name: record.name,
            offset: record.offset,
        })
        .collect())
}

/// Write skeleton.json
pub fn write_skeleton(skeleton: &Skeleton, output: &Path) -> Result<()> {
    write_json_file(output, &skeleton.to_file(), JSON_INDENT)
        .context("Failed to write skeleton")?;

    tracing::info!("Exported skeleton: {} bones", skeleton.len());
    Ok(())
}
