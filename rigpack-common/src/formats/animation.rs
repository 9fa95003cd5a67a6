//! Animation descriptor (anim_<i>.anim)
//!
//! Keys are stored as exported; times are in ticks, see `ticksPerSecond`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFile {
    pub name: String,
    /// Clip length in ticks
    pub duration: f64,
    pub ticks_per_second: f64,
    pub channels: Vec<AnimationChannel>,
}

/// Keyframes driving one bone (matched by name against skeleton.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationChannel {
    pub bone: String,
    pub pos_keys: Vec<VectorKey>,
    pub rot_keys: Vec<QuatKey>,
    pub scale_keys: Vec<VectorKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorKey {
    pub t: f64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatKey {
    pub t: f64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}
