//! Animation converter (SourceAnimation -> .anim)

use anyhow::Result;
use rigpack_common::{AnimationChannel, AnimationFile, QuatKey, VectorKey, animation_file_name};
use std::path::Path;

use crate::config::AxisCorrection;
use crate::output::{JSON_INDENT, write_json_file};
use crate::scene::{Key, SourceAnimation};

/// Convert clip `index`.
///
/// Position keys are corrected like geometry, rotation keys are conjugated by
/// the basis, scale keys are copied.
pub fn convert_animation(
    index: usize,
    animation: &SourceAnimation,
    correction: &AxisCorrection,
    default_ticks_per_second: f64,
) -> AnimationFile {
    let name = match animation.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("anim_{index}"),
    };
    let ticks_per_second = if animation.ticks_per_second > 0.0 {
        animation.ticks_per_second
    } else {
        default_ticks_per_second
    };

    let channels = animation
        .channels
        .iter()
        .map(|channel| AnimationChannel {
            bone: channel.node.clone(),
            pos_keys: channel
                .position_keys
                .iter()
                .map(|key| vector_key(key.time, correction.point(key.value)))
                .collect(),
            rot_keys: channel
                .rotation_keys
                .iter()
                .map(|key| quat_key(key.time, correction.rotation(key.value)))
                .collect(),
            scale_keys: channel.scale_keys.iter().map(scale_key).collect(),
        })
        .collect();

    AnimationFile {
        name,
        duration: animation.duration,
        ticks_per_second,
        channels,
    }
}

fn vector_key(t: f64, [x, y, z]: [f32; 3]) -> VectorKey {
    VectorKey { t, x, y, z }
}

fn quat_key(t: f64, [x, y, z, w]: [f32; 4]) -> QuatKey {
    QuatKey { t, x, y, z, w }
}

fn scale_key(key: &Key<[f32; 3]>) -> VectorKey {
    vector_key(key.time, key.value)
}

/// Write `anim_<index>.anim` and return its file name
pub fn export_animation(
    index: usize,
    animation: &SourceAnimation,
    correction: &AxisCorrection,
    default_ticks_per_second: f64,
    out_dir: &Path,
) -> Result<String> {
    let file = convert_animation(index, animation, correction, default_ticks_per_second);
    let name = animation_file_name(index);
    write_json_file(&out_dir.join(&name), &file, JSON_INDENT)?;

    tracing::info!(
        "Exported animation '{}': {} channels, {} ticks",
        file.name,
        file.channels.len(),
        file.duration
    );
    Ok(name)
}
