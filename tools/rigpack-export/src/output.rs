//! File writers shared by the exporters

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Indentation of skeleton, animation and scene descriptors
pub const JSON_INDENT: usize = 2;

/// Indentation of material descriptors
pub const MATERIAL_JSON_INDENT: usize = 4;

/// Serialize `value` as pretty JSON indented by `indent` spaces
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    w: &mut W,
    value: &T,
    indent: usize,
) -> Result<()> {
    let indent = vec![b' '; indent];
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *w, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut serializer)?;
    w.flush()?;
    Ok(())
}

/// Create `path` and write `value` as pretty JSON
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T, indent: usize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, value, indent).with_context(|| format!("Failed to write: {:?}", path))
}

/// Create `path` and write `bytes` as-is
pub fn write_bytes_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write: {:?}", path))
}
