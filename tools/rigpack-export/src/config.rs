//! Export configuration (rigpack.toml)
//!
//! ```toml
//! scale = 0.01            # centimeters -> meters
//! basis = "left_handed"   # or "identity"
//! flip_uvs = true
//! flip_winding = false
//! default_ticks_per_second = 30.0
//! ```
//!
//! Every field is optional; command line flags override the file.

use anyhow::{Context, Result};
use glam::{Mat3, Mat4, Quat, Vec3};
use serde::Deserialize;
use std::path::Path;

/// Export settings shared by every converter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Uniform scale applied to positions and translations.
    /// Default: 1.0
    pub scale: f32,

    /// Axis convention of the output.
    /// Default: identity (keep the source axes)
    pub basis: Basis,

    /// Write `1 - v` instead of `v` for texture coordinates.
    /// Default: false
    pub flip_uvs: bool,

    /// Emit triangles as (a, c, b) instead of (a, b, c).
    /// Default: false
    pub flip_winding: bool,

    /// Tick rate written for clips whose source does not define one.
    /// Default: 30
    pub default_ticks_per_second: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            basis: Basis::Identity,
            flip_uvs: false,
            flip_winding: false,
            default_ticks_per_second: 30.0,
        }
    }
}

impl ExportConfig {
    pub fn axis_correction(&self) -> AxisCorrection {
        AxisCorrection::new(self.basis.matrix(), self.scale)
    }
}

/// Output axis convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    #[default]
    Identity,
    /// Mirror the Z axis (right-handed Y-up -> left-handed Y-up)
    LeftHanded,
}

impl Basis {
    pub fn matrix(self) -> Mat3 {
        match self {
            Basis::Identity => Mat3::IDENTITY,
            Basis::LeftHanded => Mat3::from_diagonal(Vec3::new(1.0, 1.0, -1.0)),
        }
    }
}

/// Change of basis plus uniform unit scale, applied consistently to geometry,
/// bone offsets and animation keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCorrection {
    basis: Mat3,
    basis_inverse: Mat3,
    scale: f32,
}

impl Default for AxisCorrection {
    fn default() -> Self {
        Self::new(Mat3::IDENTITY, 1.0)
    }
}

impl AxisCorrection {
    /// `basis` must be orthonormal (a rotation or a mirror)
    pub fn new(basis: Mat3, scale: f32) -> Self {
        Self {
            basis,
            basis_inverse: basis.transpose(),
            scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Positions: change basis, then scale
    pub fn point(&self, p: [f32; 3]) -> [f32; 3] {
        (self.basis * Vec3::from(p) * self.scale).to_array()
    }

    /// Normals and tangents: change basis only
    pub fn direction(&self, d: [f32; 3]) -> [f32; 3] {
        (self.basis * Vec3::from(d)).to_array()
    }

    pub fn rotation(&self, q: [f32; 4]) -> [f32; 4] {
        let m = self.basis * Mat3::from_quat(Quat::from_array(q)) * self.basis_inverse;
        Quat::from_mat3(&m).to_array()
    }

    /// Bone offset matrices: the basis change conjugates the whole matrix,
    /// then the scale multiplies the translation column only
    pub fn offset_matrix(&self, m: Mat4) -> Mat4 {
        let mut out = Mat4::from_mat3(self.basis) * m * Mat4::from_mat3(self.basis_inverse);
        out.w_axis.x *= self.scale;
        out.w_axis.y *= self.scale;
        out.w_axis.z *= self.scale;
        out
    }
}

/// Load a config file
pub fn load_config(path: &Path) -> Result<ExportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: ExportConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.default_ticks_per_second, 30.0);
    }

    #[test]
    fn test_parse_config() {
        let config: ExportConfig = toml::from_str(
            r#"
            scale = 0.01
            basis = "left_handed"
            flip_uvs = true
            "#,
        )
        .unwrap();
        assert_eq!(config.scale, 0.01);
        assert_eq!(config.basis, Basis::LeftHanded);
        assert!(config.flip_uvs);
        assert!(!config.flip_winding);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<ExportConfig>("scael = 2.0").is_err());
    }

    #[test]
    fn test_offset_scale_touches_translation_only() {
        let correction = AxisCorrection::new(Mat3::IDENTITY, 0.01);
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(0.5),
            Vec3::new(100.0, 200.0, -300.0),
        );
        let out = correction.offset_matrix(m);

        assert!(out.w_axis.truncate().abs_diff_eq(Vec3::new(1.0, 2.0, -3.0), 1e-5));
        assert_eq!(out.w_axis.w, m.w_axis.w);
        assert_eq!(out.x_axis, m.x_axis);
        assert_eq!(out.y_axis, m.y_axis);
        assert_eq!(out.z_axis, m.z_axis);
    }

    #[test]
    fn test_left_handed_mirrors_z() {
        let correction = ExportConfig {
            basis: Basis::LeftHanded,
            scale: 2.0,
            ..Default::default()
        }
        .axis_correction();

        assert_eq!(correction.point([1.0, 2.0, 3.0]), [2.0, 4.0, -6.0]);
        assert_eq!(correction.direction([0.0, 0.0, 1.0]), [0.0, 0.0, -1.0]);

        let offset = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let expected = Mat4::from_translation(Vec3::new(2.0, 4.0, -6.0));
        assert!(correction.offset_matrix(offset).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_mirrored_rotation_reverses_angle() {
        let correction = AxisCorrection::new(Basis::LeftHanded.matrix(), 1.0);
        // Under a Z mirror a rotation about Y by +a becomes a rotation by -a
        let q = Quat::from_rotation_y(0.4);
        let out = Quat::from_array(correction.rotation(q.to_array()));
        let expected = Quat::from_rotation_y(-0.4);
        assert!(out.abs_diff_eq(expected, 1e-5) || out.abs_diff_eq(-expected, 1e-5));
    }
}
