//! Math type re-exports used as element types of typed arrays.
//!
//! This module re-exports the `glam` types accessor elements decode into,
//! plus helpers for the identity padding of packed matrices.

pub use glam::{Affine2, Mat2, Mat4, Quat, Vec2, Vec3, Vec4};

/// Build a 4x4 matrix from a packed 3x3, padding with identity.
#[inline]
pub fn mat4_from_mat3_cols(c: &[f32]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(c[0], c[1], c[2], 0.0),
        Vec4::new(c[3], c[4], c[5], 0.0),
        Vec4::new(c[6], c[7], c[8], 0.0),
        Vec4::W,
    )
}

/// Build a 4x4 matrix from a packed 4x3 (affine), padding with identity.
#[inline]
pub fn mat4_from_mat4x3_cols(c: &[f32]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(c[0], c[1], c[2], 0.0),
        Vec4::new(c[3], c[4], c[5], 0.0),
        Vec4::new(c[6], c[7], c[8], 0.0),
        Vec4::new(c[9], c[10], c[11], 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat3_padding() {
        let c: Vec<f32> = (1..=9).map(|v| v as f32).collect();
        let m = mat4_from_mat3_cols(&c);
        assert_eq!(m.x_axis, Vec4::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(m.z_axis, Vec4::new(7.0, 8.0, 9.0, 0.0));
        assert_eq!(m.w_axis, Vec4::W);
    }

    #[test]
    fn test_mat4x3_padding() {
        let c: Vec<f32> = (1..=12).map(|v| v as f32).collect();
        let m = mat4_from_mat4x3_cols(&c);
        assert_eq!(m.w_axis, Vec4::new(10.0, 11.0, 12.0, 1.0));
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(10.0, 11.0, 12.0));
    }
}
