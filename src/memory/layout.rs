//! Element layouts - how packed components compose into one logical element.
//!
//! Each layout is a zero-sized marker fixing a component count and a
//! component -> field mapping. Components are read in storage order, which for
//! matrices is column-major.

use std::fmt::Debug;

use crate::util::{mat4_from_mat3_cols, mat4_from_mat4x3_cols, Affine2, Mat2, Mat4, Quat, Vec2, Vec3, Vec4};

/// Maps a fixed number of components onto a Rust element type.
pub trait ElementLayout: Send + Sync + 'static {
    /// Element type exposed by typed arrays.
    type Item: Copy + PartialEq + Debug + Send + Sync;

    /// Name used by diagnostics and error messages.
    const NAME: &'static str;

    /// Number of packed components per element.
    const DIMENSIONS: usize;

    /// Compose an element from `DIMENSIONS` components.
    fn decode(components: &[f32]) -> Self::Item;

    /// Decompose an element into `DIMENSIONS` components.
    fn encode(item: &Self::Item, components: &mut [f32]);
}

/// Layouts whose item is exactly `DIMENSIONS` consecutive `f32`s in storage order.
///
/// Slices of such items can be reinterpreted as flat component slices.
pub trait PodLayout: ElementLayout {
    fn as_components(items: &[Self::Item]) -> &[f32];
    fn as_components_mut(items: &mut [Self::Item]) -> &mut [f32];
}

macro_rules! layout {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name;
    };
}

macro_rules! pod_layout {
    ($($name:ident),*) => {
        $(
            impl PodLayout for $name {
                #[inline]
                fn as_components(items: &[Self::Item]) -> &[f32] {
                    bytemuck::cast_slice(items)
                }

                #[inline]
                fn as_components_mut(items: &mut [Self::Item]) -> &mut [f32] {
                    bytemuck::cast_slice_mut(items)
                }
            }
        )*
    };
}

layout!(
    /// Single float.
    Scalar
);
layout!(
    /// Two components as X, Y.
    Vector2
);
layout!(
    /// Three components as X, Y, Z.
    Vector3
);
layout!(
    /// Four components as X, Y, Z, W.
    Vector4
);
layout!(
    /// Four components as X, Y, Z, W of a rotation quaternion.
    Quaternion
);
layout!(
    /// 2x2 matrix, two packed columns.
    Matrix2x2
);
layout!(
    /// 3x2 affine matrix: 2x2 linear part followed by translation.
    Matrix3x2
);
layout!(
    /// 3x3 matrix exposed as a 4x4 with identity padding.
    Matrix3x3
);
layout!(
    /// 4x3 affine matrix exposed as a 4x4 with identity padding.
    Matrix4x3
);
layout!(
    /// 4x4 matrix, four packed columns.
    Matrix4x4
);

impl ElementLayout for Scalar {
    type Item = f32;
    const NAME: &'static str = "ScalarArray";
    const DIMENSIONS: usize = 1;

    #[inline]
    fn decode(c: &[f32]) -> f32 {
        c[0]
    }

    #[inline]
    fn encode(item: &f32, c: &mut [f32]) {
        c[0] = *item;
    }
}

impl ElementLayout for Vector2 {
    type Item = Vec2;
    const NAME: &'static str = "Vector2Array";
    const DIMENSIONS: usize = 2;

    #[inline]
    fn decode(c: &[f32]) -> Vec2 {
        Vec2::new(c[0], c[1])
    }

    #[inline]
    fn encode(item: &Vec2, c: &mut [f32]) {
        c[..2].copy_from_slice(&item.to_array());
    }
}

impl ElementLayout for Vector3 {
    type Item = Vec3;
    const NAME: &'static str = "Vector3Array";
    const DIMENSIONS: usize = 3;

    #[inline]
    fn decode(c: &[f32]) -> Vec3 {
        Vec3::new(c[0], c[1], c[2])
    }

    #[inline]
    fn encode(item: &Vec3, c: &mut [f32]) {
        c[..3].copy_from_slice(&item.to_array());
    }
}

impl ElementLayout for Vector4 {
    type Item = Vec4;
    const NAME: &'static str = "Vector4Array";
    const DIMENSIONS: usize = 4;

    #[inline]
    fn decode(c: &[f32]) -> Vec4 {
        Vec4::new(c[0], c[1], c[2], c[3])
    }

    #[inline]
    fn encode(item: &Vec4, c: &mut [f32]) {
        c[..4].copy_from_slice(&item.to_array());
    }
}

impl ElementLayout for Quaternion {
    type Item = Quat;
    const NAME: &'static str = "QuaternionArray";
    const DIMENSIONS: usize = 4;

    #[inline]
    fn decode(c: &[f32]) -> Quat {
        Quat::from_xyzw(c[0], c[1], c[2], c[3])
    }

    #[inline]
    fn encode(item: &Quat, c: &mut [f32]) {
        c[..4].copy_from_slice(&item.to_array());
    }
}

impl ElementLayout for Matrix2x2 {
    type Item = Mat2;
    const NAME: &'static str = "Matrix2x2Array";
    const DIMENSIONS: usize = 4;

    #[inline]
    fn decode(c: &[f32]) -> Mat2 {
        Mat2::from_cols(Vec2::new(c[0], c[1]), Vec2::new(c[2], c[3]))
    }

    #[inline]
    fn encode(item: &Mat2, c: &mut [f32]) {
        c[..4].copy_from_slice(&item.to_cols_array());
    }
}

impl ElementLayout for Matrix3x2 {
    type Item = Affine2;
    const NAME: &'static str = "Matrix3x2Array";
    const DIMENSIONS: usize = 6;

    #[inline]
    fn decode(c: &[f32]) -> Affine2 {
        Affine2::from_cols(Vec2::new(c[0], c[1]), Vec2::new(c[2], c[3]), Vec2::new(c[4], c[5]))
    }

    #[inline]
    fn encode(item: &Affine2, c: &mut [f32]) {
        c[..6].copy_from_slice(&item.to_cols_array());
    }
}

impl ElementLayout for Matrix3x3 {
    type Item = Mat4;
    const NAME: &'static str = "Matrix3x3Array";
    const DIMENSIONS: usize = 9;

    #[inline]
    fn decode(c: &[f32]) -> Mat4 {
        mat4_from_mat3_cols(c)
    }

    /// Only the upper-left 3x3 block is stored; padding is dropped.
    #[inline]
    fn encode(item: &Mat4, c: &mut [f32]) {
        c[0..3].copy_from_slice(&item.x_axis.truncate().to_array());
        c[3..6].copy_from_slice(&item.y_axis.truncate().to_array());
        c[6..9].copy_from_slice(&item.z_axis.truncate().to_array());
    }
}

impl ElementLayout for Matrix4x3 {
    type Item = Mat4;
    const NAME: &'static str = "Matrix4x3Array";
    const DIMENSIONS: usize = 12;

    #[inline]
    fn decode(c: &[f32]) -> Mat4 {
        mat4_from_mat4x3_cols(c)
    }

    #[inline]
    fn encode(item: &Mat4, c: &mut [f32]) {
        c[0..3].copy_from_slice(&item.x_axis.truncate().to_array());
        c[3..6].copy_from_slice(&item.y_axis.truncate().to_array());
        c[6..9].copy_from_slice(&item.z_axis.truncate().to_array());
        c[9..12].copy_from_slice(&item.w_axis.truncate().to_array());
    }
}

impl ElementLayout for Matrix4x4 {
    type Item = Mat4;
    const NAME: &'static str = "Matrix4x4Array";
    const DIMENSIONS: usize = 16;

    #[inline]
    fn decode(c: &[f32]) -> Mat4 {
        Mat4::from_cols_slice(&c[..16])
    }

    #[inline]
    fn encode(item: &Mat4, c: &mut [f32]) {
        c[..16].copy_from_slice(&item.to_cols_array());
    }
}

pod_layout!(Scalar, Vector2, Vector3, Vector4, Quaternion, Matrix4x4);
