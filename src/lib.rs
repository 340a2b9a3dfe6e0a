//! # glTF memory accessors
//!
//! Typed, zero-copy views over the binary buffers of 3D interchange formats.
//!
//! A view wraps a caller-owned byte region plus a layout (offset, count,
//! stride, component encoding, normalization) and reads or writes logical
//! elements: scalars, vectors, quaternions and matrices. Integer encodings
//! can be normalized to `[0, 1]` or `[-1, 1]`. Sparse overlays replace
//! selected elements of a dense view by index.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (encodings, formats, layouts, errors, math)
//! - [`memory`] - Strided codec, typed arrays, bulk traversal, sparse overlay
//!
//! ## Example
//!
//! ```
//! use gltf_memory::prelude::*;
//!
//! let bytes: Vec<u8> = [0.0f32, 1.0, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
//! let positions = Vector3Array::packed(&bytes[..], EncodingType::Float32, false)?;
//! assert_eq!(positions.get(0)?, Vec3::new(0.0, 1.0, 2.0));
//! # Ok::<(), gltf_memory::Error>(())
//! ```

pub mod util;
pub mod memory;

// Re-export commonly used types
pub use util::{AccessorLayout, AttributeFormat, EncodingType, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{AccessorLayout, AttributeFormat, EncodingType, Error, Result};
    pub use crate::util::{Affine2, Mat2, Mat4, Quat, Vec2, Vec3, Vec4};
    pub use crate::memory::*;
}
