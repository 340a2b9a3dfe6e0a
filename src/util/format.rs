//! AttributeFormat - combines an encoding with normalization and dimensionality.

use super::{EncodingType, Error, Result};
use std::fmt;

/// AttributeFormat describes how one logical element is stored.
///
/// It combines an [`EncodingType`] with a normalization flag and a component
/// count. For example, a packed vertex color would be Uint8, normalized, 4.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeFormat {
    /// Encoding of each component
    pub encoding: EncodingType,
    /// Integer components map onto `[0, 1]` or `[-1, 1]`
    pub normalized: bool,
    /// Number of components (1 for scalar, 3 for Vec3, 16 for Mat4, etc.)
    pub dimensions: u8,
}

impl AttributeFormat {
    /// Create a new format.
    #[inline]
    pub const fn new(encoding: EncodingType, normalized: bool, dimensions: u8) -> Self {
        Self { encoding, normalized, dimensions }
    }

    /// Create an unnormalized format.
    #[inline]
    pub const fn plain(encoding: EncodingType, dimensions: u8) -> Self {
        Self::new(encoding, false, dimensions)
    }

    /// Create a normalized format.
    #[inline]
    pub const fn normalized(encoding: EncodingType, dimensions: u8) -> Self {
        Self::new(encoding, true, dimensions)
    }

    /// Returns the packed size in bytes of one element.
    #[inline]
    pub const fn num_bytes(&self) -> usize {
        self.encoding.num_bytes() * self.dimensions as usize
    }

    /// Check the encoding/normalization combination and the component count.
    ///
    /// Float32 ignores the normalized flag; uint32 cannot be normalized.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(Error::config("attribute format needs at least one component"));
        }
        if self.normalized && self.encoding == EncodingType::Uint32 {
            return Err(Error::config(format!(
                "{} components cannot be normalized",
                self.encoding
            )));
        }
        Ok(())
    }

    /// Returns true if `validate` would succeed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    // === Common predefined formats ===

    // Floats
    pub const FLOAT: Self = Self::plain(EncodingType::Float32, 1);
    pub const VEC2F: Self = Self::plain(EncodingType::Float32, 2);
    pub const VEC3F: Self = Self::plain(EncodingType::Float32, 3);
    pub const VEC4F: Self = Self::plain(EncodingType::Float32, 4);
    pub const QUATF: Self = Self::plain(EncodingType::Float32, 4);

    // Matrices (float32) - stored as packed component count
    pub const MAT2F: Self = Self::plain(EncodingType::Float32, 4);
    pub const MAT3X2F: Self = Self::plain(EncodingType::Float32, 6);
    pub const MAT3F: Self = Self::plain(EncodingType::Float32, 9);
    pub const MAT4X3F: Self = Self::plain(EncodingType::Float32, 12);
    pub const MAT4F: Self = Self::plain(EncodingType::Float32, 16);

    // Texture coordinates
    pub const VEC2_UNORM8: Self = Self::normalized(EncodingType::Uint8, 2);
    pub const VEC2_UNORM16: Self = Self::normalized(EncodingType::Uint16, 2);

    // Colors and skin weights
    pub const VEC3_UNORM8: Self = Self::normalized(EncodingType::Uint8, 3);
    pub const VEC4_UNORM8: Self = Self::normalized(EncodingType::Uint8, 4);
    pub const VEC4_UNORM16: Self = Self::normalized(EncodingType::Uint16, 4);

    // Quantized normals, tangents and rotations
    pub const VEC3_SNORM8: Self = Self::normalized(EncodingType::Int8, 3);
    pub const VEC3_SNORM16: Self = Self::normalized(EncodingType::Int16, 3);
    pub const VEC4_SNORM8: Self = Self::normalized(EncodingType::Int8, 4);
    pub const VEC4_SNORM16: Self = Self::normalized(EncodingType::Int16, 4);

    // Joints and indices
    pub const VEC4_U8: Self = Self::plain(EncodingType::Uint8, 4);
    pub const VEC4_U16: Self = Self::plain(EncodingType::Uint16, 4);
    pub const INDEX_U8: Self = Self::plain(EncodingType::Uint8, 1);
    pub const INDEX_U16: Self = Self::plain(EncodingType::Uint16, 1);
    pub const INDEX_U32: Self = Self::plain(EncodingType::Uint32, 1);
}

impl Default for AttributeFormat {
    fn default() -> Self {
        Self::FLOAT
    }
}

impl fmt::Debug for AttributeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.normalized, self.encoding) {
            (true, EncodingType::Int8) => "snorm8",
            (true, EncodingType::Uint8) => "unorm8",
            (true, EncodingType::Int16) => "snorm16",
            (true, EncodingType::Uint16) => "unorm16",
            (_, e) => e.name(),
        };
        if self.dimensions == 1 {
            write!(f, "{}", name)
        } else {
            write!(f, "{}[{}]", name, self.dimensions)
        }
    }
}

impl fmt::Display for AttributeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Placement of an accessor inside a byte region.
///
/// `count` is the requested element count; the effective count is clamped
/// to what the region can hold. A `byte_stride` of zero means tightly packed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessorLayout {
    pub byte_offset: usize,
    pub count: usize,
    pub byte_stride: usize,
    pub format: AttributeFormat,
}

impl AccessorLayout {
    /// Layout covering a whole region, tightly packed.
    #[inline]
    pub const fn packed(format: AttributeFormat) -> Self {
        Self { byte_offset: 0, count: usize::MAX, byte_stride: 0, format }
    }

    /// Layout with explicit placement.
    #[inline]
    pub const fn new(byte_offset: usize, count: usize, byte_stride: usize, format: AttributeFormat) -> Self {
        Self { byte_offset, count, byte_stride, format }
    }

    pub const fn with_offset(mut self, byte_offset: usize) -> Self {
        self.byte_offset = byte_offset;
        self
    }

    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub const fn with_stride(mut self, byte_stride: usize) -> Self {
        self.byte_stride = byte_stride;
        self
    }

    /// Stride actually used between elements.
    #[inline]
    pub const fn effective_stride(&self) -> usize {
        let packed = self.format.num_bytes();
        if self.byte_stride > packed { self.byte_stride } else { packed }
    }

    /// Number of elements a region of `region_len` bytes can hold with this layout.
    ///
    /// The last element does not need trailing stride padding, only its packed bytes.
    pub fn effective_count(&self, region_len: usize) -> usize {
        let stride = self.effective_stride();
        if stride == 0 {
            return 0;
        }
        let available = region_len.saturating_sub(self.byte_offset);
        let mut rows = available / stride;
        if available % stride >= self.format.num_bytes() {
            rows += 1;
        }
        rows.min(self.count)
    }
}
