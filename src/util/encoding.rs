//! Wire-level component encodings - the fundamental storage types of accessor data.

use std::fmt;

use super::{Error, Result};

/// Numeric encoding of a single stored component.
///
/// These are the component types a binary buffer may carry.
/// Each type has a fixed size and a little-endian binary representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EncodingType {
    /// Signed 8-bit integer
    Int8 = 0,
    /// Unsigned 8-bit integer
    Uint8 = 1,
    /// Signed 16-bit integer
    Int16 = 2,
    /// Unsigned 16-bit integer
    Uint16 = 3,
    /// Unsigned 32-bit integer
    Uint32 = 4,
    /// 32-bit floating point (IEEE 754 single precision)
    #[default]
    Float32 = 5,
}

impl EncodingType {
    /// Number of supported encodings.
    pub const COUNT: usize = 6;

    /// All encodings, in tag order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Uint32,
        Self::Float32,
    ];

    /// Returns the size in bytes of a single component of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Uint8 => 1,
            Self::Int16 => 2,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
            Self::Float32 => 4,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Float32 => "float32",
        }
    }

    /// Parse an encoding from its name string.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| Error::config(format!("unsupported encoding name '{}'", name)))
    }

    /// glTF `componentType` code of this encoding.
    #[inline]
    pub const fn gl_code(self) -> u32 {
        match self {
            Self::Int8 => 5120,
            Self::Uint8 => 5121,
            Self::Int16 => 5122,
            Self::Uint16 => 5123,
            Self::Uint32 => 5125,
            Self::Float32 => 5126,
        }
    }

    /// Convert from a glTF `componentType` code.
    ///
    /// 5124 (signed 32-bit) has no accessor encoding and is rejected with
    /// every other unknown code.
    pub fn from_gl_code(code: u32) -> Result<Self> {
        match code {
            5120 => Ok(Self::Int8),
            5121 => Ok(Self::Uint8),
            5122 => Ok(Self::Int16),
            5123 => Ok(Self::Uint16),
            5125 => Ok(Self::Uint32),
            5126 => Ok(Self::Float32),
            _ => Err(Error::config(format!("unsupported component type {}", code))),
        }
    }

    /// Returns true if this is an integer type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float32)
    }

    /// Returns true if this is a signed integer type.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16)
    }

    /// Returns true if values of this type may be stored normalized.
    ///
    /// Only 8 and 16 bit integers map onto `[0, 1]` / `[-1, 1]`.
    #[inline]
    pub const fn supports_normalization(self) -> bool {
        matches!(self, Self::Int8 | Self::Uint8 | Self::Int16 | Self::Uint16)
    }

    /// Divisor used by normalized decoding, `None` when not normalizable.
    #[inline]
    pub const fn normalized_range(self) -> Option<f32> {
        match self {
            Self::Int8 => Some(127.0),
            Self::Uint8 => Some(255.0),
            Self::Int16 => Some(32767.0),
            Self::Uint16 => Some(65535.0),
            Self::Uint32 | Self::Float32 => None,
        }
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u32> for EncodingType {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_gl_code(code)
    }
}
