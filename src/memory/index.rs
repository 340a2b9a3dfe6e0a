//! Unsigned integer arrays read and written as exact `u32` values.

use std::fmt;

use super::codec::StridedAccessor;
use super::list::{AccessorList, AccessorListMut};
use crate::util::{AccessorLayout, AttributeFormat, EncodingType, Error, Result};

/// Scalar view over uint8/uint16/uint32 components.
///
/// Values never go through `f32`, so uint32 indices above 2^24 stay exact.
#[derive(Clone)]
pub struct IndexArray<B> {
    accessor: StridedAccessor<B>,
}

impl<B: AsRef<[u8]>> IndexArray<B> {
    pub fn new(data: B, byte_offset: usize, count: usize, byte_stride: usize, encoding: EncodingType) -> Result<Self> {
        let format = AttributeFormat::plain(encoding, 1);
        Self::with_layout(data, AccessorLayout::new(byte_offset, count, byte_stride, format))
    }

    pub fn packed(data: B, encoding: EncodingType) -> Result<Self> {
        Self::new(data, 0, usize::MAX, 0, encoding)
    }

    /// Wrap `data` with a full layout. Only unnormalized unsigned scalar
    /// formats are accepted.
    pub fn with_layout(data: B, layout: AccessorLayout) -> Result<Self> {
        let format = layout.format;
        match format.encoding {
            EncodingType::Uint8 | EncodingType::Uint16 | EncodingType::Uint32 if !format.normalized => {}
            _ => return Err(Error::config(format!("{} is not an index format", format))),
        }
        if format.dimensions != 1 {
            return Err(Error::DimensionMismatch { expected: 1, actual: format.dimensions as usize });
        }
        Ok(Self { accessor: StridedAccessor::new(data, layout)? })
    }

    #[inline]
    pub fn encoding(&self) -> EncodingType {
        self.accessor.encoding()
    }

    #[inline]
    pub fn accessor(&self) -> &StridedAccessor<B> {
        &self.accessor
    }

    pub fn into_inner(self) -> B {
        self.accessor.into_inner()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Result<u32> {
        self.accessor.get_uint(index, 0)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> IndexArray<B> {
    /// Store `value`; fails with `InvalidValue` if it does not fit the encoding.
    #[inline]
    pub fn set(&mut self, index: usize, value: u32) -> Result<()> {
        self.accessor.set_uint(index, 0, value)
    }

    /// Store `src` starting at `offset`.
    ///
    /// Writes `min(len - offset, src.len())` values and returns that count.
    /// A value that does not fit the encoding fails the call before any write.
    pub fn fill(&mut self, src: &[u32], offset: usize) -> Result<usize> {
        let rows = self.accessor.len().saturating_sub(offset).min(src.len());
        let limit = match self.encoding() {
            EncodingType::Uint8 => u8::MAX as u32,
            EncodingType::Uint16 => u16::MAX as u32,
            _ => u32::MAX,
        };
        let src = &src[..rows];
        if let Some(&value) = src.iter().find(|&&v| v > limit) {
            return Err(Error::InvalidValue { value: value as f32 });
        }
        for (row, &value) in src.iter().enumerate() {
            self.accessor.set_uint(offset + row, 0, value)?;
        }
        Ok(rows)
    }
}

impl<B: AsRef<[u8]>> AccessorList for IndexArray<B> {
    type Item = u32;

    fn view_name(&self) -> &'static str {
        "IndexArray"
    }

    fn len(&self) -> usize {
        self.accessor.len()
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn get(&self, index: usize) -> Result<u32> {
        IndexArray::get(self, index)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> AccessorListMut for IndexArray<B> {
    fn set(&mut self, index: usize, item: &u32) -> Result<()> {
        IndexArray::set(self, index, *item)
    }

    fn fill(&mut self, src: &[u32], offset: usize) -> Result<usize> {
        IndexArray::fill(self, src, offset)
    }
}

impl<B> fmt::Debug for IndexArray<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IndexArray").field(&self.accessor).finish()
    }
}
