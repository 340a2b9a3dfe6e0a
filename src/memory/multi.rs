//! Dynamic-dimension arrays whose items are small component vectors.

use std::fmt;

use smallvec::SmallVec;

use super::bulk::{ComponentVisitor, Traversal};
use super::codec::StridedAccessor;
use super::list::{AccessorList, AccessorListMut};
use crate::util::{AccessorLayout, AttributeFormat, EncodingType, Error, Result};

/// Components of one [`MultiArray`] element. Inline up to 16 components.
pub type Components = SmallVec<[f32; 16]>;

/// View whose element size is chosen at runtime.
///
/// Used where the component count is only known from document data, such as
/// morph target weights or custom vertex attributes.
#[derive(Clone)]
pub struct MultiArray<B> {
    accessor: StridedAccessor<B>,
}

impl<B: AsRef<[u8]>> MultiArray<B> {
    pub fn new(data: B, layout: AccessorLayout) -> Result<Self> {
        Ok(Self { accessor: StridedAccessor::new(data, layout)? })
    }

    /// Wrap the whole region, tightly packed.
    pub fn packed(data: B, encoding: EncodingType, normalized: bool, dimensions: u8) -> Result<Self> {
        Self::new(data, AccessorLayout::packed(AttributeFormat::new(encoding, normalized, dimensions)))
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.accessor.dimensions()
    }

    #[inline]
    pub fn accessor(&self) -> &StridedAccessor<B> {
        &self.accessor
    }

    pub fn into_inner(self) -> B {
        self.accessor.into_inner()
    }

    pub fn get(&self, index: usize) -> Result<Components> {
        let mut item: Components = SmallVec::from_elem(0.0, self.dimensions());
        self.accessor.read_row(index, &mut item[..])?;
        Ok(item)
    }

    /// Decode one element into `out`, which must hold `dimensions` floats.
    pub fn copy_item_to(&self, index: usize, out: &mut [f32]) -> Result<()> {
        let dims = self.dimensions();
        let actual = out.len();
        let out = out.get_mut(..dims).ok_or(Error::DimensionMismatch { expected: dims, actual })?;
        self.accessor.read_row(index, out)
    }

    /// Decode into `dst[offset..]`; returns the element count copied.
    pub fn copy_to(&self, dst: &mut [Components], offset: usize) -> usize {
        let Some(dst) = dst.get_mut(offset..) else {
            return 0;
        };
        let dims = self.dimensions();
        let rows = self.accessor.len().min(dst.len());
        let mut scratch = vec![0.0f32; rows * dims];
        self.accessor.copy_components_to(&mut scratch);
        for (slot, comps) in dst[..rows].iter_mut().zip(scratch.chunks_exact(dims)) {
            *slot = SmallVec::from_slice(comps);
        }
        rows
    }

    pub fn copy_components_to(&self, dst: &mut [f32]) -> usize {
        self.accessor.copy_components_to(dst)
    }

    /// Visit `(row, component, value)` triples in the requested order.
    pub fn for_each_component<V: ComponentVisitor>(&self, traversal: Traversal, visitor: &V) {
        self.accessor.for_each_component(traversal, visitor);
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> MultiArray<B> {
    /// Encode one element. `item` must carry exactly `dimensions` components.
    pub fn set(&mut self, index: usize, item: &[f32]) -> Result<()> {
        let dims = self.dimensions();
        if item.len() != dims {
            return Err(Error::DimensionMismatch { expected: dims, actual: item.len() });
        }
        self.accessor.write_row(index, item)
    }

    /// Encode elements starting at `offset`. Every item must carry
    /// `dimensions` components; a mismatch fails before any write.
    pub fn fill(&mut self, src: &[Components], offset: usize) -> Result<usize> {
        let dims = self.dimensions();
        if let Some(bad) = src.iter().find(|item| item.len() != dims) {
            return Err(Error::DimensionMismatch { expected: dims, actual: bad.len() });
        }
        let flat: Vec<f32> = src.iter().flat_map(|item| item.iter().copied()).collect();
        self.accessor.fill_components(&flat, offset)
    }

    pub fn fill_components(&mut self, src: &[f32], offset: usize) -> Result<usize> {
        self.accessor.fill_components(src, offset)
    }
}

impl<B: AsRef<[u8]>> AccessorList for MultiArray<B> {
    type Item = Components;

    fn view_name(&self) -> &'static str {
        "MultiArray"
    }

    fn len(&self) -> usize {
        self.accessor.len()
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn get(&self, index: usize) -> Result<Components> {
        MultiArray::get(self, index)
    }

    fn copy_to(&self, dst: &mut [Components], offset: usize) -> usize {
        MultiArray::copy_to(self, dst, offset)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> AccessorListMut for MultiArray<B> {
    fn set(&mut self, index: usize, item: &Components) -> Result<()> {
        MultiArray::set(self, index, item.as_slice())
    }

    fn fill(&mut self, src: &[Components], offset: usize) -> Result<usize> {
        MultiArray::fill(self, src, offset)
    }
}

impl<B> fmt::Debug for MultiArray<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MultiArray").field(&self.accessor).finish()
    }
}
