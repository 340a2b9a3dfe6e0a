//! Sparse overlay - a dense view with index-keyed overrides.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::array::TypedArray;
use super::bulk::ComponentVisitor;
use super::index::IndexArray;
use super::layout::ElementLayout;
use super::list::{AccessorList, AccessorListMut};
use crate::util::{Error, Result};

/// Read-only merge of a dense `bottom` view and a `top` view of overrides.
///
/// Element `i` comes from `top[map[i]]` when `i` is overridden and from
/// `bottom[i]` otherwise. The map is built once from an index list; when an
/// index repeats, the later position wins.
pub struct SparseArray<Bottom, Top> {
    bottom: Bottom,
    top: Top,
    mapping: HashMap<usize, usize>,
}

impl<Bottom, Top> SparseArray<Bottom, Top>
where
    Bottom: AccessorList,
    Top: AccessorList<Item = Bottom::Item>,
{
    /// Build the overlay. `indices[k]` names the dense row replaced by `top[k]`.
    ///
    /// Fails if the index list is longer than `top`.
    pub fn new<I>(bottom: Bottom, top: Top, indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let count = bottom.len();
        let values = top.len();
        let mut mapping = HashMap::new();
        for (position, index) in indices.into_iter().enumerate() {
            if position >= values {
                return Err(Error::config(format!(
                    "sparse index list is longer than its {} override values",
                    values
                )));
            }
            let index = index as usize;
            if index >= count {
                warn!(index, count, "sparse index past the end of the dense view");
            }
            mapping.insert(index, position);
        }
        debug!(count, overrides = mapping.len(), "built sparse overlay");

        Ok(Self { bottom, top, mapping })
    }

    /// Build the overlay from an index list stored in a byte region.
    pub fn from_index_array<B: AsRef<[u8]>>(bottom: Bottom, top: Top, indices: &IndexArray<B>) -> Result<Self> {
        let indices = (0..indices.len()).map(|i| indices.get(i)).collect::<Result<Vec<u32>>>()?;
        Self::new(bottom, top, indices)
    }

    #[inline]
    pub fn bottom(&self) -> &Bottom {
        &self.bottom
    }

    #[inline]
    pub fn top(&self) -> &Top {
        &self.top
    }

    /// Number of distinct overridden rows.
    pub fn override_count(&self) -> usize {
        self.mapping.len()
    }

    /// Position in `top` that replaces row `index`, if any.
    #[inline]
    pub fn override_of(&self, index: usize) -> Option<usize> {
        self.mapping.get(&index).copied()
    }

    pub fn get(&self, index: usize) -> Result<Bottom::Item> {
        if index >= self.bottom.len() {
            return Err(Error::OutOfRange { index, count: self.bottom.len() });
        }
        match self.mapping.get(&index) {
            Some(&position) => self.top.get(position),
            None => self.bottom.get(index),
        }
    }

    /// Visit every `(row, element)` pair in row order.
    pub fn for_each<F>(&self, mut handler: F) -> Result<()>
    where
        F: FnMut(usize, Bottom::Item),
    {
        for row in 0..self.bottom.len() {
            handler(row, self.get(row)?);
        }
        Ok(())
    }
}

impl<B1, B2, L> SparseArray<TypedArray<B1, L>, TypedArray<B2, L>>
where
    B1: AsRef<[u8]>,
    B2: AsRef<[u8]>,
    L: ElementLayout,
{
    /// Visit every `(row, component, value)` triple of the merged view in
    /// row order.
    pub fn for_each_component<V: ComponentVisitor>(&self, visitor: &V) -> Result<()> {
        let mut comps = [0.0f32; 16];
        let comps = &mut comps[..L::DIMENSIONS];
        self.for_each(|row, item| {
            L::encode(&item, comps);
            for (component, &value) in comps.iter().enumerate() {
                visitor.visit(row, component, value);
            }
        })
    }
}

impl<Bottom, Top> AccessorList for SparseArray<Bottom, Top>
where
    Bottom: AccessorList,
    Top: AccessorList<Item = Bottom::Item>,
{
    type Item = Bottom::Item;

    fn view_name(&self) -> &'static str {
        "SparseArray"
    }

    fn len(&self) -> usize {
        self.bottom.len()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn get(&self, index: usize) -> Result<Self::Item> {
        SparseArray::get(self, index)
    }

    /// Bulk copy of the dense view, then patch the overridden rows.
    ///
    /// Returns the number of leading rows copied; an override that cannot be
    /// read cuts the count at its row.
    fn copy_to(&self, dst: &mut [Self::Item], offset: usize) -> usize {
        let mut rows = self.bottom.copy_to(dst, offset);
        let Some(dst) = dst.get_mut(offset..) else {
            return rows;
        };
        for (&index, &position) in &self.mapping {
            if index < rows {
                match self.top.get(position) {
                    Ok(item) => dst[index] = item,
                    Err(_) => rows = index,
                }
            }
        }
        rows
    }
}

impl<Bottom, Top> AccessorListMut for SparseArray<Bottom, Top>
where
    Bottom: AccessorList,
    Top: AccessorList<Item = Bottom::Item>,
{
    fn set(&mut self, _index: usize, _item: &Self::Item) -> Result<()> {
        Err(Error::unsupported("set", self.view_name()))
    }

    fn fill(&mut self, _src: &[Self::Item], _offset: usize) -> Result<usize> {
        Err(Error::unsupported("fill", self.view_name()))
    }
}

impl<Bottom: fmt::Debug, Top: fmt::Debug> fmt::Debug for SparseArray<Bottom, Top> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseArray")
            .field("bottom", &self.bottom)
            .field("top", &self.top)
            .field("overrides", &self.mapping.len())
            .finish()
    }
}
