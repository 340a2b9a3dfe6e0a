//! List-like interface shared by typed arrays and sparse overlays.
//!
//! Views are fixed-length projections over caller memory. They expose index
//! access, iteration, search and bulk transfer; they never resize.

use std::iter::FusedIterator;

use crate::util::{Error, Result};

/// Read access to a fixed-length sequence of decoded elements.
pub trait AccessorList {
    type Item: Clone + PartialEq;

    /// Name used in error messages.
    fn view_name(&self) -> &'static str;

    /// Number of elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if [`AccessorListMut`] writes are never accepted.
    fn is_read_only(&self) -> bool;

    /// Decode the element at `index`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// First index whose element equals `item` exactly, component by component.
    fn index_of(&self, item: &Self::Item) -> Option<usize> {
        (0..self.len()).find(|&i| self.get(i).is_ok_and(|v| v == *item))
    }

    fn contains(&self, item: &Self::Item) -> bool {
        self.index_of(item).is_some()
    }

    /// Decode elements into `dst[offset..]`.
    ///
    /// Copies `min(len, dst.len() - offset)` elements and returns that count.
    /// Copying stops at the first element that fails to decode, and the
    /// count covers only the elements written.
    fn copy_to(&self, dst: &mut [Self::Item], offset: usize) -> usize {
        let dst = dst.get_mut(offset..).unwrap_or_default();
        let rows = self.len().min(dst.len());
        for (i, slot) in dst[..rows].iter_mut().enumerate() {
            match self.get(i) {
                Ok(v) => *slot = v,
                Err(_) => return i,
            }
        }
        rows
    }

    /// Iterate decoded elements in index order.
    ///
    /// Every view in this crate decodes any index below `len`, so the
    /// iterator yields exactly `len` items.
    fn iter(&self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter { list: self, front: 0, back: self.len() }
    }

    /// Decode every element into a new vector.
    fn to_vec(&self) -> Vec<Self::Item>
    where
        Self: Sized,
    {
        self.iter().collect()
    }
}

/// Write access for views over mutable memory.
pub trait AccessorListMut: AccessorList {
    /// Encode `item` at `index`. Fails without writing on non-finite input.
    fn set(&mut self, index: usize, item: &Self::Item) -> Result<()>;

    /// Encode `src` into elements starting at `offset`.
    ///
    /// Writes `min(len - offset, src.len())` elements and returns that count.
    /// Views whose `set` can reject a value override this to validate the
    /// whole range before the first write.
    fn fill(&mut self, src: &[Self::Item], offset: usize) -> Result<usize> {
        let rows = self.len().saturating_sub(offset).min(src.len());
        for (i, item) in src[..rows].iter().enumerate() {
            self.set(offset + i, item)?;
        }
        Ok(rows)
    }
}

/// Structural mutation of a fixed-length view.
///
/// Implemented for every [`AccessorList`]; each call fails with
/// [`Error::UnsupportedOperation`] and leaves the data untouched.
pub trait FixedLength: AccessorList {
    fn insert(&mut self, _index: usize, _item: Self::Item) -> Result<()> {
        Err(Error::unsupported("insert", self.view_name()))
    }

    fn remove_at(&mut self, _index: usize) -> Result<Self::Item> {
        Err(Error::unsupported("remove_at", self.view_name()))
    }

    fn push(&mut self, _item: Self::Item) -> Result<()> {
        Err(Error::unsupported("push", self.view_name()))
    }

    fn remove(&mut self, _item: &Self::Item) -> Result<bool> {
        Err(Error::unsupported("remove", self.view_name()))
    }

    fn clear(&mut self) -> Result<()> {
        Err(Error::unsupported("clear", self.view_name()))
    }
}

impl<T: AccessorList + ?Sized> FixedLength for T {}

/// Iterator over the decoded elements of an [`AccessorList`].
pub struct Iter<'a, L: ?Sized> {
    list: &'a L,
    front: usize,
    back: usize,
}

impl<L: AccessorList> Iterator for Iter<'_, L> {
    type Item = L::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        match self.list.get(self.front) {
            Ok(item) => {
                self.front += 1;
                Some(item)
            }
            Err(_) => {
                self.front = self.back;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<L: AccessorList> DoubleEndedIterator for Iter<'_, L> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        match self.list.get(self.back - 1) {
            Ok(item) => {
                self.back -= 1;
                Some(item)
            }
            Err(_) => {
                self.back = self.front;
                None
            }
        }
    }
}

impl<L: AccessorList> ExactSizeIterator for Iter<'_, L> {}

impl<L: AccessorList> FusedIterator for Iter<'_, L> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Squares(usize);

    impl AccessorList for Squares {
        type Item = usize;

        fn view_name(&self) -> &'static str {
            "Squares"
        }

        fn len(&self) -> usize {
            self.0
        }

        fn is_read_only(&self) -> bool {
            true
        }

        fn get(&self, index: usize) -> Result<usize> {
            if index >= self.0 {
                return Err(Error::OutOfRange { index, count: self.0 });
            }
            Ok(index * index)
        }
    }

    #[test]
    fn test_defaults() {
        let list = Squares(5);
        assert_eq!(list.to_vec(), vec![0, 1, 4, 9, 16]);
        assert_eq!(list.iter().rev().next(), Some(16));
        assert_eq!(list.iter().len(), 5);
        assert_eq!(list.index_of(&9), Some(3));
        assert!(!list.contains(&10));
    }

    #[test]
    fn test_copy_to_clamps() {
        let list = Squares(5);
        let mut dst = [0usize; 4];
        assert_eq!(list.copy_to(&mut dst, 1), 3);
        assert_eq!(dst, [0, 0, 1, 4]);
        assert_eq!(list.copy_to(&mut dst, 9), 0);
    }

    #[test]
    fn test_structural_mutation_rejected() {
        let mut list = Squares(3);
        assert!(matches!(list.insert(0, 1), Err(Error::UnsupportedOperation { operation: "insert", .. })));
        assert!(list.push(1).is_err());
        assert!(list.remove_at(0).is_err());
        assert!(list.remove(&0).is_err());
        assert!(list.clear().is_err());
        assert_eq!(list.len(), 3);
    }

    /// Fails to decode index 2.
    struct Broken;

    impl AccessorList for Broken {
        type Item = u8;

        fn view_name(&self) -> &'static str {
            "Broken"
        }

        fn len(&self) -> usize {
            4
        }

        fn is_read_only(&self) -> bool {
            true
        }

        fn get(&self, index: usize) -> Result<u8> {
            match index {
                2 => Err(Error::OutOfRange { index, count: 2 }),
                0..=3 => Ok(index as u8),
                _ => Err(Error::OutOfRange { index, count: 4 }),
            }
        }
    }

    #[test]
    fn test_decode_failure_stops_copy_and_fuses_iter() {
        let list = Broken;
        let mut dst = [9u8; 4];
        assert_eq!(list.copy_to(&mut dst, 0), 2);
        assert_eq!(dst, [0, 1, 9, 9]);

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
