//! Accessor views over strided byte regions.
//!
//! - [`StridedAccessor`] - component-level codec over one byte region
//! - [`TypedArray`] - fixed-layout element views (vectors, quaternions, matrices)
//! - [`MultiArray`] - element views with a runtime component count
//! - [`IndexArray`] - exact unsigned integer views
//! - [`SparseArray`] - read-only dense view with index-keyed overrides
//!
//! Bulk copy, fill and visitor loops live in [`bulk`] and pick a sequential
//! or rayon-parallel schedule per call.

pub mod bulk;
mod array;
mod codec;
mod index;
mod layout;
mod list;
mod multi;
mod sparse;

pub use array::*;
pub use bulk::{ComponentVisitor, Schedule, Traversal, PARALLEL_THRESHOLD};
pub use codec::{StridedAccessor, WireCodec};
pub use index::IndexArray;
pub use layout::*;
pub use list::{AccessorList, AccessorListMut, FixedLength, Iter};
pub use multi::{Components, MultiArray};
pub use sparse::SparseArray;
