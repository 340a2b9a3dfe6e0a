//! Bulk traversal over strided accessors.
//!
//! Bulk copy, fill and visitor loops run either sequentially or fanned out on
//! the rayon pool. Both schedules produce identical output; the parallel one
//! only splits rows (or components) into disjoint partitions and always joins
//! before returning. Run inside `ThreadPool::install` to use a host pool.

use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use super::codec::{StridedAccessor, WireCodec};
use crate::util::{Error, Result};

/// Minimum component count before bulk loops go parallel.
pub const PARALLEL_THRESHOLD: usize = 1 << 15;

/// Row scratch buffer; inline up to a 4x4 matrix.
pub(crate) type RowBuf = SmallVec<[f32; 16]>;

/// Traversal order of a component visitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Visit every component of a row before moving to the next row.
    #[default]
    RowAndComponent,
    /// Visit one component across all rows before moving to the next component.
    /// Only float32 data honours this order; other encodings fall back to
    /// [`Traversal::RowAndComponent`].
    ComponentMajor,
}

/// How a bulk loop is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Schedule {
    Sequential,
    Parallel,
}

impl Schedule {
    /// Parallel only for the hot vertex encodings (float32, plain uint8)
    /// and only once there is enough work to split.
    pub fn select(codec: WireCodec, rows: usize, dimensions: usize) -> Self {
        if codec.is_parallel_candidate() && rows.saturating_mul(dimensions) >= PARALLEL_THRESHOLD {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Handler for `(row, component, value)` triples.
///
/// Visitors may be called from several threads at once.
pub trait ComponentVisitor: Sync {
    fn visit(&self, row: usize, component: usize, value: f32);
}

impl<F> ComponentVisitor for F
where
    F: Fn(usize, usize, f32) + Sync,
{
    #[inline]
    fn visit(&self, row: usize, component: usize, value: f32) {
        self(row, component, value)
    }
}

#[inline]
fn decode_row(codec: WireCodec, bytes: &[u8], out: &mut [f32]) {
    let width = codec.width();
    for (component, slot) in out.iter_mut().enumerate() {
        *slot = codec.decode(&bytes[component * width..]);
    }
}

#[inline]
fn encode_row(codec: WireCodec, values: &[f32], bytes: &mut [u8]) {
    let width = codec.width();
    for (component, &value) in values.iter().enumerate() {
        codec.encode(value, &mut bytes[component * width..]);
    }
}

impl<B: AsRef<[u8]>> StridedAccessor<B> {
    /// Decode rows into `dst` as flat components, `dimensions` per row.
    ///
    /// Copies `min(len, dst.len() / dimensions)` whole rows and returns that
    /// row count. Never writes past `dst`.
    pub fn copy_components_to(&self, dst: &mut [f32]) -> usize {
        let rows = self.len().min(dst.len() / self.dimensions());
        let schedule = Schedule::select(self.codec(), rows, self.dimensions());
        self.copy_components_with(dst, schedule)
    }

    /// [`copy_components_to`](Self::copy_components_to) with an explicit schedule.
    pub fn copy_components_with(&self, dst: &mut [f32], schedule: Schedule) -> usize {
        let dims = self.dimensions();
        let rows = self.len().min(dst.len() / dims);
        let stride = self.byte_stride();
        let codec = self.codec();
        let bytes = self.bytes();
        trace!(rows, dims, ?schedule, "copy components");

        let dst = &mut dst[..rows * dims];
        match schedule {
            Schedule::Parallel => dst
                .par_chunks_mut(dims)
                .enumerate()
                .for_each(|(row, out)| decode_row(codec, &bytes[row * stride..], out)),
            Schedule::Sequential => dst
                .chunks_mut(dims)
                .enumerate()
                .for_each(|(row, out)| decode_row(codec, &bytes[row * stride..], out)),
        }
        rows
    }

    /// Visit every `(row, component, value)` triple.
    pub fn for_each_component<V: ComponentVisitor>(&self, traversal: Traversal, visitor: &V) {
        let schedule = Schedule::select(self.codec(), self.len(), self.dimensions());
        self.for_each_component_with(traversal, schedule, visitor)
    }

    /// [`for_each_component`](Self::for_each_component) with an explicit schedule.
    pub fn for_each_component_with<V: ComponentVisitor>(
        &self,
        traversal: Traversal,
        schedule: Schedule,
        visitor: &V,
    ) {
        let rows = self.len();
        let dims = self.dimensions();
        let stride = self.byte_stride();
        let codec = self.codec();
        let width = codec.width();
        let bytes = self.bytes();

        let traversal = if codec == WireCodec::Float32 {
            traversal
        } else {
            Traversal::RowAndComponent
        };
        trace!(rows, dims, ?traversal, ?schedule, "visit components");

        let visit_row = |row: usize| {
            let base = &bytes[row * stride..];
            for component in 0..dims {
                visitor.visit(row, component, codec.decode(&base[component * width..]));
            }
        };
        let visit_column = |component: usize| {
            for row in 0..rows {
                let offset = row * stride + component * width;
                visitor.visit(row, component, codec.decode(&bytes[offset..]));
            }
        };

        match (traversal, schedule) {
            (Traversal::RowAndComponent, Schedule::Parallel) => {
                (0..rows).into_par_iter().for_each(visit_row)
            }
            (Traversal::RowAndComponent, Schedule::Sequential) => (0..rows).for_each(visit_row),
            (Traversal::ComponentMajor, Schedule::Parallel) => {
                (0..dims).into_par_iter().for_each(visit_column)
            }
            (Traversal::ComponentMajor, Schedule::Sequential) => (0..dims).for_each(visit_column),
        }
    }

    /// Decode each row and hand it to `f` as a component slice.
    pub(crate) fn for_each_row<F>(&self, f: F)
    where
        F: Fn(usize, &[f32]) + Sync,
    {
        let schedule = Schedule::select(self.codec(), self.len(), self.dimensions());
        self.for_each_row_with(schedule, f)
    }

    pub(crate) fn for_each_row_with<F>(&self, schedule: Schedule, f: F)
    where
        F: Fn(usize, &[f32]) + Sync,
    {
        let rows = self.len();
        let dims = self.dimensions();
        let stride = self.byte_stride();
        let codec = self.codec();
        let bytes = self.bytes();
        trace!(rows, dims, ?schedule, "visit rows");

        match schedule {
            Schedule::Parallel => (0..rows).into_par_iter().for_each_init(
                || -> RowBuf { smallvec![0.0; dims] },
                |buf, row| {
                    decode_row(codec, &bytes[row * stride..], &mut buf[..]);
                    f(row, &buf[..]);
                },
            ),
            Schedule::Sequential => {
                let mut buf: RowBuf = smallvec![0.0; dims];
                for row in 0..rows {
                    decode_row(codec, &bytes[row * stride..], &mut buf[..]);
                    f(row, &buf[..]);
                }
            }
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> StridedAccessor<B> {
    /// Encode flat components from `src` into rows starting at `first_row`.
    ///
    /// Writes `min(len - first_row, src.len() / dimensions)` whole rows and
    /// returns that row count. A non-finite value anywhere in the written
    /// range fails the whole call before any byte changes.
    pub fn fill_components(&mut self, src: &[f32], first_row: usize) -> Result<usize> {
        let rows = self.len().saturating_sub(first_row).min(src.len() / self.dimensions());
        let schedule = Schedule::select(self.codec(), rows, self.dimensions());
        self.fill_components_with(src, first_row, schedule)
    }

    /// [`fill_components`](Self::fill_components) with an explicit schedule.
    pub fn fill_components_with(
        &mut self,
        src: &[f32],
        first_row: usize,
        schedule: Schedule,
    ) -> Result<usize> {
        let dims = self.dimensions();
        let rows = self.len().saturating_sub(first_row).min(src.len() / dims);
        let src = &src[..rows * dims];
        if let Some(&value) = src.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidValue { value });
        }
        if rows == 0 {
            return Ok(0);
        }

        let stride = self.byte_stride();
        let codec = self.codec();
        trace!(rows, dims, first_row, ?schedule, "fill components");

        let bytes = &mut self.bytes_mut()[first_row * stride..];
        match schedule {
            Schedule::Parallel => bytes
                .par_chunks_mut(stride)
                .zip(src.par_chunks(dims))
                .for_each(|(row_bytes, values)| encode_row(codec, values, row_bytes)),
            Schedule::Sequential => bytes
                .chunks_mut(stride)
                .zip(src.chunks(dims))
                .for_each(|(row_bytes, values)| encode_row(codec, values, row_bytes)),
        }
        Ok(rows)
    }
}
