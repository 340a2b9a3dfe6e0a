//! Typed arrays - fixed-layout element views over a strided accessor.

use std::fmt;
use std::marker::PhantomData;

use super::bulk::{ComponentVisitor, Traversal};
use super::codec::StridedAccessor;
use super::layout::*;
use super::list::{AccessorList, AccessorListMut};
use crate::util::{AccessorLayout, AttributeFormat, EncodingType, Error, Result};

/// Typed view over a byte region: each element is `L::DIMENSIONS` components
/// composed into `L::Item`.
///
/// The view holds no buffer of its own. Reads need `B: AsRef<[u8]>`,
/// writes need `B: AsMut<[u8]>` as well.
#[derive(Clone)]
pub struct TypedArray<B, L> {
    accessor: StridedAccessor<B>,
    _layout: PhantomData<L>,
}

pub type ScalarArray<B> = TypedArray<B, Scalar>;
pub type Vector2Array<B> = TypedArray<B, Vector2>;
pub type Vector3Array<B> = TypedArray<B, Vector3>;
pub type Vector4Array<B> = TypedArray<B, Vector4>;
pub type QuaternionArray<B> = TypedArray<B, Quaternion>;
pub type Matrix2x2Array<B> = TypedArray<B, Matrix2x2>;
pub type Matrix3x2Array<B> = TypedArray<B, Matrix3x2>;
pub type Matrix3x3Array<B> = TypedArray<B, Matrix3x3>;
pub type Matrix4x3Array<B> = TypedArray<B, Matrix4x3>;
pub type Matrix4x4Array<B> = TypedArray<B, Matrix4x4>;

impl<B: AsRef<[u8]>, L: ElementLayout> TypedArray<B, L> {
    /// Wrap `data` starting at `byte_offset`.
    ///
    /// `count` is clamped to the elements the region holds; a `byte_stride`
    /// of zero means tightly packed.
    pub fn new(
        data: B,
        byte_offset: usize,
        count: usize,
        byte_stride: usize,
        encoding: EncodingType,
        normalized: bool,
    ) -> Result<Self> {
        let format = AttributeFormat::new(encoding, normalized, L::DIMENSIONS as u8);
        let layout = AccessorLayout::new(byte_offset, count, byte_stride, format);
        Self::with_layout(data, layout)
    }

    /// Wrap the whole region, tightly packed.
    pub fn packed(data: B, encoding: EncodingType, normalized: bool) -> Result<Self> {
        Self::new(data, 0, usize::MAX, 0, encoding, normalized)
    }

    /// Wrap `data` with a full layout; its dimensions must match `L`.
    pub fn with_layout(data: B, layout: AccessorLayout) -> Result<Self> {
        let dims = layout.format.dimensions as usize;
        if dims != L::DIMENSIONS {
            return Err(Error::DimensionMismatch { expected: L::DIMENSIONS, actual: dims });
        }
        Ok(Self {
            accessor: StridedAccessor::new(data, layout)?,
            _layout: PhantomData,
        })
    }

    /// Underlying component accessor.
    #[inline]
    pub fn accessor(&self) -> &StridedAccessor<B> {
        &self.accessor
    }

    pub fn into_inner(self) -> B {
        self.accessor.into_inner()
    }

    #[inline]
    pub fn format(&self) -> AttributeFormat {
        self.accessor.format()
    }

    /// Decode all components of the element at `index`.
    pub fn get(&self, index: usize) -> Result<L::Item> {
        let mut buf = [0.0f32; 16];
        let comps = &mut buf[..L::DIMENSIONS];
        self.accessor.read_row(index, comps)?;
        Ok(L::decode(comps))
    }

    /// Decode into `dst[offset..]` through the bulk engine.
    ///
    /// Copies `min(len, dst.len() - offset)` elements and returns that count.
    pub fn copy_to(&self, dst: &mut [L::Item], offset: usize) -> usize {
        let Some(dst) = dst.get_mut(offset..) else {
            return 0;
        };
        let rows = self.len().min(dst.len());
        let mut scratch = vec![0.0f32; rows * L::DIMENSIONS];
        self.accessor.copy_components_to(&mut scratch);
        for (slot, comps) in dst[..rows].iter_mut().zip(scratch.chunks_exact(L::DIMENSIONS)) {
            *slot = L::decode(comps);
        }
        rows
    }

    /// Decode flat components into `dst`; see [`StridedAccessor::copy_components_to`].
    pub fn copy_components_to(&self, dst: &mut [f32]) -> usize {
        self.accessor.copy_components_to(dst)
    }

    /// Visit every `(row, element)` pair. Large float32 and uint8 arrays are
    /// visited in parallel, so the handler may run on several threads.
    pub fn for_each<F>(&self, handler: F)
    where
        F: Fn(usize, L::Item) + Sync,
    {
        self.accessor.for_each_row(|row, comps| handler(row, L::decode(comps)));
    }

    /// Visit every `(row, component, value)` triple in row order.
    pub fn for_each_component<V: ComponentVisitor>(&self, visitor: &V) {
        self.accessor.for_each_component(Traversal::RowAndComponent, visitor);
    }

    /// Visit components with an explicit traversal order.
    pub fn for_each_component_with<V: ComponentVisitor>(&self, traversal: Traversal, visitor: &V) {
        self.accessor.for_each_component(traversal, visitor);
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, L: ElementLayout> TypedArray<B, L> {
    /// Encode `item` at `index`. Non-finite components fail before any write.
    pub fn set(&mut self, index: usize, item: &L::Item) -> Result<()> {
        let mut buf = [0.0f32; 16];
        let comps = &mut buf[..L::DIMENSIONS];
        L::encode(item, comps);
        self.accessor.write_row(index, comps)
    }

    /// Encode `src` into elements starting at `offset` through the bulk engine.
    ///
    /// Writes `min(len - offset, src.len())` elements and returns that count.
    pub fn fill(&mut self, src: &[L::Item], offset: usize) -> Result<usize> {
        let rows = self.len().saturating_sub(offset).min(src.len());
        let mut scratch = vec![0.0f32; rows * L::DIMENSIONS];
        for (item, comps) in src[..rows].iter().zip(scratch.chunks_exact_mut(L::DIMENSIONS)) {
            L::encode(item, comps);
        }
        self.accessor.fill_components(&scratch, offset)
    }

    /// Encode flat components starting at element `offset`.
    pub fn fill_components(&mut self, src: &[f32], offset: usize) -> Result<usize> {
        self.accessor.fill_components(src, offset)
    }
}

impl<B: AsRef<[u8]>, L: PodLayout> TypedArray<B, L> {
    /// Decode straight into `dst` without an intermediate buffer.
    pub fn copy_to_slice(&self, dst: &mut [L::Item]) -> usize {
        self.accessor.copy_components_to(L::as_components_mut(dst))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, L: PodLayout> TypedArray<B, L> {
    /// Encode `src` from the first element without an intermediate buffer.
    pub fn fill_from_slice(&mut self, src: &[L::Item]) -> Result<usize> {
        self.accessor.fill_components(L::as_components(src), 0)
    }
}

impl<B: AsRef<[u8]>, L: ElementLayout> AccessorList for TypedArray<B, L> {
    type Item = L::Item;

    fn view_name(&self) -> &'static str {
        L::NAME
    }

    #[inline]
    fn len(&self) -> usize {
        self.accessor.len()
    }

    fn is_read_only(&self) -> bool {
        false
    }

    #[inline]
    fn get(&self, index: usize) -> Result<L::Item> {
        TypedArray::get(self, index)
    }

    fn copy_to(&self, dst: &mut [L::Item], offset: usize) -> usize {
        TypedArray::copy_to(self, dst, offset)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, L: ElementLayout> AccessorListMut for TypedArray<B, L> {
    #[inline]
    fn set(&mut self, index: usize, item: &L::Item) -> Result<()> {
        TypedArray::set(self, index, item)
    }

    fn fill(&mut self, src: &[L::Item], offset: usize) -> Result<usize> {
        TypedArray::fill(self, src, offset)
    }
}

impl<B, L: ElementLayout> fmt::Debug for TypedArray<B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(L::NAME).field(&self.accessor).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::list::FixedLength;
    use crate::util::{Mat4, Quat, Vec2, Vec3};

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_vector3_get_set() {
        let mut bytes = f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut arr = Vector3Array::packed(&mut bytes[..], EncodingType::Float32, false).unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(1).unwrap(), Vec3::new(4.0, 5.0, 6.0));

        arr.set(0, &Vec3::new(-1.0, 0.5, 9.0)).unwrap();
        assert_eq!(arr.to_vec(), vec![Vec3::new(-1.0, 0.5, 9.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert!(matches!(arr.get(2), Err(Error::OutOfRange { index: 2, count: 2 })));
    }

    #[test]
    fn test_dimension_mismatch() {
        let bytes = [0u8; 16];
        let layout = AccessorLayout::packed(AttributeFormat::VEC2F);
        assert!(matches!(
            Vector3Array::with_layout(&bytes[..], layout),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_float32_ignores_normalized_flag() {
        let mut bytes = f32_bytes(&[0.5, 2.0]);
        let mut arr = ScalarArray::packed(&mut bytes[..], EncodingType::Float32, true).unwrap();
        assert_eq!(arr.to_vec(), vec![0.5, 2.0]);
        assert!(!arr.format().normalized);

        arr.set(1, &-3.25).unwrap();
        drop(arr);
        assert_eq!(&bytes[4..8], &(-3.25f32).to_le_bytes());
    }

    #[test]
    fn test_debug_names_layout() {
        let bytes = f32_bytes(&[1.0, 2.0]);
        let arr = Vector2Array::packed(&bytes[..], EncodingType::Float32, false).unwrap();
        let text = format!("{:?}", arr);
        assert!(text.starts_with("Vector2Array"));
        assert!(text.contains("count: 1"));
    }

    #[test]
    fn test_normalized_texcoords() {
        let bytes = [0u8, 255, 51, 204];
        let arr = Vector2Array::packed(&bytes[..], EncodingType::Uint8, true).unwrap();
        assert_eq!(arr.get(0).unwrap(), Vec2::new(0.0, 1.0));
        assert_eq!(arr.get(1).unwrap(), Vec2::new(0.2, 0.8));
    }

    #[test]
    fn test_quaternion_fill_writes_all_four_components() {
        let mut bytes = vec![0u8; 8];
        let mut arr = QuaternionArray::packed(&mut bytes[..], EncodingType::Int16, true).unwrap();
        let q = Quat::from_xyzw(0.0, 0.0, -1.0, 1.0);
        assert_eq!(arr.fill(&[q], 0).unwrap(), 1);
        drop(arr);
        assert_eq!(&bytes[6..8], &32767i16.to_le_bytes());
        assert_eq!(&bytes[4..6], &(-32767i16).to_le_bytes());
    }

    #[test]
    fn test_copy_and_fill_clamp() {
        let mut bytes = f32_bytes(&[1.0, 2.0, 3.0, 4.0]);
        let mut arr = ScalarArray::packed(&mut bytes[..], EncodingType::Float32, false).unwrap();

        let mut dst = [0.0f32; 3];
        assert_eq!(arr.copy_to(&mut dst, 1), 2);
        assert_eq!(dst, [0.0, 1.0, 2.0]);
        assert_eq!(arr.copy_to_slice(&mut dst), 3);
        assert_eq!(dst, [1.0, 2.0, 3.0]);

        assert_eq!(arr.fill(&[9.0, 8.0, 7.0], 2).unwrap(), 2);
        assert_eq!(arr.to_vec(), vec![1.0, 2.0, 9.0, 8.0]);
        assert_eq!(arr.fill(&[5.0], 7).unwrap(), 0);
    }

    #[test]
    fn test_fill_from_slice_strided() {
        let mut bytes = vec![0u8; 28];
        let mut arr = Vector3Array::new(&mut bytes[..], 0, 2, 16, EncodingType::Float32, false).unwrap();
        assert_eq!(arr.fill_from_slice(&[Vec3::ONE, Vec3::new(2.0, 3.0, 4.0), Vec3::ZERO]).unwrap(), 2);
        assert_eq!(arr.to_vec(), vec![Vec3::ONE, Vec3::new(2.0, 3.0, 4.0)]);
        drop(arr);
        // stride padding stays untouched
        assert_eq!(&bytes[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_matrix3x3_packing() {
        let values: Vec<f32> = (1..=9).map(|v| v as f32).collect();
        let bytes = f32_bytes(&values);
        let arr = Matrix3x3Array::packed(&bytes[..], EncodingType::Float32, false).unwrap();
        let m = arr.get(0).unwrap();
        assert_eq!(m.w_axis.to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.y_axis.to_array(), [4.0, 5.0, 6.0, 0.0]);
    }

    #[test]
    fn test_index_of_exact() {
        let bytes = f32_bytes(&[0.0, 1.0, 2.0, 1.0]);
        let arr = ScalarArray::packed(&bytes[..], EncodingType::Float32, false).unwrap();
        assert_eq!(AccessorList::index_of(&arr, &1.0), Some(1));
        assert_eq!(AccessorList::index_of(&arr, &1.0001), None);
    }

    #[test]
    fn test_for_each_visits_all_rows() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let bytes = f32_bytes(&[1.0; 32]);
        let arr = Matrix4x4Array::packed(&bytes[..], EncodingType::Float32, false).unwrap();
        let hits = AtomicUsize::new(0);
        arr.for_each(|_, m: Mat4| {
            assert_eq!(m.x_axis.x, 1.0);
            hits.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(hits.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_resize_rejected() {
        let mut bytes = f32_bytes(&[1.0, 2.0]);
        let mut arr = Vector2Array::packed(&mut bytes[..], EncodingType::Float32, false).unwrap();
        assert!(matches!(
            arr.push(Vec2::ZERO),
            Err(Error::UnsupportedOperation { operation: "push", view: "Vector2Array" })
        ));
        assert!(arr.clear().is_err());
        assert_eq!(arr.get(0).unwrap(), Vec2::new(1.0, 2.0));
    }
}
