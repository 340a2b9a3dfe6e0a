//! Strided component codec.
//!
//! [`StridedAccessor`] wraps a byte region and exposes it as a grid of
//! `count x dimensions` floating point components. Each component is stored
//! with one [`EncodingType`], optionally normalized. The decode/encode path is
//! resolved once at construction into a [`WireCodec`].

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::util::{AccessorLayout, AttributeFormat, EncodingType, Error, Result};

// ============================================================================
// Wire codec
// ============================================================================

/// Resolved decode/encode path for one encoding + normalization pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireCodec {
    Float32,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Uint32,
    /// Signed 8-bit, normalized to `[-1, 1]`
    Snorm8,
    /// Unsigned 8-bit, normalized to `[0, 1]`
    Unorm8,
    /// Signed 16-bit, normalized to `[-1, 1]`
    Snorm16,
    /// Unsigned 16-bit, normalized to `[0, 1]`
    Unorm16,
}

impl WireCodec {
    /// Pick the codec for an encoding. Float32 ignores `normalized`; uint32
    /// cannot be normalized.
    pub fn resolve(encoding: EncodingType, normalized: bool) -> Result<Self> {
        let codec = match (encoding, normalized) {
            (EncodingType::Float32, _) => Self::Float32,
            (EncodingType::Int8, false) => Self::Int8,
            (EncodingType::Uint8, false) => Self::Uint8,
            (EncodingType::Int16, false) => Self::Int16,
            (EncodingType::Uint16, false) => Self::Uint16,
            (EncodingType::Uint32, false) => Self::Uint32,
            (EncodingType::Int8, true) => Self::Snorm8,
            (EncodingType::Uint8, true) => Self::Unorm8,
            (EncodingType::Int16, true) => Self::Snorm16,
            (EncodingType::Uint16, true) => Self::Unorm16,
            (EncodingType::Uint32, true) => {
                return Err(Error::config(format!("{} components cannot be normalized", encoding)));
            }
        };
        Ok(codec)
    }

    /// Encoding this codec reads and writes.
    #[inline]
    pub const fn encoding(self) -> EncodingType {
        match self {
            Self::Float32 => EncodingType::Float32,
            Self::Int8 | Self::Snorm8 => EncodingType::Int8,
            Self::Uint8 | Self::Unorm8 => EncodingType::Uint8,
            Self::Int16 | Self::Snorm16 => EncodingType::Int16,
            Self::Uint16 | Self::Unorm16 => EncodingType::Uint16,
            Self::Uint32 => EncodingType::Uint32,
        }
    }

    #[inline]
    pub const fn is_normalized(self) -> bool {
        matches!(self, Self::Snorm8 | Self::Unorm8 | Self::Snorm16 | Self::Unorm16)
    }

    /// Byte width of one component.
    #[inline]
    pub const fn width(self) -> usize {
        self.encoding().num_bytes()
    }

    /// Encodings eligible for parallel bulk traversal.
    #[inline]
    pub const fn is_parallel_candidate(self) -> bool {
        matches!(self, Self::Float32 | Self::Uint8)
    }

    /// Decode one component from the start of `bytes`.
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> f32 {
        match self {
            Self::Float32 => LittleEndian::read_f32(bytes),
            Self::Int8 => bytes[0] as i8 as f32,
            Self::Uint8 => bytes[0] as f32,
            Self::Int16 => LittleEndian::read_i16(bytes) as f32,
            Self::Uint16 => LittleEndian::read_u16(bytes) as f32,
            Self::Uint32 => LittleEndian::read_u32(bytes) as f32,
            Self::Snorm8 => (bytes[0] as i8 as f32 / 127.0).max(-1.0),
            Self::Unorm8 => bytes[0] as f32 / 255.0,
            Self::Snorm16 => (LittleEndian::read_i16(bytes) as f32 / 32767.0).max(-1.0),
            Self::Unorm16 => LittleEndian::read_u16(bytes) as f32 / 65535.0,
        }
    }

    /// Encode one finite component into the start of `bytes`.
    ///
    /// Signed normalized values round half to even, unsigned normalized and
    /// plain integer values truncate toward zero. Out of range values
    /// saturate at the integer limits.
    #[inline]
    pub fn encode(self, value: f32, bytes: &mut [u8]) {
        match self {
            Self::Float32 => LittleEndian::write_f32(bytes, value),
            Self::Int8 => bytes[0] = value as i8 as u8,
            Self::Uint8 => bytes[0] = value as u8,
            Self::Int16 => LittleEndian::write_i16(bytes, value as i16),
            Self::Uint16 => LittleEndian::write_u16(bytes, value as u16),
            Self::Uint32 => LittleEndian::write_u32(bytes, value as u32),
            Self::Snorm8 => bytes[0] = (value * 127.0).round_ties_even() as i8 as u8,
            Self::Unorm8 => bytes[0] = (value * 255.0) as u8,
            Self::Snorm16 => {
                LittleEndian::write_i16(bytes, (value * 32767.0).round_ties_even() as i16)
            }
            Self::Unorm16 => LittleEndian::write_u16(bytes, (value * 65535.0) as u16),
        }
    }

    /// Decode an unsigned integer component exactly, without a float round-trip.
    #[inline]
    pub fn decode_uint(self, bytes: &[u8]) -> Option<u32> {
        match self {
            Self::Uint8 => Some(bytes[0] as u32),
            Self::Uint16 => Some(LittleEndian::read_u16(bytes) as u32),
            Self::Uint32 => Some(LittleEndian::read_u32(bytes)),
            _ => None,
        }
    }

    /// Encode an unsigned integer component. Returns false if the value
    /// does not fit this encoding.
    #[inline]
    pub fn encode_uint(self, value: u32, bytes: &mut [u8]) -> bool {
        match self {
            Self::Uint8 => match u8::try_from(value) {
                Ok(v) => {
                    bytes[0] = v;
                    true
                }
                Err(_) => false,
            },
            Self::Uint16 => match u16::try_from(value) {
                Ok(v) => {
                    LittleEndian::write_u16(bytes, v);
                    true
                }
                Err(_) => false,
            },
            Self::Uint32 => {
                LittleEndian::write_u32(bytes, value);
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Strided accessor
// ============================================================================

/// Wraps a byte region and exposes it as strided float components.
///
/// The region is borrowed (or owned) as `B`; no bytes are copied. Reads need
/// `B: AsRef<[u8]>`, writes additionally need `B: AsMut<[u8]>`.
#[derive(Clone)]
pub struct StridedAccessor<B> {
    data: B,
    byte_offset: usize,
    byte_stride: usize,
    count: usize,
    dimensions: usize,
    codec: WireCodec,
}

impl<B: AsRef<[u8]>> StridedAccessor<B> {
    /// Create an accessor over `data` with the given layout.
    ///
    /// The effective stride is `max(byte_stride, width * dimensions)` and the
    /// effective count is clamped to what the region holds.
    pub fn new(data: B, layout: AccessorLayout) -> Result<Self> {
        let format = layout.format;
        format.validate()?;
        let codec = WireCodec::resolve(format.encoding, format.normalized)?;

        let region_len = data.as_ref().len();
        if layout.byte_offset > region_len {
            return Err(Error::config(format!(
                "byte offset {} is past the end of a {} byte region",
                layout.byte_offset, region_len
            )));
        }

        let byte_stride = layout.effective_stride();
        let count = layout.effective_count(region_len);

        debug!(
            format = %format,
            byte_offset = layout.byte_offset,
            byte_stride,
            count,
            "resolved strided accessor"
        );

        Ok(Self {
            data,
            byte_offset: layout.byte_offset,
            byte_stride,
            count,
            dimensions: format.dimensions as usize,
            codec,
        })
    }

    /// Create a tightly packed accessor covering the whole region.
    pub fn packed(data: B, format: AttributeFormat) -> Result<Self> {
        Self::new(data, AccessorLayout::packed(format))
    }

    /// Number of elements (rows).
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of components per element.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Effective byte stride.
    #[inline]
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    #[inline]
    pub fn codec(&self) -> WireCodec {
        self.codec
    }

    #[inline]
    pub fn encoding(&self) -> EncodingType {
        self.codec.encoding()
    }

    #[inline]
    pub fn normalized(&self) -> bool {
        self.codec.is_normalized()
    }

    pub fn format(&self) -> AttributeFormat {
        AttributeFormat::new(self.encoding(), self.normalized(), self.dimensions as u8)
    }

    /// Bytes from the first element to the end of the region.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data.as_ref()[self.byte_offset..]
    }

    /// Release the wrapped storage.
    pub fn into_inner(self) -> B {
        self.data
    }

    /// Byte offset of a component relative to the first element.
    #[inline]
    fn component_offset(&self, row: usize, component: usize) -> Result<usize> {
        if row >= self.count {
            return Err(Error::OutOfRange { index: row, count: self.count });
        }
        if component >= self.dimensions {
            return Err(Error::ComponentOutOfRange {
                component,
                dimensions: self.dimensions,
            });
        }
        Ok(row * self.byte_stride + component * self.codec.width())
    }

    /// Decode a single component.
    pub fn get(&self, row: usize, component: usize) -> Result<f32> {
        let offset = self.component_offset(row, component)?;
        Ok(self.codec.decode(&self.bytes()[offset..]))
    }

    /// Decode the first `out.len()` components of one element.
    pub fn read_row(&self, row: usize, out: &mut [f32]) -> Result<()> {
        if out.len() > self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: out.len(),
            });
        }
        if row >= self.count {
            return Err(Error::OutOfRange { index: row, count: self.count });
        }
        let width = self.codec.width();
        let base = &self.bytes()[row * self.byte_stride..];
        for (component, slot) in out.iter_mut().enumerate() {
            *slot = self.codec.decode(&base[component * width..]);
        }
        Ok(())
    }

    /// Decode a single component as an exact unsigned integer.
    pub fn get_uint(&self, row: usize, component: usize) -> Result<u32> {
        let offset = self.component_offset(row, component)?;
        self.codec
            .decode_uint(&self.bytes()[offset..])
            .ok_or_else(|| Error::config(format!("{} components are not unsigned integers", self.format())))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> StridedAccessor<B> {
    /// Mutable bytes from the first element to the end of the region.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let offset = self.byte_offset;
        &mut self.data.as_mut()[offset..]
    }

    /// Encode a single component. Non-finite values are rejected before
    /// any byte is written.
    pub fn set(&mut self, row: usize, component: usize, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidValue { value });
        }
        let offset = self.component_offset(row, component)?;
        let codec = self.codec;
        codec.encode(value, &mut self.bytes_mut()[offset..]);
        Ok(())
    }

    /// Encode the first `values.len()` components of one element.
    ///
    /// Either every component is written or none is.
    pub fn write_row(&mut self, row: usize, values: &[f32]) -> Result<()> {
        if values.len() > self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: values.len(),
            });
        }
        if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidValue { value });
        }
        if row >= self.count {
            return Err(Error::OutOfRange { index: row, count: self.count });
        }
        let codec = self.codec;
        let start = row * self.byte_stride;
        let base = &mut self.bytes_mut()[start..];
        for (component, &value) in values.iter().enumerate() {
            codec.encode(value, &mut base[component * codec.width()..]);
        }
        Ok(())
    }

    /// Encode a single component from an exact unsigned integer.
    pub fn set_uint(&mut self, row: usize, component: usize, value: u32) -> Result<()> {
        let offset = self.component_offset(row, component)?;
        let codec = self.codec;
        if codec.decode_uint(&self.bytes()[offset..]).is_none() {
            return Err(Error::config(format!("{} components are not unsigned integers", self.format())));
        }
        if !codec.encode_uint(value, &mut self.bytes_mut()[offset..]) {
            return Err(Error::InvalidValue { value: value as f32 });
        }
        Ok(())
    }
}

impl<B> std::fmt::Debug for StridedAccessor<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedAccessor")
            .field("codec", &self.codec)
            .field("dimensions", &self.dimensions)
            .field("count", &self.count)
            .field("byte_offset", &self.byte_offset)
            .field("byte_stride", &self.byte_stride)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(codec: WireCodec, value: f32) -> f32 {
        let mut buf = [0u8; 4];
        codec.encode(value, &mut buf);
        codec.decode(&buf)
    }

    #[test]
    fn test_resolve() {
        assert_eq!(WireCodec::resolve(EncodingType::Float32, false).unwrap(), WireCodec::Float32);
        assert_eq!(WireCodec::resolve(EncodingType::Float32, true).unwrap(), WireCodec::Float32);
        assert_eq!(WireCodec::resolve(EncodingType::Uint8, true).unwrap(), WireCodec::Unorm8);
        assert_eq!(WireCodec::resolve(EncodingType::Int16, false).unwrap(), WireCodec::Int16);
        assert!(matches!(
            WireCodec::resolve(EncodingType::Uint32, true),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_normalized_extremes() {
        let mut buf = [0u8; 2];
        WireCodec::Unorm8.encode(1.0, &mut buf);
        assert_eq!(buf[0], 255);

        WireCodec::Snorm8.encode(-1.0, &mut buf);
        assert_eq!(buf[0] as i8, -127);

        WireCodec::Snorm16.encode(-1.0, &mut buf);
        assert_eq!(i16::from_le_bytes(buf), -32767);

        WireCodec::Unorm16.encode(1.0, &mut buf);
        assert_eq!(u16::from_le_bytes(buf), 65535);
    }

    #[test]
    fn test_signed_minimum_clamps() {
        assert_eq!(WireCodec::Snorm8.decode(&[0x80]), -1.0);
        assert_eq!(WireCodec::Snorm16.decode(&i16::MIN.to_le_bytes()), -1.0);
        assert_eq!(WireCodec::Int8.decode(&[0x80]), -128.0);
    }

    #[test]
    fn test_unsigned_normalized_truncates() {
        let mut buf = [0u8; 1];
        // 0.999 * 255 = 254.745, truncated not rounded
        WireCodec::Unorm8.encode(0.999, &mut buf);
        assert_eq!(buf[0], 254);
        // 0.5 * 127 = 63.5 rounds to 64
        WireCodec::Snorm8.encode(0.5, &mut buf);
        assert_eq!(buf[0] as i8, 64);
        WireCodec::Snorm8.encode(-0.5, &mut buf);
        assert_eq!(buf[0] as i8, -64);
    }

    #[test]
    fn test_plain_integers_truncate_toward_zero() {
        let mut buf = [0u8; 4];
        WireCodec::Int8.encode(-3.7, &mut buf);
        assert_eq!(buf[0] as i8, -3);
        WireCodec::Uint16.encode(513.9, &mut buf);
        assert_eq!(u16::from_le_bytes([buf[0], buf[1]]), 513);
        WireCodec::Uint32.encode(70000.2, &mut buf);
        assert_eq!(u32::from_le_bytes(buf), 70000);
    }

    #[test]
    fn test_roundtrip_within_quantization_step() {
        let cases = [
            (WireCodec::Snorm8, 1.0 / 127.0, -1.0),
            (WireCodec::Unorm8, 1.0 / 255.0, 0.0),
            (WireCodec::Snorm16, 1.0 / 32767.0, -1.0),
            (WireCodec::Unorm16, 1.0 / 65535.0, 0.0),
        ];
        for (codec, step, lo) in cases {
            for i in 0..=200 {
                let v = lo + (1.0 - lo) * (i as f32 / 200.0);
                let back = roundtrip(codec, v);
                assert!((back - v).abs() <= step + f32::EPSILON, "{:?} {} -> {}", codec, v, back);
            }
        }
        for v in [0.0f32, -1.5, 3.25e7, f32::MIN_POSITIVE] {
            assert_eq!(roundtrip(WireCodec::Float32, v), v);
        }
    }

    #[test]
    fn test_accessor_stride_and_count() {
        let bytes = vec![0u8; 44];
        let layout = AccessorLayout::packed(AttributeFormat::VEC3F).with_stride(16);
        let acc = StridedAccessor::new(&bytes[..], layout).unwrap();
        assert_eq!(acc.byte_stride(), 16);
        assert_eq!(acc.len(), 3);

        let acc = StridedAccessor::new(&bytes[..40], layout).unwrap();
        assert_eq!(acc.len(), 2);

        let acc = StridedAccessor::packed(&bytes[..], AttributeFormat::VEC4_UNORM8).unwrap();
        assert_eq!(acc.byte_stride(), 4);
        assert_eq!(acc.len(), 11);
    }

    #[test]
    fn test_accessor_rejects_bad_config() {
        let bytes = [0u8; 8];
        let bad = AttributeFormat::normalized(EncodingType::Uint32, 1);
        assert!(matches!(
            StridedAccessor::packed(&bytes[..], bad),
            Err(Error::Configuration(_))
        ));
        let past_end = AccessorLayout::packed(AttributeFormat::FLOAT).with_offset(9);
        assert!(StridedAccessor::new(&bytes[..], past_end).is_err());
    }

    #[test]
    fn test_accessor_get_set() {
        let mut bytes = vec![0u8; 16];
        let layout = AccessorLayout::packed(AttributeFormat::VEC3_SNORM16).with_stride(8).with_offset(2);
        let mut acc = StridedAccessor::new(&mut bytes[..], layout).unwrap();
        assert_eq!(acc.len(), 2);

        acc.set(1, 2, -1.0).unwrap();
        assert_eq!(acc.get(1, 2).unwrap(), -1.0);
        assert!(matches!(acc.get(2, 0), Err(Error::OutOfRange { index: 2, count: 2 })));
        assert!(matches!(acc.get(0, 3), Err(Error::ComponentOutOfRange { .. })));

        drop(acc);
        // offset 2 + row 1 * stride 8 + component 2 * 2 bytes
        assert_eq!(i16::from_le_bytes([bytes[14], bytes[15]]), -32767);
    }

    #[test]
    fn test_non_finite_rejected_without_write() {
        let mut bytes = vec![7u8; 8];
        let mut acc = StridedAccessor::packed(&mut bytes[..], AttributeFormat::VEC2F).unwrap();
        assert!(matches!(acc.set(0, 0, f32::NAN), Err(Error::InvalidValue { .. })));
        assert!(matches!(
            acc.write_row(0, &[1.0, f32::INFINITY]),
            Err(Error::InvalidValue { .. })
        ));
        drop(acc);
        assert_eq!(bytes, vec![7u8; 8]);
    }

    #[test]
    fn test_uint_access() {
        let mut bytes = vec![0u8; 6];
        let mut acc = StridedAccessor::packed(&mut bytes[..], AttributeFormat::INDEX_U16).unwrap();
        acc.set_uint(2, 0, 65535).unwrap();
        assert_eq!(acc.get_uint(2, 0).unwrap(), 65535);
        assert!(matches!(acc.set_uint(0, 0, 65536), Err(Error::InvalidValue { .. })));

        let floats = [0u8; 4];
        let acc = StridedAccessor::packed(&floats[..], AttributeFormat::FLOAT).unwrap();
        assert!(acc.get_uint(0, 0).is_err());
    }
}
