//! Accessor views over memory-mapped buffer files.

use std::io::Write;

use gltf_memory::prelude::*;
use memmap2::{Mmap, MmapMut};
use tempfile::NamedTempFile;

fn write_buffer(bytes: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().expect("Failed to create temp file");
    temp.write_all(bytes).expect("Failed to write buffer");
    temp.flush().expect("Failed to flush buffer");
    temp
}

#[test]
fn test_read_mapped_positions() {
    let values: Vec<f32> = (0..30).map(|v| v as f32 * 0.5).collect();
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let temp = write_buffer(&bytes);

    let file = std::fs::File::open(temp.path()).expect("Failed to open buffer");
    let map = unsafe { Mmap::map(&file) }.expect("Failed to map buffer");

    // Mmap derefs to [u8], so the view borrows the mapping directly.
    let positions = Vector3Array::packed(&map[..], EncodingType::Float32, false).unwrap();
    assert_eq!(positions.len(), 10);
    assert_eq!(positions.get(9).unwrap(), Vec3::new(13.5, 14.0, 14.5));

    let mut out = vec![Vec3::ZERO; 10];
    assert_eq!(positions.copy_to_slice(&mut out), 10);
    assert_eq!(out[4], Vec3::new(6.0, 6.5, 7.0));
}

#[test]
fn test_write_mapped_colors() {
    let temp = write_buffer(&[0u8; 16]);
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(temp.path())
        .expect("Failed to open buffer");
    let mut map = unsafe { MmapMut::map_mut(&file) }.expect("Failed to map buffer");

    {
        let mut colors = Vector4Array::packed(&mut map[..], EncodingType::Uint8, true).unwrap();
        assert_eq!(colors.len(), 4);
        colors.fill(&[Vec4::ONE, Vec4::new(1.0, 0.0, 0.0, 1.0)], 2).unwrap();
    }
    map.flush().expect("Failed to flush mapping");

    let written = std::fs::read(temp.path()).expect("Failed to read buffer");
    assert_eq!(&written[8..], &[255, 255, 255, 255, 255, 0, 0, 255]);
    assert_eq!(&written[..8], &[0u8; 8]);
}
