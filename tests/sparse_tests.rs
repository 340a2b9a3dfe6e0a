//! Integration tests for sparse overlays.

use gltf_memory::prelude::*;

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[test]
fn test_scalar_overlay_last_wins() {
    let dense = f32_bytes(&[10.0, 20.0, 30.0, 40.0]);
    let values = f32_bytes(&[99.0, 77.0]);
    let index_bytes: Vec<u8> = [2u16, 2].iter().flat_map(|v| v.to_le_bytes()).collect();

    let bottom = ScalarArray::packed(&dense[..], EncodingType::Float32, false).unwrap();
    let top = ScalarArray::packed(&values[..], EncodingType::Float32, false).unwrap();
    let indices = IndexArray::packed(&index_bytes[..], EncodingType::Uint16).unwrap();
    let sparse = SparseArray::from_index_array(bottom, top, &indices).unwrap();

    assert_eq!(sparse.len(), 4);
    assert_eq!(sparse.get(2).unwrap(), 77.0);
    assert_eq!(sparse.to_vec(), vec![10.0, 20.0, 77.0, 40.0]);

    let mut dst = [0.0f32; 4];
    assert_eq!(sparse.copy_to(&mut dst, 0), 4);
    assert_eq!(dst, [10.0, 20.0, 77.0, 40.0]);
}

#[test]
fn test_morph_target_overlay() {
    // Normalized int16 dense deltas, float overrides for two vertices.
    let dense: Vec<u8> = [0i16, 0, 0, 32767, 0, 0, 0, -32767, 0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    let values = f32_bytes(&[0.5, 0.5, 0.5, -2.0, 0.0, 1.0]);

    let bottom = Vector3Array::packed(&dense[..], EncodingType::Int16, true).unwrap();
    let top = Vector3Array::packed(&values[..], EncodingType::Float32, false).unwrap();
    let sparse = SparseArray::new(bottom, top, [2u32, 0]).unwrap();

    let mut rows = Vec::new();
    sparse.for_each(|row, v| rows.push((row, v))).unwrap();
    assert_eq!(
        rows,
        vec![
            (0, Vec3::new(-2.0, 0.0, 1.0)),
            (1, Vec3::new(1.0, 0.0, 0.0)),
            (2, Vec3::splat(0.5)),
        ]
    );
    assert_eq!(sparse.index_of(&Vec3::X), Some(1));
}

#[test]
fn test_overlay_rejects_all_mutation() {
    let dense = f32_bytes(&[1.0, 2.0, 3.0]);
    let bottom = ScalarArray::packed(&dense[..], EncodingType::Float32, false).unwrap();
    let top = ScalarArray::packed(&dense[..4], EncodingType::Float32, false).unwrap();
    let mut sparse = SparseArray::new(bottom, top, [1u32]).unwrap();

    for result in [
        sparse.set(0, &0.0),
        sparse.insert(0, 0.0),
        sparse.push(0.0),
        sparse.clear(),
        sparse.fill(&[], 0).map(|_| ()),
        sparse.remove_at(0).map(|_| ()),
        sparse.remove(&1.0).map(|_| ()),
    ] {
        assert!(matches!(result, Err(Error::UnsupportedOperation { view: "SparseArray", .. })));
    }
    assert_eq!(sparse.to_vec(), vec![1.0, 1.0, 3.0]);
}
