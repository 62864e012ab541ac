use super::*;

#[test]
fn test_calculate_strides() {
    assert_eq!(calculate_strides(&[2, 3]), vec![3, 1]);
    assert_eq!(calculate_strides(&[2, 2, 2]), vec![4, 2, 1]);
    assert_eq!(calculate_strides(&[]), Vec::<usize>::new());
}

#[test]
fn test_broadcast_shapes_matrix_cases() {
    assert_eq!(broadcast_shapes(&[1, 1], &[3, 4], "t").unwrap(), vec![3, 4]);
    assert_eq!(broadcast_shapes(&[3, 4], &[1, 4], "t").unwrap(), vec![3, 4]);
    assert_eq!(broadcast_shapes(&[3, 1], &[3, 4], "t").unwrap(), vec![3, 4]);
    assert_eq!(broadcast_shapes(&[3, 1], &[1, 4], "t").unwrap(), vec![3, 4]);
}

#[test]
fn test_broadcast_shapes_rank_padding() {
    assert_eq!(broadcast_shapes(&[4], &[2, 3, 4], "t").unwrap(), vec![2, 3, 4]);
    assert_eq!(broadcast_shapes(&[], &[2, 2], "t").unwrap(), vec![2, 2]);
}

#[test]
fn test_broadcast_shapes_incompatible() {
    let err = broadcast_shapes(&[2, 3], &[2, 4], "add").unwrap_err();
    assert_eq!(
        err,
        TensorGradError::ShapeMismatch {
            expected: vec![2, 3],
            actual: vec![2, 4],
            operation: "add".to_string(),
        }
    );
}

#[test]
fn test_broadcast_strides() {
    assert_eq!(broadcast_strides(&[1, 4], &[3, 4]), vec![0, 1]);
    assert_eq!(broadcast_strides(&[3, 1], &[3, 4]), vec![1, 0]);
    assert_eq!(broadcast_strides(&[4], &[3, 4]), vec![0, 1]);
    assert_eq!(broadcast_strides(&[3, 4], &[3, 4]), vec![4, 1]);
}

#[test]
fn test_coord_helpers() {
    assert_eq!(index_to_coord(5, &[2, 3]), vec![1, 2]);
    let mut coord = vec![0, 2];
    assert!(increment_coord(&mut coord, &[2, 3]));
    assert_eq!(coord, vec![1, 0]);
    let mut last = vec![1, 2];
    assert!(!increment_coord(&mut last, &[2, 3]));
}
