use crate::tensor::Tensor;

/// Checks if two tensors are approximately equal (shape and data within tolerance).
/// Panics if shapes differ or data differs significantly.
pub fn check_tensor_near(actual: &Tensor, expected_shape: &[usize], expected_data: &[f64], tolerance: f64) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual.to_vec();
    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        // Matching infinities compare equal even though their difference is NaN.
        if a == e {
            continue;
        }
        let diff = (*a - *e).abs();
        if !(diff <= tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Panics unless `tensor` holds a gradient equal to `expected_data` within `tolerance`.
pub fn check_grad_near(tensor: &Tensor, expected_data: &[f64], tolerance: f64) {
    let grad = tensor
        .grad()
        .unwrap_or_else(|| panic!("Tensor {:?} has no gradient", tensor.id()));
    check_tensor_near(&grad, &tensor.shape(), expected_data, tolerance);
}

/// Helper to create a simple tensor for testing purposes.
#[cfg(test)]
pub(crate) fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Helper to create a leaf tensor that requires gradient for testing.
#[cfg(test)]
pub(crate) fn create_test_tensor_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    let tensor = Tensor::new(data, shape).expect("Failed to create test tensor with grad");
    tensor.set_requires_grad(true);
    tensor
}

/// Routes `log` output through the test harness. Safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
