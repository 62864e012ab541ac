use approx::assert_relative_eq;

use crate::autograd::grad_check::check_grad;
use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::ops::arithmetic::{pow_op, pow_scalar_op};
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_pow_scalar_forward_and_backward() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![1, 3]);
    let y = pow_scalar_op(&graph, &x, 2.0)?;
    check_tensor_near(&y, &[1, 3], &[1.0, 4.0, 9.0], 1e-12);
    graph.backward(&y)?;
    check_tensor_near(&x.grad().unwrap(), &[1, 3], &[2.0, 4.0, 6.0], 1e-12);
    Ok(())
}

#[test]
fn test_pow_exponent_gradient() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let base = create_test_tensor(vec![2.0], vec![1, 1]);
    let exponent = create_test_tensor_with_grad(vec![3.0], vec![1, 1]);
    let y = pow_op(&graph, &base, &exponent)?;
    graph.backward(&y)?;
    // d(2^b)/db = 2^b · ln 2
    assert_relative_eq!(exponent.grad().unwrap().item()?, 8.0 * 2f64.ln(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_pow_exponent_gradient_is_zero_for_non_positive_base() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let base = create_test_tensor(vec![-2.0, 0.0], vec![1, 2]);
    let exponent = create_test_tensor_with_grad(vec![2.0], vec![1, 1]);
    let y = pow_op(&graph, &base, &exponent)?;
    check_tensor_near(&y, &[1, 2], &[4.0, 0.0], 0.0);
    graph.backward(&y)?;
    check_tensor_near(&exponent.grad().unwrap(), &[1, 1], &[0.0], 0.0);
    Ok(())
}

#[test]
fn test_pow_grad_check() {
    let base = create_test_tensor_with_grad(vec![0.5, 1.2, 2.0, 0.9], vec![2, 2]);
    let exponent = create_test_tensor_with_grad(vec![1.5, -0.5], vec![1, 2]);
    let output_grad = create_test_tensor(vec![1.0, -1.0, 0.5, 2.0], vec![2, 2]);
    let result = check_grad(
        |g, inputs| pow_op(g, &inputs[0], &inputs[1]),
        &[base, exponent],
        &output_grad,
        1e-6,
        1e-5,
    );
    assert!(result.is_ok(), "{:?}", result);
}
