use approx::assert_abs_diff_eq;

use crate::autograd::grad_check::check_grad;
use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::ops::activation::softmax_op;
use crate::ops::view::masked_fill_op;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

fn assert_rows_sum_to_one(t: &crate::tensor::Tensor) {
    let (_, cols) = t.dims2("test").unwrap();
    for row in t.to_vec().chunks(cols) {
        assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-10);
        assert!(row.iter().all(|p| p.is_finite() && *p >= 0.0));
    }
}

#[test]
fn test_softmax_rows_sum_to_one() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor(vec![1.0, 2.0, 3.0, -5.0, 0.0, 5.0, 1e3, 1e3 + 1.0, -1e3], vec![3, 3]);
    let y = softmax_op(&graph, &x)?;
    assert_rows_sum_to_one(&y);
    Ok(())
}

#[test]
fn test_softmax_identical_large_values_is_uniform() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor(vec![100.0; 4], vec![1, 4]);
    let y = softmax_op(&graph, &x)?;
    check_tensor_near(&y, &[1, 4], &[0.25; 4], 1e-15);
    Ok(())
}

#[test]
fn test_softmax_negative_infinity_gives_exact_zero() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let ninf = f64::NEG_INFINITY;
    let x = create_test_tensor(vec![0.0, ninf, 0.0, ninf, 3.0, ninf], vec![2, 3]);
    let y = softmax_op(&graph, &x)?;
    check_tensor_near(&y, &[2, 3], &[0.5, 0.0, 0.5, 0.0, 1.0, 0.0], 1e-15);
    assert_eq!(y.at(&[0, 1])?, 0.0);
    assert_rows_sum_to_one(&y);
    Ok(())
}

#[test]
fn test_softmax_all_masked_row_is_uniform_without_gradient() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let mask = create_test_tensor(vec![0.0, 0.0, 1.0, 1.0], vec![2, 2]);
    let masked = masked_fill_op(&graph, &x, &mask)?;
    let y = softmax_op(&graph, &masked)?;
    assert_eq!(y.at(&[0, 0])?, 0.5);
    assert_eq!(y.at(&[0, 1])?, 0.5);
    assert_rows_sum_to_one(&y);

    let upstream = create_test_tensor(vec![1.0, -1.0, 1.0, -1.0], vec![2, 2]);
    graph.backward_with_grad(&y, &upstream)?;
    let grad = x.grad().unwrap().to_vec();
    assert_eq!(&grad[..2], &[0.0, 0.0]);
    assert!(grad.iter().all(|g| g.is_finite()));
    Ok(())
}

#[test]
fn test_softmax_positive_infinity_takes_all_mass() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let inf = f64::INFINITY;
    let x = create_test_tensor_with_grad(vec![inf, 1.0, 0.0, inf, inf, 0.0], vec![2, 3]);
    let y = softmax_op(&graph, &x)?;
    check_tensor_near(&y, &[2, 3], &[1.0, 0.0, 0.0, 0.5, 0.5, 0.0], 0.0);
    assert_rows_sum_to_one(&y);

    let upstream = create_test_tensor(vec![1.0, -1.0, 2.0, 1.0, -1.0, 2.0], vec![2, 3]);
    graph.backward_with_grad(&y, &upstream)?;
    check_tensor_near(&x.grad().unwrap(), &[2, 3], &[0.0; 6], 0.0);
    Ok(())
}

#[test]
fn test_softmax_backward_uniform_upstream_is_zero() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor_with_grad(vec![0.3, -1.2, 2.0], vec![1, 3]);
    let y = softmax_op(&graph, &x)?;
    // Σy = 1 is constant, so a constant upstream gradient cancels.
    graph.backward(&y)?;
    check_tensor_near(&x.grad().unwrap(), &[1, 3], &[0.0, 0.0, 0.0], 1e-15);
    Ok(())
}

#[test]
fn test_softmax_grad_check() {
    let x = create_test_tensor_with_grad(vec![0.3, -1.2, 2.0, 0.5, 0.5, -0.1], vec![2, 3]);
    let output_grad = create_test_tensor(vec![1.0, -2.0, 0.5, 3.0, 0.0, -1.0], vec![2, 3]);
    let result = check_grad(|g, inputs| softmax_op(g, &inputs[0]), &[x], &output_grad, 1e-6, 1e-6);
    assert!(result.is_ok(), "{:?}", result);
}
