use crate::autograd::grad_check::{check_grad, GradCheckError};
use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::arithmetic::mul_op;
use crate::tensor::Tensor;
use crate::utils::testing::{create_test_tensor, create_test_tensor_with_grad};

/// Doubles its input but claims the derivative is 1.
#[derive(Debug)]
struct BrokenDoubleBackward;

impl BackwardOp for BrokenDoubleBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        Ok(vec![grad_output.detach()])
    }

    fn name(&self) -> &'static str {
        "BrokenDouble"
    }
}

fn broken_double(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = a.map(|x| 2.0 * x)?;
    graph.record(&output, &[a], || BrokenDoubleBackward);
    Ok(output)
}

#[test]
fn test_check_grad_accepts_correct_gradient() {
    let a = create_test_tensor_with_grad(vec![1.0, -2.0], vec![1, 2]);
    let b = create_test_tensor_with_grad(vec![0.5, 3.0], vec![1, 2]);
    let output_grad = create_test_tensor(vec![1.0, 1.0], vec![1, 2]);
    let result = check_grad(|g, inputs| mul_op(g, &inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-6, 1e-7);
    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn test_check_grad_detects_wrong_gradient() {
    let a = create_test_tensor_with_grad(vec![1.0, -2.0], vec![1, 2]);
    let output_grad = create_test_tensor(vec![1.0, 1.0], vec![1, 2]);
    let result = check_grad(|g, inputs| broken_double(g, &inputs[0]), &[a], &output_grad, 1e-6, 1e-7);
    match result {
        Err(GradCheckError::GradientMismatch {
            input_index,
            element_index,
            analytical_grad,
            numerical_grad,
            ..
        }) => {
            assert_eq!(input_index, 0);
            assert_eq!(element_index, 0);
            assert!((analytical_grad - 1.0).abs() < 1e-12);
            assert!((numerical_grad - 2.0).abs() < 1e-6);
        }
        other => panic!("expected a gradient mismatch, got {:?}", other),
    }
}

#[test]
fn test_check_grad_requires_leaf_inputs() {
    let graph = Graph::new();
    let a = create_test_tensor_with_grad(vec![1.0], vec![1, 1]);
    let internal = mul_op(&graph, &a, &a).unwrap();
    let output_grad = create_test_tensor(vec![1.0], vec![1, 1]);
    assert_eq!(
        check_grad(|g, inputs| mul_op(g, &inputs[0], &inputs[0]), &[internal], &output_grad, 1e-6, 1e-7),
        Err(GradCheckError::InputNotLeaf { input_index: 0 })
    );
}

#[test]
fn test_check_grad_forward_error_is_reported() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0], vec![1, 2]);
    let b = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![1, 3]);
    let output_grad = create_test_tensor(vec![1.0, 1.0], vec![1, 2]);
    assert!(matches!(
        check_grad(|g, inputs| mul_op(g, &inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-6, 1e-7),
        Err(GradCheckError::ForwardPassError(TensorGradError::ShapeMismatch { .. }))
    ));
}
