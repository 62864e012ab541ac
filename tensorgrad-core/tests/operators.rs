use std::sync::Arc;

use approx::assert_relative_eq;
use tensorgrad_core::autograd::grad_check::check_grad;
use tensorgrad_core::ops::activation::softmax_op;
use tensorgrad_core::ops::linalg::{matmul_op, transpose_op};
use tensorgrad_core::ops::loss::cross_entropy_op;
use tensorgrad_core::ops::normalization::{layer_norm_op, DEFAULT_LAYER_NORM_EPS};
use tensorgrad_core::ops::reduction::{mean_op, variance_op};
use tensorgrad_core::ops::view::{concat_op, masked_fill_op, row_select_op};
use tensorgrad_core::utils::testing::check_tensor_near;
use tensorgrad_core::{ones, Graph, GraphConfig, KernelStats, MatmulConfig, TensorGradError};

mod common;
use common::{create_test_tensor, random_leaf};

#[test]
fn test_matmul_gradients_match_finite_differences() {
    let a = random_leaf(&[3, 4], 10);
    let b = random_leaf(&[4, 2], 11);
    let output_grad = ones(&[3, 2]).unwrap();
    check_grad(
        |graph, inputs| matmul_op(graph, &inputs[0], &inputs[1]),
        &[a, b],
        &output_grad,
        1e-6,
        1e-6,
    )
    .unwrap();
}

#[test]
fn test_parallel_matmul_matches_serial() -> Result<(), TensorGradError> {
    let a = random_leaf(&[16, 8], 20);
    let b = random_leaf(&[8, 12], 21);
    let stats = Arc::new(KernelStats::new());

    let serial = Graph::new();
    let parallel = Graph::with_config(GraphConfig {
        matmul: MatmulConfig::default()
            .with_parallel_threshold(0)
            .with_stats(Arc::clone(&stats)),
    });
    let y_serial = matmul_op(&serial, &a, &b)?;
    let y_parallel = matmul_op(&parallel, &a, &b)?;
    assert_eq!(y_serial.to_vec(), y_parallel.to_vec());
    assert_eq!(stats.calls(), 1);
    assert_eq!(stats.parallel_calls(), 1);
    assert_eq!(stats.mul_adds(), 16 * 8 * 12);
    Ok(())
}

#[test]
fn test_softmax_rows_sum_to_one() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor(
        vec![1000.0, 1001.0, 1002.0, -5.0, 0.0, 5.0, 0.0, 0.0, 0.0],
        vec![3, 3],
    );
    let y = softmax_op(&graph, &x)?;
    for row in y.to_vec().chunks(3) {
        assert!(row.iter().all(|p| p.is_finite() && *p >= 0.0));
        assert_relative_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_causal_attention_gradients() {
    // softmax(mask(q·kᵀ))·v with a lower-triangular mask.
    let q = random_leaf(&[3, 2], 30);
    let k = random_leaf(&[3, 2], 31);
    let v = random_leaf(&[3, 2], 32);
    let mask = create_test_tensor(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0], vec![3, 3]);
    let output_grad = create_test_tensor(vec![1.0, -0.5, 0.25, 2.0, -1.0, 0.75], vec![3, 2]);
    check_grad(
        |graph, inputs| {
            let kt = transpose_op(graph, &inputs[1])?;
            let scores = matmul_op(graph, &inputs[0], &kt)?;
            let masked = masked_fill_op(graph, &scores, &mask)?;
            let weights = softmax_op(graph, &masked)?;
            matmul_op(graph, &weights, &inputs[2])
        },
        &[q, k, v],
        &output_grad,
        1e-6,
        1e-5,
    )
    .unwrap();
}

#[test]
fn test_mean_and_variance_rows() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 4.0, 4.0], vec![2, 3]);
    check_tensor_near(&mean_op(&graph, &x)?, &[2, 1], &[2.0, 4.0], 1e-12);
    check_tensor_near(&variance_op(&graph, &x)?, &[2, 1], &[2.0 / 3.0, 0.0], 1e-12);
    Ok(())
}

#[test]
fn test_layer_norm_constant_row_is_finite() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let x = create_test_tensor(vec![0.5, -1.0, 2.0, 4.0, 3.0, 3.0, 3.0, 3.0], vec![2, 4]);
    x.set_requires_grad(true);
    let y = layer_norm_op(&graph, &x, None, None, DEFAULT_LAYER_NORM_EPS)?;
    let data = y.to_vec();
    assert!(data.iter().all(|v| v.is_finite()));
    assert_relative_eq!(data[0..4].iter().sum::<f64>(), 0.0, epsilon = 1e-9);
    assert_eq!(&data[4..8], &[0.0; 4]);
    Ok(())
}

#[test]
fn test_concat_then_split_returns_inputs() -> Result<(), TensorGradError> {
    let graph = Graph::new();
    let a = random_leaf(&[3, 2], 50);
    let b = random_leaf(&[3, 1], 51);
    let c = random_leaf(&[3, 4], 52);
    let cat = concat_op(&graph, &[&a, &b, &c])?;
    assert_eq!(cat.shape(), vec![3, 7]);
    let parts = cat.split_columns(&[2, 1, 4])?;
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], a);
    assert_eq!(parts[1], b);
    assert_eq!(parts[2], c);
    Ok(())
}

#[test]
fn test_row_select_and_cross_entropy_errors() {
    let graph = Graph::new();
    let logits = create_test_tensor(vec![0.0; 6], vec![2, 3]);
    assert!(matches!(
        row_select_op(&graph, &logits, &[2]),
        Err(TensorGradError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        cross_entropy_op(&graph, &logits, &[0, 3]),
        Err(TensorGradError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        cross_entropy_op(&graph, &logits, &[0]),
        Err(TensorGradError::DimensionMismatch { .. })
    ));
    let uniform = cross_entropy_op(&graph, &logits, &[0, 2]).unwrap();
    assert_relative_eq!(uniform.item().unwrap(), 3.0f64.ln(), epsilon = 1e-12);
}
