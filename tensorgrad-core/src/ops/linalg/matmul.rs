use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::linalg::kernel::{matmul_kernel, MatmulConfig};
use crate::ops::linalg::transpose::transpose_buffer;
use crate::tensor::broadcast_utils::read_pair;
use crate::tensor::Tensor;

/// Backward pass structure for 2-D matrix multiplication.
///
/// Caches both operands: for \( Y = A B \),
/// \( \frac{dL}{dA} = \frac{dL}{dY} B^T \) and \( \frac{dL}{dB} = A^T \frac{dL}{dY} \).
#[derive(Debug)]
struct MatMulBackward {
    a: Tensor,
    b: Tensor,
    config: MatmulConfig,
}

impl BackwardOp for MatMulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let (m, k) = self.a.dims2("matmul_backward")?;
        let (_, n) = self.b.dims2("matmul_backward")?;
        let grad = grad_output.read_data();

        // dA = dY (m×n) · Bᵗ (n×k)
        let b_t = transpose_buffer(&self.b.read_data().data, k, n);
        let grad_a = matmul_kernel(&grad.data, &b_t, m, n, k, &self.config);

        // dB = Aᵗ (k×m) · dY (m×n)
        let a_t = transpose_buffer(&self.a.read_data().data, m, k);
        let grad_b = matmul_kernel(&a_t, &grad.data, k, m, n, &self.config);
        drop(grad);

        Ok(vec![Tensor::new(grad_a, vec![m, k])?, Tensor::new(grad_b, vec![k, n])?])
    }

    fn name(&self) -> &'static str {
        "MatMul"
    }
}

/// Matrix product of an `m×k` and a `k×n` tensor.
///
/// Uses the graph's [`MatmulConfig`] for the parallel threshold and the
/// optional stats collector, in the forward and the backward pass alike.
///
/// # Errors
/// - `RankMismatch` if either operand is not 2-D.
/// - `DimensionMismatch` if `a.cols != b.rows`.
pub fn matmul_op(graph: &Graph, a: &Tensor, b: &Tensor) -> Result<Tensor, TensorGradError> {
    let (m, k) = a.dims2("matmul")?;
    let (k2, n) = b.dims2("matmul")?;
    if k != k2 {
        return Err(TensorGradError::DimensionMismatch {
            expected: k,
            actual: k2,
            operation: "matmul".to_string(),
        });
    }

    let config = &graph.config().matmul;
    let data = read_pair(a, b, |a_td, b_td| matmul_kernel(&a_td.data, &b_td.data, m, k, n, config));
    let output = Tensor::new(data, vec![m, n])?;

    graph.record(&output, &[a, b], || MatMulBackward {
        a: a.clone(),
        b: b.clone(),
        config: config.clone(),
    });
    Ok(output)
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
