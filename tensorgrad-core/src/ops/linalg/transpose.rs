use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Copies a row-major `rows×cols` buffer into its `cols×rows` transpose.
pub(crate) fn transpose_buffer(data: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut out = vec![0.0; rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            out[j * rows + i] = data[i * cols + j];
        }
    }
    out
}

/// Untracked transpose of a 2-D tensor.
pub(crate) fn transpose_untracked(t: &Tensor, operation: &str) -> Result<Tensor, TensorGradError> {
    let (rows, cols) = t.dims2(operation)?;
    let data = transpose_buffer(&t.read_data().data, rows, cols);
    Tensor::new(data, vec![cols, rows])
}

#[derive(Debug)]
struct TransposeBackward;

impl BackwardOp for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        Ok(vec![transpose_untracked(grad_output, "transpose_backward")?])
    }

    fn name(&self) -> &'static str {
        "Transpose"
    }
}

/// Swaps the two axes of a 2-D tensor.
///
/// # Errors
/// `RankMismatch` if `a` is not 2-D.
pub fn transpose_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = transpose_untracked(a, "transpose")?;
    graph.record(&output, &[a], || TransposeBackward);
    Ok(output)
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
