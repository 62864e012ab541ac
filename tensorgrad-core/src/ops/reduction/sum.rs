use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::{full, Tensor};

/// Backward pass for the full sum: every element receives the upstream value.
#[derive(Debug)]
struct SumBackward {
    input_shape: Vec<usize>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let g = grad_output.item()?;
        Ok(vec![full(&self.input_shape, g)?])
    }

    fn name(&self) -> &'static str {
        "Sum"
    }
}

/// Sums every element into a 1×1 tensor.
pub fn sum_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    let total: f64 = a.read_data().data.iter().sum();
    let output = Tensor::scalar(total);
    graph.record(&output, &[a], || SumBackward { input_shape: a.shape() });
    Ok(output)
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
