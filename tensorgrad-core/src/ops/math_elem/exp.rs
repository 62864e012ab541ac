use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::apply_unary_op;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward pass for `exp`: the local derivative is the output itself.
#[derive(Debug)]
struct ExpBackward {
    output: Tensor,
}

impl BackwardOp for ExpBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad = broadcast_binary(grad_output, &self.output, |g, y| g * y, "exp_backward")?;
        Ok(vec![grad])
    }

    fn name(&self) -> &'static str {
        "Exp"
    }
}

/// Element-wise exponential.
pub fn exp_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    apply_unary_op(graph, a, f64::exp, |_, output| ExpBackward { output: output.detach() })
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
