use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::apply_unary_op;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

// --- Backward Operation ---

/// Passes the upstream gradient where the input was positive, 0 elsewhere.
#[derive(Debug)]
struct ReluBackward {
    input: Tensor,
}

impl BackwardOp for ReluBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad = broadcast_binary(
            grad_output,
            &self.input,
            |g, x| if x > 0.0 { g } else { 0.0 },
            "relu_backward",
        )?;
        Ok(vec![grad])
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

// --- Forward Operation ---

/// Applies the Rectified Linear Unit element-wise: `max(0, x)`.
pub fn relu_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    apply_unary_op(
        graph,
        a,
        |x| if x > 0.0 { x } else { 0.0 },
        |input, _| ReluBackward { input: input.clone() },
    )
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
