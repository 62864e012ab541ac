// tensorgrad-core/src/ops/math_elem/ln.rs

use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::apply_unary_op;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward pass structure for the element-wise natural logarithm.
///
/// Keeps the input, as the local derivative is `1 / input`.
#[derive(Debug)]
struct LnBackward {
    input: Tensor,
}

impl BackwardOp for LnBackward {
    /// Computes the gradient for \( z = \ln(a) \):
    /// \\[ \frac{dL}{da} = \frac{dL}{dz} \cdot \frac{1}{a} \\]
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad = broadcast_binary(grad_output, &self.input, |g, a| g / a, "ln_backward")?;
        Ok(vec![grad])
    }

    fn name(&self) -> &'static str {
        "Ln"
    }
}

/// Element-wise natural logarithm. Non-positive inputs follow IEEE
/// semantics (`ln 0 = −∞`, `ln(-1) = NaN`).
pub fn ln_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    apply_unary_op(graph, a, f64::ln, |input, _| LnBackward { input: input.clone() })
}

#[cfg(test)]
#[path = "ln_test.rs"]
mod tests;
