use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward operation for element-wise division.
///
/// For \( z = a / b \): \( \frac{dL}{da} = \frac{dL}{dz} / b \) and
/// \( \frac{dL}{db} = -\frac{dL}{dz} \cdot a / b^2 \).
#[derive(Debug)]
struct DivBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for DivBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad_a = broadcast_binary(grad_output, &self.b, |g, b| g / b, "div_backward")?
            .reduce_to_shape(&self.a.shape())?;
        let local_b = broadcast_binary(&self.a, &self.b, |a, b| -a / (b * b), "div_backward")?;
        let grad_b = broadcast_binary(grad_output, &local_b, |g, l| g * l, "div_backward")?
            .reduce_to_shape(&self.b.shape())?;
        Ok(vec![grad_a, grad_b])
    }

    fn name(&self) -> &'static str {
        "Div"
    }
}

/// Element-wise division `a / b` with broadcasting.
///
/// Division by zero follows IEEE semantics; callers guard denominators
/// (LayerNorm adds epsilon).
///
/// # Errors
/// `ShapeMismatch` if the shapes do not broadcast.
pub fn div_op(graph: &Graph, a: &Tensor, b: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = broadcast_binary(a, b, |x, y| x / y, "div")?;
    graph.record(&output, &[a, b], || DivBackward {
        a: a.clone(),
        b: b.clone(),
    });
    Ok(output)
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
