use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward operation for element-wise multiplication.
///
/// For \( z = a \cdot b \): \( \frac{dL}{da} = \frac{dL}{dz} \cdot b \) and
/// \( \frac{dL}{db} = \frac{dL}{dz} \cdot a \), reduced to each operand's shape.
#[derive(Debug)]
struct MulBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad_a = broadcast_binary(grad_output, &self.b, |g, b| g * b, "mul_backward")?
            .reduce_to_shape(&self.a.shape())?;
        let grad_b = broadcast_binary(grad_output, &self.a, |g, a| g * a, "mul_backward")?
            .reduce_to_shape(&self.b.shape())?;
        Ok(vec![grad_a, grad_b])
    }

    fn name(&self) -> &'static str {
        "Mul"
    }
}

/// Element-wise (Hadamard) product with broadcasting.
///
/// # Errors
/// `ShapeMismatch` if the shapes do not broadcast.
pub fn mul_op(graph: &Graph, a: &Tensor, b: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = broadcast_binary(a, b, |x, y| x * y, "mul")?;
    graph.record(&output, &[a, b], || MulBackward {
        a: a.clone(),
        b: b.clone(),
    });
    Ok(output)
}

/// Multiplies every element by a constant.
pub fn mul_scalar_op(graph: &Graph, a: &Tensor, scalar: f64) -> Result<Tensor, TensorGradError> {
    mul_op(graph, a, &Tensor::scalar(scalar))
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
