use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward operation for `base ^ exponent`.
///
/// \( \frac{dL}{da} = \frac{dL}{dz} \cdot b \cdot a^{b-1} \) and
/// \( \frac{dL}{db} = \frac{dL}{dz} \cdot a^b \cdot \ln a \), where the
/// exponent gradient is 0 wherever `a <= 0` (`ln` is undefined there).
#[derive(Debug)]
struct PowBackward {
    base: Tensor,
    exponent: Tensor,
}

impl BackwardOp for PowBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let local_base = broadcast_binary(
            &self.base,
            &self.exponent,
            |a, b| if b == 0.0 { 0.0 } else { b * a.powf(b - 1.0) },
            "pow_backward",
        )?;
        let grad_base = broadcast_binary(grad_output, &local_base, |g, l| g * l, "pow_backward")?
            .reduce_to_shape(&self.base.shape())?;

        let local_exponent = broadcast_binary(
            &self.base,
            &self.exponent,
            |a, b| if a > 0.0 { a.powf(b) * a.ln() } else { 0.0 },
            "pow_backward",
        )?;
        let grad_exponent = broadcast_binary(grad_output, &local_exponent, |g, l| g * l, "pow_backward")?
            .reduce_to_shape(&self.exponent.shape())?;

        Ok(vec![grad_base, grad_exponent])
    }

    fn name(&self) -> &'static str {
        "Pow"
    }
}

/// Element-wise power `base ^ exponent` with broadcasting.
///
/// # Errors
/// `ShapeMismatch` if the shapes do not broadcast.
pub fn pow_op(graph: &Graph, base: &Tensor, exponent: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = broadcast_binary(base, exponent, f64::powf, "pow")?;
    graph.record(&output, &[base, exponent], || PowBackward {
        base: base.clone(),
        exponent: exponent.clone(),
    });
    Ok(output)
}

/// Raises every element to a constant power.
pub fn pow_scalar_op(graph: &Graph, base: &Tensor, exponent: f64) -> Result<Tensor, TensorGradError> {
    pow_op(graph, base, &Tensor::scalar(exponent))
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
