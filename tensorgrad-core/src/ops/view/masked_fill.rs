use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward pass for masked fill: `g ⊙ keep`, so masked cells get exactly 0.
#[derive(Debug)]
struct MaskedFillBackward {
    keep: Tensor,
}

impl BackwardOp for MaskedFillBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad = broadcast_binary(grad_output, &self.keep, |g, k| g * k, "masked_fill_backward")?;
        Ok(vec![grad])
    }

    fn name(&self) -> &'static str {
        "MaskedFill"
    }
}

/// Sets every position where `mask` is 0 to −∞, leaving the others as they are.
///
/// Equivalent to `x ⊙ keep + fill`, where `keep` is 1 where the mask is
/// non-zero and `fill` is −∞ where it is zero, except that a masked cell is
/// −∞ even when `x` already holds an infinity there (the product form would
/// give NaN). Masked cells receive a zero gradient; kept cells pass the
/// upstream gradient through. Typically followed by
/// [`softmax_op`](crate::ops::activation::softmax_op).
///
/// # Errors
/// `ShapeMismatch` if `mask` does not have exactly the shape of `x`.
pub fn masked_fill_op(graph: &Graph, x: &Tensor, mask: &Tensor) -> Result<Tensor, TensorGradError> {
    let shape = x.shape();
    let mask_shape = mask.shape();
    if shape != mask_shape {
        return Err(TensorGradError::ShapeMismatch {
            expected: shape,
            actual: mask_shape,
            operation: "masked_fill".to_string(),
        });
    }

    let output = broadcast_binary(
        x,
        mask,
        |v, m| if m != 0.0 { v } else { f64::NEG_INFINITY },
        "masked_fill",
    )?;
    if x.requires_grad() {
        let keep = mask.map(|m| if m != 0.0 { 1.0 } else { 0.0 })?;
        graph.record(&output, &[x], || MaskedFillBackward { keep });
    }
    Ok(output)
}

#[cfg(test)]
#[path = "masked_fill_test.rs"]
mod tests;
