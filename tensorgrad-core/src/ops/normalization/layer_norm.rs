use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::ops::arithmetic::{add_op, add_scalar_op, mul_op, pow_scalar_op, sub_op};
use crate::ops::reduction::mean_op;
use crate::tensor::Tensor;

/// Epsilon added to the variance when none is chosen explicitly.
pub const DEFAULT_LAYER_NORM_EPS: f64 = 1e-5;

fn check_affine(param: Option<&Tensor>, cols: usize, operation: &str) -> Result<(), TensorGradError> {
    if let Some(p) = param {
        let shape = p.shape();
        if shape != [1, cols] {
            return Err(TensorGradError::ShapeMismatch {
                expected: vec![1, cols],
                actual: shape,
                operation: operation.to_string(),
            });
        }
    }
    Ok(())
}

/// Normalizes every row of `x` to zero mean and unit variance, then applies
/// the optional per-column scale `gamma` and shift `beta` (both `1×cols`).
///
/// `(x − mean) ⊙ (var + eps)^(−1/2) ⊙ γ + β`, built entirely from recorded
/// primitives. The variance is the population variance of the centered row.
/// A constant row normalizes to zeros, not NaN, as long as `eps > 0`.
///
/// # Errors
/// - `ConfigurationError` if `eps` is negative or not finite.
/// - `ShapeMismatch` if `gamma` or `beta` is not `1×cols`.
/// - The errors of [`mean_op`] for a non 2-D or zero-width `x`.
pub fn layer_norm_op(
    graph: &Graph,
    x: &Tensor,
    gamma: Option<&Tensor>,
    beta: Option<&Tensor>,
    eps: f64,
) -> Result<Tensor, TensorGradError> {
    if !(eps >= 0.0 && eps.is_finite()) {
        return Err(TensorGradError::ConfigurationError(format!(
            "layer_norm epsilon must be finite and non-negative, got {}",
            eps
        )));
    }
    let (_, cols) = x.dims2("layer_norm")?;
    check_affine(gamma, cols, "layer_norm (gamma)")?;
    check_affine(beta, cols, "layer_norm (beta)")?;

    let mean = mean_op(graph, x)?;
    let centered = sub_op(graph, x, &mean)?;
    let squared = mul_op(graph, &centered, &centered)?;
    let variance = mean_op(graph, &squared)?;
    let inv_std = pow_scalar_op(graph, &add_scalar_op(graph, &variance, eps)?, -0.5)?;
    let mut normalized = mul_op(graph, &centered, &inv_std)?;

    if let Some(g) = gamma {
        normalized = mul_op(graph, &normalized, g)?;
    }
    if let Some(b) = beta {
        normalized = add_op(graph, &normalized, b)?;
    }
    Ok(normalized)
}

#[cfg(test)]
#[path = "layer_norm_test.rs"]
mod tests;
