use log::trace;

use crate::error::TensorGradError;
use crate::nn::parameter::Parameter;

/// Clips gradient of a set of parameters in place.
///
/// The gradients are clipped element-wise in the range `[-clip_value, clip_value]`.
/// Parameters without a gradient are skipped.
///
/// # Errors
/// `ConfigurationError` if `clip_value` is negative or NaN.
pub fn clip_grad_value(params: &[Parameter], clip_value: f64) -> Result<(), TensorGradError> {
    if !(clip_value >= 0.0) {
        return Err(TensorGradError::ConfigurationError(
            "clip_value must be non-negative".to_string(),
        ));
    }
    for param in params {
        if let Some(grad) = param.grad() {
            let mut guard = grad.write_data();
            for g in guard.data.iter_mut() {
                *g = g.clamp(-clip_value, clip_value);
            }
        }
    }
    Ok(())
}

/// Clips the global L2 norm of the gradients of `params` in place.
///
/// The gradients are viewed as a single concatenated vector, and if its total norm
/// exceeds `max_norm`, all gradients are scaled down by a common factor
/// `max_norm / (total_norm + 1e-6)`.
///
/// Returns the total norm measured before clipping.
///
/// # Errors
/// `ConfigurationError` if `max_norm` is negative or NaN.
pub fn clip_grad_norm(params: &[Parameter], max_norm: f64) -> Result<f64, TensorGradError> {
    if !(max_norm >= 0.0) {
        return Err(TensorGradError::ConfigurationError(
            "max_norm must be non-negative".to_string(),
        ));
    }

    let grads: Vec<_> = params.iter().filter_map(|p| p.grad()).collect();
    let total_norm = grads
        .iter()
        .map(|g| g.read_data().data.iter().map(|v| v * v).sum::<f64>())
        .sum::<f64>()
        .sqrt();

    if total_norm > max_norm {
        let clip_coef = if max_norm == 0.0 {
            0.0
        } else {
            max_norm / (total_norm + 1e-6)
        };
        trace!("clip_grad_norm: total norm {} scaled by {}", total_norm, clip_coef);
        for grad in &grads {
            let mut guard = grad.write_data();
            for g in guard.data.iter_mut() {
                *g *= clip_coef;
            }
        }
    }
    Ok(total_norm)
}

#[cfg(test)]
#[path = "grad_clipping_test.rs"]
mod tests;
