use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Fills the input `Tensor` with the scalar value 0.
///
/// Operates in-place.
pub fn zeros_(tensor: &Tensor) -> Result<(), TensorGradError> {
    fill_inplace(tensor, |_| 0.0)
}

/// Fills the input `Tensor` with the scalar value 1.
///
/// Operates in-place.
pub fn ones_(tensor: &Tensor) -> Result<(), TensorGradError> {
    fill_inplace(tensor, |_| 1.0)
}

/// Fills the input `Tensor` with samples from `N(0, std²)`.
///
/// # Errors
/// `ConfigurationError` if `std` is negative or not finite.
pub fn normal_<R: Rng + ?Sized>(tensor: &Tensor, std: f64, rng: &mut R) -> Result<(), TensorGradError> {
    let normal = Normal::new(0.0, std).map_err(|e| {
        TensorGradError::ConfigurationError(format!("invalid standard deviation {}: {}", std, e))
    })?;
    fill_inplace(tensor, |_| normal.sample(rng))
}

/// Fills the input `Tensor` with samples from `U[low, high)`.
///
/// # Errors
/// `ConfigurationError` if `low >= high`.
pub fn uniform_<R: Rng + ?Sized>(tensor: &Tensor, low: f64, high: f64, rng: &mut R) -> Result<(), TensorGradError> {
    if !(low < high) {
        return Err(TensorGradError::ConfigurationError(format!(
            "uniform_ needs low < high, got [{}, {})",
            low, high
        )));
    }
    let uniform = Uniform::new(low, high);
    fill_inplace(tensor, |_| uniform.sample(rng))
}

// --- Internal Helper for In-place Fill ---

/// Overwrites every element with `value(index)`.
///
/// Only leaves may be filled: an operator output is referenced by the graph
/// and its value must stay what the forward pass computed.
fn fill_inplace(tensor: &Tensor, mut value: impl FnMut(usize) -> f64) -> Result<(), TensorGradError> {
    let mut guard = tensor.write_data();
    if guard.creator.is_some() {
        return Err(TensorGradError::ConfigurationError(
            "in-place initialisation of a tensor produced by an operator".to_string(),
        ));
    }
    for (i, v) in guard.data.iter_mut().enumerate() {
        *v = value(i);
    }
    Ok(())
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
