// src/tensor/create.rs

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, TensorGradError> {
    full(shape, 0.0)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, TensorGradError> {
    full(shape, 1.0)
}

/// Creates a new tensor filled with `value` with the specified shape.
pub fn full(shape: &[usize], value: f64) -> Result<Tensor, TensorGradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Zeros with the shape of `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, TensorGradError> {
    zeros(&tensor.shape())
}

/// Ones with the shape of `tensor`.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, TensorGradError> {
    ones(&tensor.shape())
}

/// Samples every element from `N(0, std²)`.
///
/// # Errors
/// `ConfigurationError` if `std` is negative or not finite.
pub fn randn<R: Rng + ?Sized>(
    shape: &[usize],
    std: f64,
    rng: &mut R,
) -> Result<Tensor, TensorGradError> {
    let normal = Normal::new(0.0, std).map_err(|e| {
        TensorGradError::ConfigurationError(format!("invalid standard deviation {}: {}", std, e))
    })?;
    let numel: usize = shape.iter().product();
    let data: Vec<f64> = (0..numel).map(|_| normal.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

/// Samples every element uniformly from `[low, high)`.
///
/// # Errors
/// `ConfigurationError` if `low >= high`.
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Tensor, TensorGradError> {
    if !(low < high) {
        return Err(TensorGradError::ConfigurationError(format!(
            "rand_uniform needs low < high, got [{}, {})",
            low, high
        )));
    }
    let uniform = Uniform::new(low, high);
    let numel: usize = shape.iter().product();
    let data: Vec<f64> = (0..numel).map(|_| uniform.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
