use std::sync::Arc;

use crate::error::TensorGradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_strides, increment_coord};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Runs `f` with read access to both tensors, taking a single lock when both
/// handles share storage (e.g. `x * x`).
pub(crate) fn read_pair<R>(
    a: &Tensor,
    b: &Tensor,
    f: impl FnOnce(&TensorData, &TensorData) -> R,
) -> R {
    let a_guard = a.read_data();
    if Arc::ptr_eq(&a.data, &b.data) {
        f(&a_guard, &a_guard)
    } else {
        let b_guard = b.read_data();
        f(&a_guard, &b_guard)
    }
}

/// Elementwise combination of two row-major buffers under broadcasting.
///
/// `out_shape` must be the broadcast of `a_shape` and `b_shape`.
pub(crate) fn broadcast_binary_kernel<F>(
    a: &[f64],
    a_shape: &[usize],
    b: &[f64],
    b_shape: &[usize],
    out_shape: &[usize],
    f: F,
) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    let numel: usize = out_shape.iter().product();
    if a_shape == out_shape && b_shape == out_shape {
        return a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
    }

    let a_strides = broadcast_strides(a_shape, out_shape);
    let b_strides = broadcast_strides(b_shape, out_shape);
    let mut out = Vec::with_capacity(numel);
    let mut coord = vec![0; out_shape.len()];
    for _ in 0..numel {
        let mut a_off = 0;
        let mut b_off = 0;
        for d in 0..coord.len() {
            a_off += coord[d] * a_strides[d];
            b_off += coord[d] * b_strides[d];
        }
        out.push(f(a[a_off], b[b_off]));
        increment_coord(&mut coord, out_shape);
    }
    out
}

/// Untracked broadcasting combinator: never records a graph node.
///
/// Forward operators wrap it and attach their node; backward rules use it
/// directly so gradient arithmetic stays out of the graph.
pub fn broadcast_binary<F>(
    a: &Tensor,
    b: &Tensor,
    f: F,
    operation: &str,
) -> Result<Tensor, TensorGradError>
where
    F: Fn(f64, f64) -> f64,
{
    let (data, shape) = read_pair(a, b, |a_td, b_td| {
        let out_shape = broadcast_shapes(&a_td.shape, &b_td.shape, operation)?;
        let data = broadcast_binary_kernel(
            &a_td.data,
            &a_td.shape,
            &b_td.data,
            &b_td.shape,
            &out_shape,
            f,
        );
        Ok::<_, TensorGradError>((data, out_shape))
    })?;
    Tensor::new(data, shape)
}

/// Sums a broadcast buffer of `source_shape` back down to `target_shape`.
pub(crate) fn reduce_to_shape_kernel(
    source: &[f64],
    source_shape: &[usize],
    target_shape: &[usize],
) -> Vec<f64> {
    let target_numel: usize = target_shape.iter().product();
    let mut reduced = vec![0.0; target_numel];
    let target_strides = broadcast_strides(target_shape, source_shape);
    let mut coord = vec![0; source_shape.len()];
    for &value in source {
        let mut offset = 0;
        for d in 0..coord.len() {
            offset += coord[d] * target_strides[d];
        }
        reduced[offset] += value;
        increment_coord(&mut coord, source_shape);
    }
    reduced
}

impl Tensor {
    /// Reduces the tensor (a gradient) to `target_shape` by summing along
    /// every dimension that broadcasting stretched or prepended.
    ///
    /// This is the reverse of broadcasting and is applied by every
    /// elementwise backward rule to each operand.
    ///
    /// # Errors
    /// `ShapeMismatch` if `target_shape` does not broadcast to this
    /// tensor's shape.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, TensorGradError> {
        let guard = self.read_data();
        if guard.shape == target_shape {
            drop(guard);
            return Ok(self.detach());
        }

        let current_shape = guard.shape.clone();
        let rank_diff = current_shape.len().checked_sub(target_shape.len());
        let compatible = rank_diff.map_or(false, |diff| {
            target_shape
                .iter()
                .enumerate()
                .all(|(i, &t)| t == 1 || t == current_shape[diff + i])
        });
        if !compatible {
            return Err(TensorGradError::ShapeMismatch {
                expected: target_shape.to_vec(),
                actual: current_shape,
                operation: "reduce_to_shape".to_string(),
            });
        }

        let reduced = reduce_to_shape_kernel(&guard.data, &current_shape, target_shape);
        drop(guard);
        Tensor::new(reduced, target_shape.to_vec())
    }

    /// Applies `f` elementwise into a new untracked tensor.
    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Result<Tensor, TensorGradError> {
        let guard = self.read_data();
        let data = guard.data.iter().map(|&v| f(v)).collect();
        let shape = guard.shape.clone();
        drop(guard);
        Tensor::new(data, shape)
    }
}

#[cfg(test)]
#[path = "broadcast_utils_test.rs"]
mod tests;
