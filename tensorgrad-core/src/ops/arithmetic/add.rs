// tensorgrad-core/src/ops/arithmetic/add.rs

use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

// --- Backward Operation ---

/// Backward operation for addition. Both operands receive the upstream
/// gradient, summed back down to their own shape.
#[derive(Debug)]
struct AddBackward {
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = grad_output.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn name(&self) -> &'static str {
        "Add"
    }
}

// --- Forward Operation ---

/// Element-wise addition with broadcasting.
///
/// # Errors
/// `ShapeMismatch` if the shapes do not broadcast.
pub fn add_op(graph: &Graph, a: &Tensor, b: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = broadcast_binary(a, b, |x, y| x + y, "add")?;
    graph.record(&output, &[a, b], || AddBackward {
        a_shape: a.shape(),
        b_shape: b.shape(),
    });
    Ok(output)
}

/// Adds a constant to every element.
pub fn add_scalar_op(graph: &Graph, a: &Tensor, scalar: f64) -> Result<Tensor, TensorGradError> {
    add_op(graph, a, &Tensor::scalar(scalar))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
