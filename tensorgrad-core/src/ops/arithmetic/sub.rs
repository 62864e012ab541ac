use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::broadcast_binary;
use crate::tensor::Tensor;

/// Backward operation for subtraction: `da = g`, `db = -g`, each reduced to
/// its operand's shape.
#[derive(Debug)]
struct SubBackward {
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = grad_output.map(|g| -g)?.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn name(&self) -> &'static str {
        "Sub"
    }
}

/// Element-wise subtraction `a - b` with broadcasting.
///
/// # Errors
/// `ShapeMismatch` if the shapes do not broadcast.
pub fn sub_op(graph: &Graph, a: &Tensor, b: &Tensor) -> Result<Tensor, TensorGradError> {
    let output = broadcast_binary(a, b, |x, y| x - y, "sub")?;
    graph.record(&output, &[a, b], || SubBackward {
        a_shape: a.shape(),
        b_shape: b.shape(),
    });
    Ok(output)
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
