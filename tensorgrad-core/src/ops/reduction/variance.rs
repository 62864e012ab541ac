use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::ops::arithmetic::{mul_op, sub_op};
use crate::ops::reduction::mean_op;
use crate::tensor::Tensor;

/// Population variance of every row, as an `r×1` column.
///
/// Built from recorded primitives, `mean((x - mean(x)) ⊙ (x - mean(x)))`,
/// so its gradient comes from the Mean, Sub and Mul rules. Centering first
/// keeps the result non-negative and stable for rows of nearly equal values.
///
/// # Errors
/// Same as [`mean_op`].
pub fn variance_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    let mean = mean_op(graph, a)?;
    let centered = sub_op(graph, a, &mean)?;
    let squared = mul_op(graph, &centered, &centered)?;
    mean_op(graph, &squared)
}

#[cfg(test)]
#[path = "variance_test.rs"]
mod tests;
