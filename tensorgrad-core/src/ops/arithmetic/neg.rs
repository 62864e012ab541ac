use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::apply_unary_op;
use crate::tensor::Tensor;

#[derive(Debug)]
struct NegBackward;

impl BackwardOp for NegBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        Ok(vec![grad_output.map(|g| -g)?])
    }

    fn name(&self) -> &'static str {
        "Neg"
    }
}

/// Element-wise negation.
pub fn neg_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    apply_unary_op(graph, a, |x| -x, |_, _| NegBackward)
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
