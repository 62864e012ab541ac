use std::fmt::Debug;

use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// The backward half of a differentiable operator.
///
/// Every forward operator (`add_op`, `matmul_op`, ...) that records a node
/// stores one implementation of this trait in the graph arena, together with
/// the node's inputs and output. The struct carries whatever the forward pass
/// cached for the local derivative (input tensors for MatMul, the output for
/// Softmax, the column widths for Concatenate, ...).
///
/// The trait requires `Debug + Send + Sync` so nodes can live in the
/// `RwLock`-guarded arena and be printed when a replay fails.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes the gradient of the loss with respect to each input, given
    /// the gradient with respect to the output (`grad_output`, same shape as
    /// the output).
    ///
    /// Mathematically, for \( Y = f(X_1, ..., X_n) \) this returns
    /// \( \frac{dL}{dX_i} = \frac{dL}{dY} \cdot \frac{dY}{dX_i} \) for every i.
    ///
    /// # Returns
    /// One gradient per input, in the order the inputs were recorded, each
    /// with the shape of its input. Gradient arithmetic here never records
    /// new nodes.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError>;

    /// Short operator name used in logs and error messages.
    fn name(&self) -> &'static str;
}
