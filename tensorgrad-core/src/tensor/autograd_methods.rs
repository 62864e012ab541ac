use log::warn;

use crate::autograd::graph::NodeId;
use crate::error::TensorGradError;
use crate::tensor::broadcast_utils::read_pair;
use crate::tensor::Tensor;

impl Tensor {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` flag for this tensor.
    pub fn set_requires_grad(&self, requires_grad: bool) {
        let mut guard = self.write_data();
        if requires_grad && guard.creator.is_some() {
            warn!("set_requires_grad(true) on a non-leaf tensor; it is already tracked by its creator node");
        }
        guard.requires_grad = requires_grad;
    }

    /// Returns a handle to the accumulated gradient, if any.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Removes and returns the accumulated gradient, leaving the slot empty.
    pub fn take_grad(&self) -> Option<Tensor> {
        self.write_data().grad.take()
    }

    /// Clears the gradient slot.
    pub fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// Handle of the node that produced this tensor.
    pub fn creator(&self) -> Option<NodeId> {
        self.read_data().creator
    }

    /// A tensor without a creator node: a literal or a parameter.
    pub fn is_leaf(&self) -> bool {
        self.read_data().creator.is_none()
    }

    /// Adds `grad_to_add` into the gradient slot.
    ///
    /// An empty slot takes a private copy, an occupied one is summed
    /// elementwise. Contributions are never overwritten.
    ///
    /// # Errors
    /// `GradientAccumulationShapeMismatch` if the shapes differ.
    pub fn acc_grad(&self, grad_to_add: &Tensor) -> Result<(), TensorGradError> {
        let expected = self.shape();
        let actual = grad_to_add.shape();
        if expected != actual {
            return Err(TensorGradError::GradientAccumulationShapeMismatch { expected, actual });
        }

        let existing = self.grad();
        match existing {
            Some(existing_grad) => {
                let summed: Vec<f64> = read_pair(&existing_grad, grad_to_add, |acc, add| {
                    acc.data.iter().zip(add.data.iter()).map(|(a, b)| a + b).collect()
                });
                existing_grad.write_data().data = summed;
            }
            None => {
                self.write_data().grad = Some(grad_to_add.detach());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
