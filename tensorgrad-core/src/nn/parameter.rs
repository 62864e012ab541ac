use std::fmt;
use std::ops::Deref;

use crate::tensor::Tensor;

/// A wrapper around a Tensor indicating it is a learnable parameter.
/// Parameters automatically have `requires_grad` set to `true`.
///
/// Cloning a `Parameter` is shallow: both handles share the tensor, so an
/// optimizer and the model code see the same values and gradient slot.
pub struct Parameter {
    tensor: Tensor,
    name: Option<String>,
}

impl Parameter {
    /// Creates a new unnamed Parameter from a Tensor.
    /// Ensures that the underlying Tensor requires gradients.
    pub fn new(tensor: Tensor) -> Self {
        tensor.set_requires_grad(true);
        Parameter { tensor, name: None }
    }

    /// Creates a named Parameter. The name only shows up in logs and `Debug`.
    pub fn named(name: impl Into<String>, tensor: Tensor) -> Self {
        let mut param = Self::new(tensor);
        param.name = Some(name.into());
        param
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    /// Consumes the Parameter and returns the underlying Tensor.
    pub fn into_inner(self) -> Tensor {
        self.tensor
    }
}

impl Deref for Parameter {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        &self.tensor
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Parameter({}: {:?})", name, self.tensor),
            None => write!(f, "Parameter({:?})", self.tensor),
        }
    }
}

impl Clone for Parameter {
    fn clone(&self) -> Self {
        Parameter {
            tensor: self.tensor.clone(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
