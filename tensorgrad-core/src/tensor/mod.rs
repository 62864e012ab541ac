// src/tensor/mod.rs

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TensorGradError;
use crate::tensor_data::TensorData;

mod autograd_methods;
mod debug;

pub mod broadcast_utils;
pub mod create;
pub mod utils;

pub use create::{full, ones, ones_like, rand_uniform, randn, zeros, zeros_like};

/// A dense, row-major tensor of `f64` values.
///
/// `Tensor` is a cheap handle around `Arc<RwLock<TensorData>>`:
/// 1.  **Shared Ownership:** cloning a `Tensor` shares the same buffer, so a
///     graph node and the caller can both hold the value it produced.
/// 2.  **Interior Mutability:** the gradient slot and (for parameters) the
///     buffer are updated through an immutable handle.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

/// Identity of the storage behind a `Tensor`. Clones share the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorId(usize);

impl Tensor {
    /// Creates a new leaf tensor from row-major data and a shape.
    ///
    /// # Errors
    /// `TensorCreationError` if `data_vec.len()` is not the product of `shape`.
    pub fn new(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, TensorGradError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// A 1×1 tensor. It broadcasts against any 2-D shape.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(TensorData {
                data: vec![value],
                shape: vec![1, 1],
                requires_grad: false,
                grad: None,
                creator: None,
            })),
        }
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Copies the row-major buffer out of the tensor.
    pub fn to_vec(&self) -> Vec<f64> {
        self.read_data().data.clone()
    }

    /// The single value of a one-element tensor.
    pub fn item(&self) -> Result<f64, TensorGradError> {
        let guard = self.read_data();
        if guard.data.len() != 1 {
            return Err(TensorGradError::ShapeMismatch {
                expected: vec![1, 1],
                actual: guard.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.data[0])
    }

    /// Reads one element by multi-dimensional index.
    pub fn at(&self, indices: &[usize]) -> Result<f64, TensorGradError> {
        let guard = self.read_data();
        match guard.offset_of(indices) {
            Some(offset) => Ok(guard.data[offset]),
            None => {
                let (index, len) = indices
                    .iter()
                    .zip(guard.shape.iter())
                    .find(|(i, d)| i >= d)
                    .map(|(&i, &d)| (i as isize, d))
                    .unwrap_or((indices.len() as isize, guard.shape.len()));
                Err(TensorGradError::IndexOutOfRange {
                    index,
                    len,
                    operation: "at".to_string(),
                })
            }
        }
    }

    /// Rows and columns of a 2-D tensor.
    ///
    /// # Errors
    /// `RankMismatch` naming `operation` if the tensor is not 2-D.
    pub fn dims2(&self, operation: &str) -> Result<(usize, usize), TensorGradError> {
        let guard = self.read_data();
        match guard.shape.as_slice() {
            [rows, cols] => Ok((*rows, *cols)),
            other => Err(TensorGradError::RankMismatch {
                expected: 2,
                actual: other.len(),
                operation: operation.to_string(),
            }),
        }
    }

    /// Identity of the shared storage; equal for clones of the same tensor.
    pub fn id(&self) -> TensorId {
        TensorId(Arc::as_ptr(&self.data) as *const () as usize)
    }

    /// A new leaf holding a copy of this tensor's data, outside any graph.
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        Tensor {
            data: Arc::new(RwLock::new(TensorData {
                data: guard.data.clone(),
                shape: guard.shape.clone(),
                requires_grad: false,
                grad: None,
                creator: None,
            })),
        }
    }

    /// Acquires a read lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }
}

impl Clone for Tensor {
    /// Shallow clone: the new handle shares data and gradient slot.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Tensor {
    /// Tensors are equal when shapes and element values match.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let a = self.read_data();
        let b = other.read_data();
        a.shape == b.shape && a.data == b.data
    }
}
