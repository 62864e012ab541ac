// src/tensor_data.rs
use crate::autograd::graph::NodeId;
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Internal storage and metadata for a Tensor.
///
/// Holds the row-major data buffer, the shape and the autograd metadata.
/// It is wrapped in `Arc<RwLock<TensorData>>` by `Tensor` so that several
/// graph nodes and callers can share one value while the gradient slot and
/// (for parameters) the buffer stay mutable.
#[derive(Debug)]
pub struct TensorData {
    /// Row-major element buffer. Its length always equals the product of `shape`.
    pub(crate) data: Vec<f64>,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,

    // --- Autograd Metadata ---
    /// If true, operations reading this tensor are recorded in the graph.
    pub(crate) requires_grad: bool,
    /// Accumulated gradient, same shape as the tensor. `None` until the
    /// tensor is seeded as a backward root or a backward rule writes to it.
    pub(crate) grad: Option<Tensor>,
    /// Handle of the node that produced this tensor. Leaves have `None`.
    /// The handle does not keep the node alive; the graph arena owns it.
    pub(crate) creator: Option<NodeId>,
}

impl TensorData {
    /// Creates a new `TensorData` from a row-major buffer and a shape.
    ///
    /// # Errors
    /// Returns `TensorGradError::TensorCreationError` if the buffer length does
    /// not equal the number of elements described by `shape`.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, TensorGradError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(TensorGradError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(TensorData {
            data,
            shape,
            requires_grad: false,
            grad: None,
            creator: None,
        })
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Linear offset of a multi-dimensional index, or `None` if the index has
    /// the wrong rank or leaves the tensor extent.
    pub fn offset_of(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if idx >= dim {
                return None;
            }
            offset = offset * dim + idx;
        }
        Some(offset)
    }
}
