// src/tensor/debug.rs
use crate::tensor::Tensor;
use std::fmt;

/// Number of leading elements shown by `Debug`.
const PREVIEW_LEN: usize = 8;

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.read() {
            Ok(guard) => {
                let preview: Vec<f64> = guard.data.iter().take(PREVIEW_LEN).copied().collect();
                let ellipsis = if guard.data.len() > PREVIEW_LEN { ", .." } else { "" };
                write!(
                    f,
                    "Tensor(shape={:?}, data={:?}{}, requires_grad={}, has_grad={}, creator={:?})",
                    guard.shape,
                    preview,
                    ellipsis,
                    guard.requires_grad,
                    guard.grad.is_some(),
                    guard.creator
                )
            }
            Err(_) => write!(f, "Tensor(Error: RwLock poisoned)"),
        }
    }
}
