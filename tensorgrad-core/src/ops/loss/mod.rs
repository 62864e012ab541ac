//! Loss functions reducing a batch to a 1×1 tensor.

pub mod cross_entropy;

pub use cross_entropy::cross_entropy_op;
