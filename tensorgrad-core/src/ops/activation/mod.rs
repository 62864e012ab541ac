// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! - [`softmax_op`]: row-wise softmax, stable under large and −∞ inputs.
//! - [`relu_op`]: Rectified Linear Unit.

pub mod relu;
pub mod softmax;

pub use relu::relu_op;
pub use softmax::softmax_op;
