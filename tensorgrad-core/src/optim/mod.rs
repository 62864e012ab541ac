//! Optimizers for training with the gradients produced by the graph.
//!
//! This module provides the `Optimizer` trait, the Adam / AdamW optimizer and
//! gradient clipping helpers.

pub mod adam;
pub mod grad_clipping;
pub mod optimizer_trait;

pub use adam::{AdamConfig, AdamOptimizer, AdamParamState};
pub use grad_clipping::{clip_grad_norm, clip_grad_value};
pub use optimizer_trait::Optimizer;
