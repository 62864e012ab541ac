//! Reverse-mode automatic differentiation over dense `f64` tensors.
//!
//! Operators in [`ops`] compute their forward value eagerly and record a node
//! into a [`Graph`] when any input requires grad. [`Graph::backward`] replays
//! the recorded nodes in reverse topological order and accumulates gradients
//! into every leaf that requires them. [`optim::AdamOptimizer`] consumes those
//! gradients, and [`nn::checkpoint`] persists parameter values.

pub mod autograd;
pub mod error;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use autograd::{BackwardOp, Graph, GraphConfig, NodeId};
pub use error::TensorGradError;
pub use nn::Parameter;
pub use ops::linalg::{KernelStats, MatmulConfig};
pub use optim::{AdamConfig, AdamOptimizer, Optimizer};
pub use tensor::{full, ones, ones_like, rand_uniform, randn, zeros, zeros_like, Tensor, TensorId};
