//! Reverse-mode differentiation: the [`BackwardOp`] trait implemented by every
//! operator, the [`Graph`] arena that records operator invocations and replays
//! them, and a finite-difference gradient checker.

pub mod backward_op;
pub mod grad_check;
pub mod graph;

pub use backward_op::BackwardOp;
pub use graph::{Graph, GraphConfig, NodeId};
