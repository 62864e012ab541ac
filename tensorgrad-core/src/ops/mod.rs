//! # Tensor Operations Module (`ops`)
//!
//! This module is the operator library of the engine. Operations are grouped
//! into submodules by what they do.
//!
//! ## Structure:
//!
//! - **`_op` Functions:** Each operation has a function named `xxx_op` taking
//!   the [`Graph`] to record into as its first argument. It validates its
//!   preconditions, computes the forward output and, when an input requires
//!   grad, records a node.
//! - **`Backward` Structs:** Each primitive has a private struct (e.g.
//!   `AddBackward`, `MatMulBackward`) implementing
//!   [`BackwardOp`]. It stores what the forward pass cached for the local
//!   derivative.
//! - **Composites:** `variance_op` and `layer_norm_op` are built from recorded
//!   primitives and have no backward struct of their own.
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: broadcasting add, sub, mul, div, pow, neg.
//! - [`linalg`]: matmul (and its kernel configuration), transpose.
//! - [`reduction`]: sum, row-wise mean and variance.
//! - [`view`]: column concatenation, row selection, masked fill.
//! - [`activation`]: softmax, relu.
//! - [`math_elem`]: exp, ln.
//! - [`normalization`]: layer norm.
//! - [`loss`]: cross entropy.

use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod loss;
pub mod math_elem;
pub mod normalization;
pub mod reduction;
pub mod view;

/// Applies a unary element-wise operation to a tensor.
///
/// Handles output creation and autograd setup for the unary operators.
///
/// # Arguments
/// * `graph`: The graph to record into.
/// * `a`: The input tensor.
/// * `op`: The scalar function.
/// * `backward_builder`: Builds the backward struct from the input and the
///   output; only called when a node is recorded.
pub(crate) fn apply_unary_op<F, B, M>(
    graph: &Graph,
    a: &Tensor,
    op: F,
    backward_builder: M,
) -> Result<Tensor, TensorGradError>
where
    F: Fn(f64) -> f64,
    B: BackwardOp + 'static,
    M: FnOnce(&Tensor, &Tensor) -> B,
{
    let output = a.map(op)?;
    graph.record(&output, &[a], || backward_builder(a, &output));
    Ok(output)
}
