// src/ops/linalg/mod.rs

pub mod kernel;
pub mod matmul;
pub mod transpose;

pub use kernel::{KernelStats, MatmulConfig};
pub use matmul::matmul_op;
pub use transpose::transpose_op;
