//! Reductions: full sum, row-wise mean and row-wise variance.

pub mod mean;
pub mod sum;
pub mod variance;

pub use mean::mean_op;
pub use sum::sum_op;
pub use variance::variance_op;
