// tensorgrad-core/src/ops/view/mod.rs

//! Operators that rearrange or select elements without arithmetic:
//! column concatenation, row gathering and masking.

pub mod concat;
pub mod masked_fill;
pub mod row_select;

pub use concat::concat_op;
pub use masked_fill::masked_fill_op;
pub use row_select::row_select_op;
