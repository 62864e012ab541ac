pub mod layer_norm;

pub use layer_norm::{layer_norm_op, DEFAULT_LAYER_NORM_EPS};
