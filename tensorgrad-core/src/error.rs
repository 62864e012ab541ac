use thiserror::Error;

/// Custom error type for the tensorgrad engine.
///
/// Every variant describes a precondition violation detected before an
/// operator touches its output. None of them are recovered inside the engine;
/// they propagate to the caller.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum TensorGradError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual} during operation {operation}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Rank mismatch: operation {operation} expects rank {expected}, got rank {actual}")]
    RankMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Index out of range: index {index} for extent {len} during operation {operation}")]
    IndexOutOfRange {
        index: isize,
        len: usize,
        operation: String,
    },

    #[error("Incompatible checkpoint: {0}")]
    IncompatibleCheckpoint(String),

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Operation {operation} needs at least one tensor")]
    EmptyTensorList { operation: String },

    #[error("Shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientAccumulationShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Node belongs to graph {actual}, but backward was called on graph {expected}")]
    GraphMismatch { expected: u64, actual: u64 },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

// io::Error is neither Clone nor PartialEq, keep only its message.
impl From<std::io::Error> for TensorGradError {
    fn from(err: std::io::Error) -> Self {
        TensorGradError::Io(err.to_string())
    }
}
