//! Learnable parameters, their initialisation, and checkpoint persistence.

pub mod checkpoint;
pub mod init;
pub mod parameter;

pub use parameter::Parameter;
