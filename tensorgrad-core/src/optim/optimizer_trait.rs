use crate::error::TensorGradError;
use crate::nn::parameter::Parameter;

/// Trait defining the common interface for all optimizers.
///
/// Optimizers are responsible for updating model parameters based on their gradients.
pub trait Optimizer {
    /// Performs a single optimization step.
    ///
    /// Each managed parameter's gradient is taken (read and cleared) and
    /// applied. Parameters without a gradient are left untouched.
    fn step(&mut self) -> Result<(), TensorGradError>;

    /// Clears the gradients of all parameters managed by the optimizer.
    fn zero_grad(&mut self);

    /// Starts managing `param`. Its optimizer state is created on the first
    /// step that sees a gradient for it.
    fn add_param(&mut self, param: Parameter);

    /// The parameters managed by the optimizer, in insertion order.
    fn params(&self) -> &[Parameter];
}
