use log::debug;
use thiserror::Error;

use crate::autograd::Graph;
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(TensorGradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(TensorGradError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(TensorGradError),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check input tensor must be a leaf node. Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<TensorGradError> for GradCheckError {
    fn from(err: TensorGradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against numerical gradients using central
/// finite differences.
///
/// `func` builds the computation on the graph it is given. The analytical
/// pass runs it once on a fresh graph and backpropagates `output_grad`; each
/// numerical probe runs it again on untracked, perturbed copies of the inputs.
/// The scalar being differentiated is `Σ output ⊙ output_grad`.
///
/// An element passes when the absolute difference or the relative difference
/// is within `tolerance`.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&Graph, &[Tensor]) -> Result<Tensor, TensorGradError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        input.clear_grad();
    }

    // Analytical pass.
    let graph = Graph::new();
    let output = func(&graph, inputs).map_err(GradCheckError::ForwardPassError)?;
    let any_input_requires_grad = inputs.iter().any(|t| t.requires_grad());
    if any_input_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if output.requires_grad() {
        graph
            .backward_with_grad(&output, output_grad)
            .map_err(GradCheckError::BackwardPassError)?;
    }
    debug!("grad check: analytical pass recorded {} nodes", graph.len());

    let untracked: Vec<Tensor> = inputs.iter().map(|t| t.detach()).collect();

    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical = original_input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .to_vec();
        let original_data = original_input.to_vec();
        let shape = original_input.shape();

        for elem_idx in 0..original_data.len() {
            let probe = |delta: f64| -> Result<f64, GradCheckError> {
                let mut data = original_data.clone();
                data[elem_idx] += delta;
                let mut perturbed_inputs = untracked.clone();
                perturbed_inputs[i] = Tensor::new(data, shape.clone())?;
                let probe_graph = Graph::new();
                let out = func(&probe_graph, &perturbed_inputs).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&out, output_grad)
            };
            let loss_plus = probe(epsilon)?;
            let loss_minus = probe(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }

            let difference = (analytical_grad - numerical_grad).abs();
            if difference > tolerance && (difference / (analytical_grad.abs() + epsilon)) > tolerance {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference,
                });
            }
        }
    }

    Ok(())
}

/// `Σ output ⊙ output_grad`, whose gradient with respect to `output` is
/// exactly `output_grad`. Masked (−∞) outputs are skipped where the weight is 0.
fn calculate_loss(output: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::TensorError(TensorGradError::ShapeMismatch {
            expected: output.shape(),
            actual: output_grad.shape(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    let weights = output_grad.to_vec();
    Ok(output
        .to_vec()
        .iter()
        .zip(weights.iter())
        .filter(|&(_, &w)| w != 0.0)
        .map(|(&y, &w)| y * w)
        .sum())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
