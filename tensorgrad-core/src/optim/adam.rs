use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, trace};

use crate::error::TensorGradError;
use crate::nn::parameter::Parameter;
use crate::optim::Optimizer;
use crate::tensor::{zeros_like, Tensor, TensorId};

/// Hyper-parameters of [`AdamOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    pub lr: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub eps: f64,
    pub weight_decay: f64,
    /// `true` for AdamW: weight decay is applied to the parameter directly
    /// instead of being added to the gradient.
    pub decoupled_weight_decay: bool,
}

impl Default for AdamConfig {
    fn default() -> Self {
        AdamConfig {
            lr: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay: 0.0,
            decoupled_weight_decay: false,
        }
    }
}

impl AdamConfig {
    /// AdamW with the default betas and epsilon.
    pub fn adamw(lr: f64, weight_decay: f64) -> Self {
        AdamConfig {
            lr,
            weight_decay,
            decoupled_weight_decay: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TensorGradError> {
        if !(self.lr > 0.0) {
            return Err(TensorGradError::ConfigurationError(
                "Learning rate must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.beta1) {
            return Err(TensorGradError::ConfigurationError(
                "Beta1 must be in [0, 1)".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.beta2) {
            return Err(TensorGradError::ConfigurationError(
                "Beta2 must be in [0, 1)".to_string(),
            ));
        }
        if !(self.eps > 0.0) {
            return Err(TensorGradError::ConfigurationError(
                "Epsilon must be positive".to_string(),
            ));
        }
        if !(self.weight_decay >= 0.0) {
            return Err(TensorGradError::ConfigurationError(
                "Weight decay must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Represents the state for a single parameter in the Adam optimizer.
#[derive(Debug, Clone)]
pub struct AdamParamState {
    /// First moment vector (exponential moving average of gradients).
    pub m: Tensor,
    /// Second moment vector (exponential moving average of squared gradients).
    pub v: Tensor,
}

/// Adam and AdamW Optimizer.
#[derive(Debug)]
pub struct AdamOptimizer {
    params: Vec<Parameter>,
    config: AdamConfig,
    iterations: u64,
    state: HashMap<TensorId, AdamParamState>,
}

impl AdamOptimizer {
    pub fn new(params: Vec<Parameter>, config: AdamConfig) -> Result<Self, TensorGradError> {
        config.validate()?;
        Ok(AdamOptimizer {
            params,
            config,
            iterations: 0,
            state: HashMap::new(),
        })
    }

    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    /// Number of completed steps. Bias correction uses this counter.
    pub fn step_count(&self) -> u64 {
        self.iterations
    }

    /// Moments of `param`, or `None` until a step has seen its gradient.
    pub fn state_for(&self, param: &Parameter) -> Option<&AdamParamState> {
        self.state.get(&param.id())
    }
}

impl Optimizer for AdamOptimizer {
    fn step(&mut self) -> Result<(), TensorGradError> {
        if self.params.is_empty() {
            return Ok(());
        }
        self.iterations += 1;
        let t = self.iterations as i32;
        let AdamConfig {
            lr,
            beta1,
            beta2,
            eps,
            weight_decay,
            decoupled_weight_decay,
        } = self.config;
        let bias_correction1 = 1.0 - beta1.powi(t);
        let bias_correction2 = 1.0 - beta2.powi(t);

        let mut updated = 0usize;
        for param in &self.params {
            let grad = match param.take_grad() {
                Some(g) => g,
                None => continue,
            };
            let grad_shape = grad.shape();
            if grad_shape != param.shape() {
                return Err(TensorGradError::ShapeMismatch {
                    expected: param.shape(),
                    actual: grad_shape,
                    operation: "adam step".to_string(),
                });
            }
            let grad = grad.to_vec();

            let state = match self.state.entry(param.id()) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    trace!("Adam: initialising moments for {:?}", param.name());
                    e.insert(AdamParamState {
                        m: zeros_like(param)?,
                        v: zeros_like(param)?,
                    })
                }
            };
            let mut m_guard = state.m.write_data();
            let mut v_guard = state.v.write_data();
            let mut p_guard = param.write_data();

            for (i, &g_raw) in grad.iter().enumerate() {
                let p_old = p_guard.data[i];
                let g = if !decoupled_weight_decay && weight_decay != 0.0 {
                    g_raw + weight_decay * p_old
                } else {
                    g_raw
                };
                let m = beta1 * m_guard.data[i] + (1.0 - beta1) * g;
                let v = beta2 * v_guard.data[i] + (1.0 - beta2) * g * g;
                m_guard.data[i] = m;
                v_guard.data[i] = v;

                let m_hat = m / bias_correction1;
                let v_hat = v / bias_correction2;
                let mut p_new = p_old - lr * m_hat / (v_hat.sqrt() + eps);
                if decoupled_weight_decay {
                    p_new -= lr * weight_decay * p_old;
                }
                p_guard.data[i] = p_new;
            }
            updated += 1;
        }
        debug!(
            "Adam step {}: updated {}/{} parameters",
            self.iterations,
            updated,
            self.params.len()
        );
        Ok(())
    }

    fn zero_grad(&mut self) {
        for param in &self.params {
            param.clear_grad();
        }
    }

    fn add_param(&mut self, param: Parameter) {
        self.params.push(param);
    }

    fn params(&self) -> &[Parameter] {
        &self.params
    }
}

#[cfg(test)]
#[path = "adam_test.rs"]
mod tests;
