use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::ops::activation::softmax::softmax_rows;
use crate::tensor::Tensor;

/// Fused backward pass for softmax + negative log-likelihood:
/// `dlogits = g · (softmax − onehot(target)) / rows`. Rows that softmax could
/// not normalise get a zero gradient.
#[derive(Debug)]
struct CrossEntropyBackward {
    probs: Vec<f64>,
    fallback: Vec<bool>,
    targets: Vec<usize>,
    shape: Vec<usize>,
}

impl BackwardOp for CrossEntropyBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let g = grad_output.item()?;
        let (rows, cols) = (self.shape[0], self.shape[1]);
        let scale = g / rows as f64;
        let mut grad: Vec<f64> = self.probs.iter().map(|p| p * scale).collect();
        for (row, &target) in self.targets.iter().enumerate() {
            if self.fallback[row] {
                grad[row * cols..(row + 1) * cols].iter_mut().for_each(|v| *v = 0.0);
            } else {
                grad[row * cols + target] -= scale;
            }
        }
        Ok(vec![Tensor::new(grad, self.shape.clone())?])
    }

    fn name(&self) -> &'static str {
        "CrossEntropy"
    }
}

/// Mean negative log-likelihood of `targets` under the row-wise softmax of
/// `logits`, as a 1×1 tensor.
///
/// Each row's loss is `logsumexp(row) − row[target]`, computed on the
/// max-shifted row so large logits do not overflow. A row holding `+∞` or
/// no entry above −∞ scores `−ln p[target]` under the softmax fallback
/// instead: `ln(cols)` for an all −∞ row, 0 or `+∞` for a `+∞` row.
///
/// # Errors
/// - `RankMismatch` if `logits` is not 2-D.
/// - `DimensionMismatch` if there is not exactly one target per row, or there
///   are no rows.
/// - `IndexOutOfRange` if a target is not a valid column.
pub fn cross_entropy_op(graph: &Graph, logits: &Tensor, targets: &[usize]) -> Result<Tensor, TensorGradError> {
    let (rows, cols) = logits.dims2("cross_entropy")?;
    if targets.len() != rows {
        return Err(TensorGradError::DimensionMismatch {
            expected: rows,
            actual: targets.len(),
            operation: "cross_entropy".to_string(),
        });
    }
    if rows == 0 {
        return Err(TensorGradError::DimensionMismatch {
            expected: 1,
            actual: 0,
            operation: "cross_entropy".to_string(),
        });
    }
    if let Some(&bad) = targets.iter().find(|&&t| t >= cols) {
        return Err(TensorGradError::IndexOutOfRange {
            index: bad as isize,
            len: cols,
            operation: "cross_entropy".to_string(),
        });
    }

    let guard = logits.read_data();
    let (probs, fallback) = softmax_rows(&guard.data, cols);
    let mut total = 0.0;
    for (i, (row, &target)) in guard.data.chunks(cols).zip(targets.iter()).enumerate() {
        if fallback[i] {
            total -= probs[i * cols + target].ln();
            continue;
        }
        let max = row
            .iter()
            .copied()
            .filter(|v| *v != f64::NEG_INFINITY)
            .fold(f64::NEG_INFINITY, f64::max);
        let log_sum: f64 = row
            .iter()
            .map(|v| if *v == f64::NEG_INFINITY { 0.0 } else { (v - max).exp() })
            .sum::<f64>()
            .ln()
            + max;
        total += log_sum - row[target];
    }
    drop(guard);

    let output = Tensor::scalar(total / rows as f64);
    graph.record(&output, &[logits], || CrossEntropyBackward {
        probs,
        fallback,
        targets: targets.to_vec(),
        shape: vec![rows, cols],
    });
    Ok(output)
}

#[cfg(test)]
#[path = "cross_entropy_test.rs"]
mod tests;
