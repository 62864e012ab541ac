use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Row-wise softmax of a row-major `rows×cols` buffer.
///
/// Each row is shifted by its largest finite entry (−∞ entries are skipped)
/// before exponentiating, and −∞ entries contribute exactly 0.
///
/// Rows that cannot be normalised this way are flagged in the returned
/// vector: a row holding `+∞` splits its mass evenly over the `+∞` entries
/// (0 elsewhere), and a row with no entry above −∞ becomes uniform, `1/cols`.
pub(crate) fn softmax_rows(data: &[f64], cols: usize) -> (Vec<f64>, Vec<bool>) {
    let mut out = Vec::with_capacity(data.len());
    let mut fallback = Vec::new();
    if cols == 0 {
        return (out, fallback);
    }
    for row in data.chunks(cols) {
        let infinite = row.iter().filter(|v| **v == f64::INFINITY).count();
        if infinite > 0 {
            let share = 1.0 / infinite as f64;
            out.extend(row.iter().map(|v| if *v == f64::INFINITY { share } else { 0.0 }));
            fallback.push(true);
            continue;
        }
        let max = row
            .iter()
            .copied()
            .filter(|v| *v != f64::NEG_INFINITY)
            .fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            out.extend(std::iter::repeat(1.0 / cols as f64).take(cols));
            fallback.push(true);
            continue;
        }
        let start = out.len();
        let mut sum = 0.0;
        for &v in row {
            let e = if v == f64::NEG_INFINITY { 0.0 } else { (v - max).exp() };
            sum += e;
            out.push(e);
        }
        for e in &mut out[start..] {
            *e /= sum;
        }
        fallback.push(false);
    }
    (out, fallback)
}

/// Backward pass for softmax, from the cached output:
/// `dx = y ⊙ (g − Σ(g ⊙ y))` per row. Fallback rows get a zero gradient.
#[derive(Debug)]
struct SoftmaxBackward {
    output: Vec<f64>,
    fallback: Vec<bool>,
    shape: Vec<usize>,
}

impl BackwardOp for SoftmaxBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let cols = self.shape[1];
        let grad = grad_output.read_data();
        let mut grad_input = vec![0.0; self.output.len()];
        if cols > 0 {
            let rows = self
                .output
                .chunks(cols)
                .zip(grad.data.chunks(cols))
                .zip(grad_input.chunks_mut(cols))
                .zip(self.fallback.iter());
            for (((y, g), dx), &fallback) in rows {
                if fallback {
                    continue;
                }
                let dot: f64 = y.iter().zip(g.iter()).map(|(y, g)| y * g).sum();
                for ((dx, &y), &g) in dx.iter_mut().zip(y.iter()).zip(g.iter()) {
                    *dx = y * (g - dot);
                }
            }
        }
        drop(grad);
        Ok(vec![Tensor::new(grad_input, self.shape.clone())?])
    }

    fn name(&self) -> &'static str {
        "Softmax"
    }
}

/// Softmax over every row of a 2-D tensor.
///
/// Numerically stable for large inputs (all-100 rows give a uniform row)
/// and for rows containing −∞ (from [`masked_fill_op`](crate::ops::view::masked_fill_op)),
/// whose entries come out as exactly 0. A row made only of −∞ is uniform and
/// passes no gradient back.
///
/// # Errors
/// `RankMismatch` if `a` is not 2-D.
pub fn softmax_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    let (rows, cols) = a.dims2("softmax")?;
    let (data, fallback) = softmax_rows(&a.read_data().data, cols);
    let output = Tensor::new(data, vec![rows, cols])?;
    graph.record(&output, &[a], || SoftmaxBackward {
        output: output.to_vec(),
        fallback,
        shape: vec![rows, cols],
    });
    Ok(output)
}

#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
