use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Backward pass for the row-wise mean: `dY[i] / n` spread over row i.
#[derive(Debug)]
struct MeanBackward {
    width: usize,
}

impl BackwardOp for MeanBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let (rows, _) = grad_output.dims2("mean_backward")?;
        let n = self.width as f64;
        let grad = grad_output.read_data();
        let data: Vec<f64> = grad
            .data
            .iter()
            .flat_map(|&g| std::iter::repeat(g / n).take(self.width))
            .collect();
        drop(grad);
        Ok(vec![Tensor::new(data, vec![rows, self.width])?])
    }

    fn name(&self) -> &'static str {
        "Mean"
    }
}

/// Mean of every row of an `r×c` tensor, as an `r×1` column.
///
/// # Errors
/// - `RankMismatch` if `a` is not 2-D.
/// - `DimensionMismatch` if the rows are empty (`c == 0`).
pub fn mean_op(graph: &Graph, a: &Tensor) -> Result<Tensor, TensorGradError> {
    let (rows, cols) = a.dims2("mean")?;
    if cols == 0 {
        return Err(TensorGradError::DimensionMismatch {
            expected: 1,
            actual: 0,
            operation: "mean".to_string(),
        });
    }
    let n = cols as f64;
    let data: Vec<f64> = a
        .read_data()
        .data
        .chunks(cols)
        .map(|row| row.iter().sum::<f64>() / n)
        .collect();
    let output = Tensor::new(data, vec![rows, 1])?;
    graph.record(&output, &[a], || MeanBackward { width: cols });
    Ok(output)
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;
