use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Backward pass for column concatenation: the upstream gradient is cut
/// back into column slices of the original widths, in input order.
#[derive(Debug)]
struct ConcatBackward {
    widths: Vec<usize>,
}

impl BackwardOp for ConcatBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        grad_output.split_columns(&self.widths)
    }

    fn name(&self) -> &'static str {
        "Concatenate"
    }
}

/// Concatenates 2-D tensors side by side (along columns).
///
/// # Errors
/// - `EmptyTensorList` if `tensors` is empty.
/// - `RankMismatch` if an input is not 2-D.
/// - `DimensionMismatch` if the row counts differ.
pub fn concat_op(graph: &Graph, tensors: &[&Tensor]) -> Result<Tensor, TensorGradError> {
    let first = tensors.first().ok_or_else(|| TensorGradError::EmptyTensorList {
        operation: "concat".to_string(),
    })?;
    let (rows, _) = first.dims2("concat")?;

    let mut widths = Vec::with_capacity(tensors.len());
    for t in tensors {
        let (r, c) = t.dims2("concat")?;
        if r != rows {
            return Err(TensorGradError::DimensionMismatch {
                expected: rows,
                actual: r,
                operation: "concat".to_string(),
            });
        }
        widths.push(c);
    }

    let total: usize = widths.iter().sum();
    let mut data = Vec::with_capacity(rows * total);
    // Copied out one at a time: the same tensor may appear more than once.
    let buffers: Vec<Vec<f64>> = tensors.iter().map(|t| t.to_vec()).collect();
    for i in 0..rows {
        for (buffer, &w) in buffers.iter().zip(widths.iter()) {
            data.extend_from_slice(&buffer[i * w..(i + 1) * w]);
        }
    }

    let output = Tensor::new(data, vec![rows, total])?;
    graph.record(&output, tensors, || ConcatBackward { widths });
    Ok(output)
}

impl Tensor {
    /// Splits a 2-D tensor into consecutive column blocks of the given
    /// widths. Untracked; the inverse of [`concat_op`].
    ///
    /// # Errors
    /// - `RankMismatch` if the tensor is not 2-D.
    /// - `DimensionMismatch` if the widths do not add up to the column count.
    pub fn split_columns(&self, widths: &[usize]) -> Result<Vec<Tensor>, TensorGradError> {
        let (rows, cols) = self.dims2("split_columns")?;
        let total: usize = widths.iter().sum();
        if total != cols {
            return Err(TensorGradError::DimensionMismatch {
                expected: cols,
                actual: total,
                operation: "split_columns".to_string(),
            });
        }

        let guard = self.read_data();
        let mut parts = Vec::with_capacity(widths.len());
        let mut start = 0;
        for &w in widths {
            let mut data = Vec::with_capacity(rows * w);
            for row in guard.data.chunks(cols.max(1)).take(rows) {
                data.extend_from_slice(&row[start..start + w]);
            }
            parts.push(Tensor::new(data, vec![rows, w])?);
            start += w;
        }
        Ok(parts)
    }
}

#[cfg(test)]
#[path = "concat_test.rs"]
mod tests;
