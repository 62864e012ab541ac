use crate::autograd::{BackwardOp, Graph};
use crate::error::TensorGradError;
use crate::tensor::Tensor;

/// Backward pass for row selection: scatters each upstream row back into a
/// zero gradient at the row it came from, summing repeated indices.
#[derive(Debug)]
struct RowSelectBackward {
    input_rows: usize,
    cols: usize,
    rows: Vec<usize>,
}

impl BackwardOp for RowSelectBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, TensorGradError> {
        let cols = self.cols;
        let mut grad_input = vec![0.0; self.input_rows * cols];
        let grad = grad_output.read_data();
        for (out_row, &src) in self.rows.iter().enumerate() {
            let upstream = &grad.data[out_row * cols..(out_row + 1) * cols];
            for (acc, &g) in grad_input[src * cols..(src + 1) * cols].iter_mut().zip(upstream) {
                *acc += g;
            }
        }
        drop(grad);
        Ok(vec![Tensor::new(grad_input, vec![self.input_rows, cols])?])
    }

    fn name(&self) -> &'static str {
        "RowSelect"
    }
}

/// Resolves possibly negative row indices against `len` rows.
fn resolve_indices(indices: &[isize], len: usize) -> Result<Vec<usize>, TensorGradError> {
    indices
        .iter()
        .map(|&index| {
            let resolved = if index < 0 { index + len as isize } else { index };
            if resolved < 0 || resolved as usize >= len {
                Err(TensorGradError::IndexOutOfRange {
                    index,
                    len,
                    operation: "row_select".to_string(),
                })
            } else {
                Ok(resolved as usize)
            }
        })
        .collect()
}

/// Gathers rows of a 2-D tensor, in the order given.
///
/// Negative indices count from the end (`-1` is the last row). Rows may be
/// selected more than once; their gradients add up.
///
/// # Errors
/// - `RankMismatch` if `a` is not 2-D.
/// - `IndexOutOfRange` for an index outside `[-rows, rows)`.
pub fn row_select_op(graph: &Graph, a: &Tensor, indices: &[isize]) -> Result<Tensor, TensorGradError> {
    let (input_rows, cols) = a.dims2("row_select")?;
    let rows = resolve_indices(indices, input_rows)?;

    let guard = a.read_data();
    let mut data = Vec::with_capacity(rows.len() * cols);
    for &r in &rows {
        data.extend_from_slice(&guard.data[r * cols..(r + 1) * cols]);
    }
    drop(guard);

    let output = Tensor::new(data, vec![rows.len(), cols])?;
    graph.record(&output, &[a], || RowSelectBackward {
        input_rows,
        cols,
        rows,
    });
    Ok(output)
}

#[cfg(test)]
#[path = "row_select_test.rs"]
mod tests;
