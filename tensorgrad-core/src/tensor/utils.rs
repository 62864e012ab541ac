use std::cmp::max;

use crate::error::TensorGradError;

/// Calculates the row-major strides for a given shape.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// 1. The shorter shape is padded with leading 1s.
/// 2. Dimensions are compared from right to left.
/// 3. They are compatible if equal or if one of them is 1; the result takes
///    the other one.
///
/// # Errors
/// `ShapeMismatch` (with `shape_a` as expected and `shape_b` as actual) when a
/// pair of dimensions differs and neither is 1.
pub fn broadcast_shapes(
    shape_a: &[usize],
    shape_b: &[usize],
    operation: &str,
) -> Result<Vec<usize>, TensorGradError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = if i < rank_a { shape_a[rank_a - 1 - i] } else { 1 };
        let dim_b = if i < rank_b { shape_b[rank_b - 1 - i] } else { 1 };

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(TensorGradError::ShapeMismatch {
                expected: shape_a.to_vec(),
                actual: shape_b.to_vec(),
                operation: operation.to_string(),
            });
        };
    }
    Ok(result_shape)
}

/// Strides that read `shape` as if it were broadcast to `target_shape`:
/// stretched (size 1) and missing leading dimensions get stride 0.
///
/// The caller guarantees `shape` broadcasts to `target_shape`.
pub fn broadcast_strides(shape: &[usize], target_shape: &[usize]) -> Vec<usize> {
    let own = calculate_strides(shape);
    let rank_diff = target_shape.len() - shape.len();
    (0..target_shape.len())
        .map(|i| {
            if i < rank_diff || shape[i - rank_diff] == 1 {
                0
            } else {
                own[i - rank_diff]
            }
        })
        .collect()
}

/// Converts a linear row-major index into coordinates.
pub fn index_to_coord(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut rem = index;
    for d in (0..shape.len()).rev() {
        if shape[d] > 0 {
            coord[d] = rem % shape[d];
            rem /= shape[d];
        }
    }
    coord
}

/// Advances `coord` to the next row-major position within `shape`.
/// Returns false once it wraps past the last element.
pub(crate) fn increment_coord(coord: &mut [usize], shape: &[usize]) -> bool {
    let mut dim = shape.len();
    while dim > 0 {
        dim -= 1;
        coord[dim] += 1;
        if coord[dim] < shape[dim] {
            return true;
        }
        coord[dim] = 0;
    }
    false
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
