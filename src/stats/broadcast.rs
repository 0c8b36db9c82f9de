/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! NumPy-style broadcasting of evaluation arrays
//!
//! Shapes are aligned on their trailing axes; each axis pair must either be
//! equal or contain a `1`, which is stretched to the other length.

use super::errors::{Result, StatsError};
use ndarray::{ArrayViewD, IxDyn};

/// Compute the common broadcast shape of a set of array shapes
///
/// # Arguments
///
/// * `shapes` - The shapes to combine
///
/// # Returns
///
/// The broadcast shape, or `ShapeMismatch` if any axis pair is incompatible
pub fn broadcast_shape(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let ndim = shapes.iter().map(|shape| shape.len()).max().unwrap_or(0);
    let mut out = vec![1usize; ndim];

    for shape in shapes {
        let offset = ndim - shape.len();
        for (axis, &len) in shape.iter().enumerate() {
            let target = &mut out[offset + axis];
            if *target == len || len == 1 {
                continue;
            }
            if *target == 1 {
                *target = len;
                continue;
            }
            return Err(StatsError::ShapeMismatch {
                shapes: shapes.iter().map(|s| s.to_vec()).collect(),
            });
        }
    }

    Ok(out)
}

/// Stretch a view to `shape` and flatten it in row-major order
pub fn broadcast_flat(view: &ArrayViewD<'_, f64>, shape: &[usize]) -> Result<Vec<f64>> {
    let stretched = view
        .broadcast(IxDyn(shape))
        .ok_or_else(|| StatsError::ShapeMismatch {
            shapes: vec![view.shape().to_vec(), shape.to_vec()],
        })?;
    Ok(stretched.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, aview0};

    #[test]
    fn test_scalar_against_vector() {
        assert_eq!(broadcast_shape(&[&[], &[3]]).unwrap(), vec![3]);
        assert_eq!(broadcast_shape(&[&[3], &[], &[3]]).unwrap(), vec![3]);
    }

    #[test]
    fn test_trailing_axis_alignment() {
        assert_eq!(broadcast_shape(&[&[2, 1], &[4]]).unwrap(), vec![2, 4]);
        assert_eq!(broadcast_shape(&[&[5, 1, 3], &[2, 1]]).unwrap(), vec![5, 2, 3]);
    }

    #[test]
    fn test_zero_length_axis() {
        assert_eq!(broadcast_shape(&[&[0], &[]]).unwrap(), vec![0]);
        assert_eq!(broadcast_shape(&[&[0], &[1]]).unwrap(), vec![0]);
        assert!(broadcast_shape(&[&[0], &[3]]).is_err());
    }

    #[test]
    fn test_mismatch_reports_shapes() {
        let err = broadcast_shape(&[&[3], &[4]]).unwrap_err();
        assert_eq!(
            err,
            StatsError::ShapeMismatch {
                shapes: vec![vec![3], vec![4]]
            }
        );
    }

    #[test]
    fn test_broadcast_flat_row_major() {
        let column = arr2(&[[1.0], [2.0]]).into_dyn();
        let flat = broadcast_flat(&column.view(), &[2, 3]).unwrap();
        assert_eq!(flat, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);

        let row = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        let flat = broadcast_flat(&row.view(), &[2, 3]).unwrap();
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

        let scalar = aview0(&7.0).into_dyn();
        assert_eq!(broadcast_flat(&scalar, &[2]).unwrap(), vec![7.0, 7.0]);
    }
}
