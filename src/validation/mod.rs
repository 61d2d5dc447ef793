// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for the dense kernels.
//!
//! Every check here runs before any numeric work, so a failure never leaves
//! a half-computed result behind.

use crate::config::Limits;
use crate::error::DataError;

/// Subsystem selection passed to a partial trace.
///
/// Only a flat list of positions is meaningful. The nested form exists so
/// callers that build selections from two-dimensional input get a
/// validation error instead of a silently flattened selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// One-dimensional list of subsystem positions
    Flat(Vec<usize>),
    /// Two-dimensional input, always rejected
    Nested(Vec<Vec<usize>>),
}

impl From<usize> for Selection {
    fn from(index: usize) -> Self {
        Selection::Flat(vec![index])
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Selection::Flat(indices)
    }
}

impl From<&[usize]> for Selection {
    fn from(indices: &[usize]) -> Self {
        Selection::Flat(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Selection {
    fn from(indices: [usize; N]) -> Self {
        Selection::Flat(indices.to_vec())
    }
}

impl From<Vec<Vec<usize>>> for Selection {
    fn from(groups: Vec<Vec<usize>>) -> Self {
        Selection::Nested(groups)
    }
}

/// Require a square shape.
pub fn validate_square(shape: (usize, usize), message: &str) -> Result<(), DataError> {
    if shape.0 != shape.1 {
        return Err(DataError::Shape(message.to_string()));
    }
    Ok(())
}

/// Require a positive `(rows, cols)` shape whose element count is
/// addressable, and return that count.
pub fn validate_shape(shape: (usize, usize)) -> Result<usize, DataError> {
    if shape.0 == 0 || shape.1 == 0 {
        return Err(DataError::Shape(format!(
            "shape must be a pair of positive integers, but is {:?}",
            shape
        )));
    }
    shape
        .0
        .checked_mul(shape.1)
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or_else(|| DataError::Shape(format!("shape {:?} has too many elements", shape)))
}

/// Check that `dims` factors a space of dimension `n`.
pub fn validate_dims(dims: &[usize], n: usize) -> Result<(), DataError> {
    if dims.is_empty() {
        return Err(DataError::Shape(
            "dimension vector must not be empty".into(),
        ));
    }
    if let Some(pos) = dims.iter().position(|&d| d == 0) {
        return Err(DataError::Shape(format!(
            "subsystem {} has dimension 0; dimensions must be positive",
            pos
        )));
    }
    let product = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| DataError::Shape("product of dimensions overflows".into()))?;
    if product != n {
        return Err(DataError::Shape(format!(
            "dimensions {:?} describe a space of size {}, but the matrix is {} x {}",
            dims, product, n, n
        )));
    }
    Ok(())
}

/// Normalize a selection against `num_subsystems` subsystems.
///
/// Returns the selection sorted ascending. Each sorted position is range
/// checked before it is compared with its predecessor, so an out-of-range
/// repeat reports the range error.
pub fn prepare_selection(
    selection: &Selection,
    num_subsystems: usize,
) -> Result<Vec<usize>, DataError> {
    let mut sel = match selection {
        Selection::Flat(indices) => indices.clone(),
        Selection::Nested(_) => {
            return Err(DataError::Validation(
                "selection must be one-dimensional".into(),
            ))
        }
    };
    sel.sort_unstable();

    for (i, &index) in sel.iter().enumerate() {
        if index >= num_subsystems {
            return Err(DataError::Index(
                "invalid selection index in partial trace".into(),
            ));
        }
        if i > 0 && sel[i - 1] == index {
            return Err(DataError::Validation(
                "duplicate selection index in partial trace".into(),
            ));
        }
    }
    Ok(sel)
}

/// Reject matrices larger than the configured limit.
pub fn validate_dimension_limit(shape: (usize, usize), limits: &Limits) -> Result<(), DataError> {
    let largest = shape.0.max(shape.1);
    if largest > limits.max_dimension {
        return Err(DataError::ResourceLimit {
            resource: "matrix dimension".into(),
            limit: limits.max_dimension as u64,
            requested: largest as u64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_selection_sorts() {
        let sel = prepare_selection(&Selection::from(vec![2, 0, 1]), 3).unwrap();
        assert_eq!(sel, vec![0, 1, 2]);
    }

    #[test]
    fn test_prepare_selection_scalar() {
        let sel = prepare_selection(&Selection::from(1), 2).unwrap();
        assert_eq!(sel, vec![1]);
    }

    #[test]
    fn test_prepare_selection_empty_is_allowed() {
        let sel = prepare_selection(&Selection::Flat(vec![]), 2).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_prepare_selection_out_of_range() {
        let err = prepare_selection(&Selection::from([5]), 2).unwrap_err();
        assert_eq!(
            err,
            DataError::Index("invalid selection index in partial trace".into())
        );
    }

    #[test]
    fn test_prepare_selection_duplicate() {
        let err = prepare_selection(&Selection::from([0, 0]), 2).unwrap_err();
        assert_eq!(
            err,
            DataError::Validation("duplicate selection index in partial trace".into())
        );
    }

    #[test]
    fn test_prepare_selection_out_of_range_repeat_reports_range() {
        let err = prepare_selection(&Selection::from([5, 5]), 2).unwrap_err();
        assert!(matches!(err, DataError::Index(_)));
    }

    #[test]
    fn test_prepare_selection_nested_rejected() {
        let err = prepare_selection(&Selection::from(vec![vec![0], vec![1]]), 2).unwrap_err();
        assert_eq!(
            err,
            DataError::Validation("selection must be one-dimensional".into())
        );
    }

    #[test]
    fn test_validate_dims() {
        assert!(validate_dims(&[2, 3], 6).is_ok());
        assert!(validate_dims(&[2, 2, 2], 8).is_ok());
        assert!(matches!(validate_dims(&[], 1), Err(DataError::Shape(_))));
        assert!(matches!(validate_dims(&[2, 0], 0), Err(DataError::Shape(_))));
        assert!(matches!(validate_dims(&[2, 3], 4), Err(DataError::Shape(_))));
    }

    #[test]
    fn test_validate_dims_overflow() {
        let err = validate_dims(&[usize::MAX, 2], 4).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_validate_square_and_shape() {
        assert!(validate_square((3, 3), "x").is_ok());
        assert_eq!(
            validate_square((2, 3), "not square").unwrap_err(),
            DataError::Shape("not square".into())
        );
        assert_eq!(validate_shape((2, 3)), Ok(6));
        assert!(validate_shape((0, 4)).is_err());
    }

    #[test]
    fn test_validate_shape_overflow() {
        let err = validate_shape((usize::MAX / 2 + 1, 2)).unwrap_err();
        assert!(matches!(err, DataError::Shape(_)));
        assert!(err.to_string().contains("too many elements"));
        assert!(validate_shape((isize::MAX as usize, 2)).is_err());
    }

    #[test]
    fn test_validate_dimension_limit() {
        let limits = Limits { max_dimension: 8 };
        assert!(validate_dimension_limit((8, 8), &limits).is_ok());
        let err = validate_dimension_limit((16, 1), &limits).unwrap_err();
        assert_eq!(
            err,
            DataError::ResourceLimit {
                resource: "matrix dimension".into(),
                limit: 8,
                requested: 16,
            }
        );
    }
}
