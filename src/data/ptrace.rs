// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Partial trace over a tensor-product index space.
//!
//! A `D × D` operator with `D = Π dims[i]` is viewed as a rank-`2n` tensor of
//! shape `dims ++ dims` (subsystem 0 is the most significant digit of the
//! flat index). Axes are regrouped as
//!
//! ```text
//! [traced rows, traced cols, kept rows, kept cols]
//! ```
//!
//! reshaped to `(Dtrace, Dtrace, Dkeep, Dkeep)`, and the first two axes are
//! contracted along their diagonal.
//!
//! Subsystems are identified by position only; repeated dimension values in
//! `dims` never alias.

use ndarray::{s, Array2, Array4, ArrayD, ArrayView2, IxDyn};
use tracing::debug;

use super::scalar::Scalar;
use crate::error::DataError;
use crate::validation::{prepare_selection, validate_dims, validate_square, Selection};

/// Reduce `matrix` to the subsystems listed in `selection`.
///
/// Returns an independent copy when every subsystem is kept, and the `1 × 1`
/// full trace when the selection is empty. The result has the same
/// precision as the input.
pub fn partial_trace<T: Scalar>(
    matrix: ArrayView2<'_, T>,
    dims: &[usize],
    selection: &Selection,
) -> Result<Array2<T>, DataError> {
    validate_square(
        matrix.dim(),
        "partial trace is only defined for square matrices",
    )?;
    validate_dims(dims, matrix.nrows())?;
    let sel = prepare_selection(selection, dims.len())?;

    if sel.len() == dims.len() {
        return Ok(matrix.to_owned());
    }

    let n = dims.len();
    let complement: Vec<usize> = (0..n).filter(|i| sel.binary_search(i).is_err()).collect();
    let d_trace: usize = complement.iter().map(|&i| dims[i]).product();
    let d_keep: usize = sel.iter().map(|&i| dims[i]).product();
    debug!(?dims, ?sel, d_trace, d_keep, "Partial trace");

    let tensor_shape: Vec<usize> = dims.iter().chain(dims.iter()).copied().collect();
    let flat: Vec<T> = matrix.iter().copied().collect();
    let tensor = ArrayD::from_shape_vec(IxDyn(&tensor_shape), flat)?;

    let axes: Vec<usize> = complement
        .iter()
        .copied()
        .chain(complement.iter().map(|&q| n + q))
        .chain(sel.iter().copied())
        .chain(sel.iter().map(|&q| n + q))
        .collect();
    let permuted = tensor.permuted_axes(IxDyn(&axes));

    // iter() walks the permuted view in logical order, which is exactly the
    // row-major layout of the regrouped tensor.
    let regrouped: Vec<T> = permuted.iter().copied().collect();
    let blocks = Array4::from_shape_vec((d_trace, d_trace, d_keep, d_keep), regrouped)?;

    let mut reduced = Array2::<T>::zeros((d_keep, d_keep));
    for k in 0..d_trace {
        reduced.zip_mut_with(&blocks.slice(s![k, k, .., ..]), |acc, &z| *acc += z);
    }
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::kernels::trace;
    use crate::test_utils::{assert_matrix_close, c, hermitian_fixture, kron, naive_partial_trace};
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_complex::{Complex32, Complex64};

    #[test]
    fn test_identity_tensor_identity_keeps_doubled_identity() {
        let id4 = Array2::<Complex64>::eye(4);
        let reduced = partial_trace(id4.view(), &[2, 2], &Selection::from([0])).unwrap();
        assert_eq!(reduced, array![[c(2.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(2.0, 0.0)]]);
    }

    #[test]
    fn test_full_selection_is_independent_copy() {
        let m = hermitian_fixture(6);
        let reduced = partial_trace(m.view(), &[2, 3], &Selection::from([1, 0])).unwrap();
        assert_eq!(reduced, m);
        assert_ne!(reduced.as_ptr(), m.as_ptr());
    }

    #[test]
    fn test_empty_selection_gives_full_trace() {
        let m = hermitian_fixture(6);
        let reduced = partial_trace(m.view(), &[3, 2], &Selection::Flat(vec![])).unwrap();
        assert_eq!(reduced.dim(), (1, 1));
        let full = trace(m.view()).unwrap();
        assert_relative_eq!(reduced[[0, 0]].re, full.re, epsilon = 1e-12);
        assert_relative_eq!(reduced[[0, 0]].im, full.im, epsilon = 1e-12);
    }

    #[test]
    fn test_product_operator_factors() {
        // Tr_B(A ⊗ B) = Tr(B)·A and Tr_A(A ⊗ B) = Tr(A)·B
        let a = array![[c(1.0, 0.0), c(0.0, 2.0)], [c(0.0, -2.0), c(3.0, 0.0)]];
        let b = array![
            [c(2.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)],
            [c(1.0, -1.0), c(0.5, 0.0), c(0.0, 3.0)],
            [c(0.0, 0.0), c(0.0, -3.0), c(1.5, 0.0)]
        ];
        let ab = kron(&a, &b);

        let keep_a = partial_trace(ab.view(), &[2, 3], &Selection::from([0])).unwrap();
        let tr_b = trace(b.view()).unwrap();
        assert_matrix_close(&keep_a, &a.mapv(|z| z * tr_b), 1e-12);

        let keep_b = partial_trace(ab.view(), &[2, 3], &Selection::from([1])).unwrap();
        let tr_a = trace(a.view()).unwrap();
        assert_matrix_close(&keep_b, &b.mapv(|z| z * tr_a), 1e-12);
    }

    #[test]
    fn test_three_subsystems_against_naive_sum() {
        let dims = [2, 3, 2];
        let m = hermitian_fixture(12);
        for sel in [vec![0], vec![1], vec![2], vec![0, 2], vec![1, 2], vec![0, 1]] {
            let fast = partial_trace(m.view(), &dims, &Selection::from(sel.clone())).unwrap();
            let slow = naive_partial_trace(&m, &dims, &sel);
            assert_matrix_close(&fast, &slow, 1e-12);
        }
    }

    #[test]
    fn test_trace_is_preserved() {
        let dims = [2, 2, 3];
        let m = hermitian_fixture(12);
        let total = trace(m.view()).unwrap();
        for sel in [vec![], vec![0], vec![2], vec![0, 1], vec![1, 2]] {
            let reduced = partial_trace(m.view(), &dims, &Selection::from(sel)).unwrap();
            let t = trace(reduced.view()).unwrap();
            assert_relative_eq!(t.re, total.re, epsilon = 1e-10);
            assert_relative_eq!(t.im, total.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_selection_order_does_not_matter() {
        let m = hermitian_fixture(12);
        let dims = [3, 2, 2];
        let forward = partial_trace(m.view(), &dims, &Selection::from([0, 2])).unwrap();
        let backward = partial_trace(m.view(), &dims, &Selection::from([2, 0])).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_output_shape() {
        let m = hermitian_fixture(24);
        let dims = [2, 3, 4];
        assert_eq!(partial_trace(m.view(), &dims, &Selection::from([0, 2])).unwrap().dim(), (8, 8));
        assert_eq!(partial_trace(m.view(), &dims, &Selection::from([1])).unwrap().dim(), (3, 3));
    }

    #[test]
    fn test_repeated_dimension_values_do_not_alias() {
        // dims [2, 2]: keeping subsystem 1 must differ from keeping subsystem 0
        let a = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]];
        let b = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]];
        let ab = kron(&a, &b);
        let keep_0 = partial_trace(ab.view(), &[2, 2], &Selection::from([0])).unwrap();
        let keep_1 = partial_trace(ab.view(), &[2, 2], &Selection::from([1])).unwrap();
        assert_matrix_close(&keep_0, &Array2::zeros((2, 2)), 1e-15);
        assert_matrix_close(&keep_1, &b, 1e-15);
    }

    #[test]
    fn test_single_precision_is_preserved() {
        let id4 = Array2::<Complex32>::eye(4);
        let reduced: Array2<Complex32> =
            partial_trace(id4.view(), &[2, 2], &Selection::from([1])).unwrap();
        assert_eq!(reduced[[0, 0]], Complex32::new(2.0, 0.0));
        assert_eq!(reduced[[0, 1]], Complex32::new(0.0, 0.0));
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Array2::<Complex64>::zeros((2, 3));
        let err = partial_trace(m.view(), &[2], &Selection::from([0])).unwrap_err();
        assert_eq!(
            err,
            DataError::Shape("partial trace is only defined for square matrices".into())
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let m = Array2::<Complex64>::eye(4);
        let err = partial_trace(m.view(), &[2, 2], &Selection::from([0, 0])).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let m = Array2::<Complex64>::eye(4);
        let err = partial_trace(m.view(), &[2, 2], &Selection::from([5])).unwrap_err();
        assert!(matches!(err, DataError::Index(_)));
    }

    #[test]
    fn test_nested_selection_rejected() {
        let m = Array2::<Complex64>::eye(4);
        let err = partial_trace(m.view(), &[2, 2], &Selection::from(vec![vec![0], vec![1]]))
            .unwrap_err();
        assert_eq!(
            err,
            DataError::Validation("selection must be one-dimensional".into())
        );
    }

    #[test]
    fn test_dims_must_factor_matrix() {
        let m = Array2::<Complex64>::eye(4);
        assert!(matches!(
            partial_trace(m.view(), &[2, 3], &Selection::from([0])),
            Err(DataError::Shape(_))
        ));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let m = hermitian_fixture(4);
        let before = m.clone();
        let _ = partial_trace(m.view(), &[2, 2], &Selection::from([1])).unwrap();
        assert_eq!(m, before);
    }
}
