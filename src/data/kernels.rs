// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Precision-generic dense kernels.
//!
//! These operate on `ndarray` views and always return freshly allocated,
//! row-major arrays. The input is never mutated.

use ndarray::{Array2, ArrayView2};

use super::scalar::Scalar;
use crate::error::DataError;
use crate::validation::{validate_shape, validate_square};

/// Element-wise complex conjugate.
pub fn conj<T: Scalar>(a: ArrayView2<'_, T>) -> Array2<T> {
    a.mapv(Scalar::conj)
}

/// Transpose into a new row-major array.
pub fn transpose<T: Scalar>(a: ArrayView2<'_, T>) -> Array2<T> {
    a.t().as_standard_layout().into_owned()
}

/// Conjugate transpose (dagger).
pub fn adjoint<T: Scalar>(a: ArrayView2<'_, T>) -> Array2<T> {
    transpose(a).mapv_into(Scalar::conj)
}

/// Sum of the diagonal.
pub fn trace<T: Scalar>(a: ArrayView2<'_, T>) -> Result<T, DataError> {
    validate_square(
        a.dim(),
        &format!("matrix shape {:?} is not square", a.dim()),
    )?;
    Ok(a.diag().iter().fold(T::zero(), |acc, &z| acc + z))
}

/// Matrix product `a · b`.
pub fn matmul<T: Scalar>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<Array2<T>, DataError> {
    if a.ncols() != b.nrows() {
        return Err(DataError::Shape(format!(
            "incompatible shapes for matmul: {:?} and {:?}",
            a.dim(),
            b.dim()
        )));
    }
    Ok(a.dot(&b))
}

/// Row-major reinterpretation under a new shape.
pub fn reshape<T: Scalar>(
    a: ArrayView2<'_, T>,
    rows: usize,
    cols: usize,
) -> Result<Array2<T>, DataError> {
    if validate_shape((rows, cols))? != a.len() {
        return Err(DataError::Shape(format!(
            "cannot reshape {:?} into ({}, {})",
            a.dim(),
            rows,
            cols
        )));
    }
    let flat: Vec<T> = a.iter().copied().collect();
    Ok(Array2::from_shape_vec((rows, cols), flat)?)
}

/// Multiply every element by `factor`.
pub fn scale<T: Scalar>(a: ArrayView2<'_, T>, factor: T) -> Array2<T> {
    a.mapv(|z| z * factor)
}

/// Divide every element by `divisor`.
pub fn div_scalar<T: Scalar>(a: ArrayView2<'_, T>, divisor: T) -> Array2<T> {
    a.mapv(|z| z / divisor)
}

/// Element-wise sum.
pub fn add<T: Scalar>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<Array2<T>, DataError> {
    check_same_shape(a.dim(), b.dim(), "add")?;
    let mut out = a.to_owned();
    out.zip_mut_with(&b, |x, &y| *x += y);
    Ok(out)
}

/// Element-wise difference.
pub fn sub<T: Scalar>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<Array2<T>, DataError> {
    check_same_shape(a.dim(), b.dim(), "subtract")?;
    let mut out = a.to_owned();
    out.zip_mut_with(&b, |x, &y| *x = *x - y);
    Ok(out)
}

/// Element-wise negation.
pub fn neg<T: Scalar>(a: ArrayView2<'_, T>) -> Array2<T> {
    a.mapv(|z| -z)
}

fn check_same_shape(
    left: (usize, usize),
    right: (usize, usize),
    op: &str,
) -> Result<(), DataError> {
    if left != right {
        return Err(DataError::Shape(format!(
            "cannot {} matrices of shape {:?} and {:?}",
            op, left, right
        )));
    }
    Ok(())
}
