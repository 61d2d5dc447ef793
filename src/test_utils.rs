// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for data layer tests.

use ndarray::Array2;
use num_complex::Complex64;

/// Shorthand for a double precision complex number.
pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Deterministic dense Hermitian matrix with distinct entries.
pub fn hermitian_fixture(n: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((n, n), |(j, k)| {
        if j == k {
            c(((j * 5) % 7) as f64 + 1.0, 0.0)
        } else {
            let (lo, hi) = if j < k { (j, k) } else { (k, j) };
            let re = ((lo * 7 + hi * 3) % 11) as f64 / 5.0 - 1.0;
            let im = ((lo + 2 * hi) % 5) as f64 / 4.0 + 0.1;
            if j < k {
                c(re, im)
            } else {
                c(re, -im)
            }
        }
    })
}

/// Digits of `flat` in the mixed radix `dims` (subsystem 0 most significant).
fn digits(mut flat: usize, dims: &[usize]) -> Vec<usize> {
    let mut out = vec![0; dims.len()];
    for (pos, &d) in dims.iter().enumerate().rev() {
        out[pos] = flat % d;
        flat /= d;
    }
    out
}

fn flatten(digits: &[usize], dims: &[usize]) -> usize {
    digits.iter().zip(dims).fold(0, |acc, (&x, &d)| acc * d + x)
}

/// Partial trace by explicit summation over matching traced indices.
pub fn naive_partial_trace(
    m: &Array2<Complex64>,
    dims: &[usize],
    sel: &[usize],
) -> Array2<Complex64> {
    let mut sel = sel.to_vec();
    sel.sort_unstable();
    let keep_dims: Vec<usize> = sel.iter().map(|&i| dims[i]).collect();
    let d_keep: usize = keep_dims.iter().product();
    let n = m.nrows();

    let mut out = Array2::zeros((d_keep, d_keep));
    for row in 0..n {
        for col in 0..n {
            let rd = digits(row, dims);
            let cd = digits(col, dims);
            let traced_match = (0..dims.len())
                .filter(|i| !sel.contains(i))
                .all(|i| rd[i] == cd[i]);
            if !traced_match {
                continue;
            }
            let r: Vec<usize> = sel.iter().map(|&i| rd[i]).collect();
            let cc: Vec<usize> = sel.iter().map(|&i| cd[i]).collect();
            out[[flatten(&r, &keep_dims), flatten(&cc, &keep_dims)]] += m[[row, col]];
        }
    }
    out
}

/// Assert two matrices agree element-wise within `tol`.
pub fn assert_matrix_close(actual: &Array2<Complex64>, expected: &Array2<Complex64>, tol: f64) {
    assert_eq!(actual.dim(), expected.dim(), "shape mismatch");
    for ((idx, a), e) in actual.indexed_iter().zip(expected.iter()) {
        assert!(
            (a - e).norm() <= tol,
            "element {:?} differs: {} vs {}",
            idx,
            a,
            e
        );
    }
}
