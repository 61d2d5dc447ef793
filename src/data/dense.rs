// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host dense matrix.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use super::{kernels, ptrace, Data, DenseOps};
use crate::dispatch::LayerId;
use crate::error::DataError;
use crate::validation::{validate_shape, Selection};

/// Host-resident complex128 matrix, the native type of the data layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    array: Array2<Complex64>,
}

impl Dense {
    /// Build from a flat row-major buffer and an explicit shape.
    pub fn from_shape(data: Vec<Complex64>, shape: (usize, usize)) -> Result<Self, DataError> {
        if validate_shape(shape)? != data.len() {
            return Err(DataError::Shape(format!(
                "invalid shape {:?} for input data with size {}",
                shape,
                data.len()
            )));
        }
        Ok(Self {
            array: Array2::from_shape_vec(shape, data)?,
        })
    }

    /// Build a column vector from a flat buffer.
    pub fn from_flat(data: Vec<Complex64>) -> Result<Self, DataError> {
        let len = data.len();
        Self::from_shape(data, (len, 1))
    }

    /// Wrap an existing array without copying.
    pub fn from_array(array: Array2<Complex64>) -> Result<Self, DataError> {
        validate_shape(array.dim())?;
        Ok(Self { array })
    }

    pub fn zeros(shape: (usize, usize)) -> Result<Self, DataError> {
        validate_shape(shape)?;
        Ok(Self {
            array: Array2::zeros(shape),
        })
    }

    pub fn identity(n: usize) -> Result<Self, DataError> {
        validate_shape((n, n))?;
        Ok(Self {
            array: Array2::eye(n),
        })
    }

    pub fn nrows(&self) -> usize {
        self.array.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.array.ncols()
    }

    pub fn as_array(&self) -> ArrayView2<'_, Complex64> {
        self.array.view()
    }

    pub fn into_array(self) -> Array2<Complex64> {
        self.array
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        self.array.get((row, col)).copied()
    }

    // Kernel results are never empty, so they skip the shape check.
    pub(crate) fn wrap(array: Array2<Complex64>) -> Self {
        Self { array }
    }
}

impl Data for Dense {
    fn shape(&self) -> (usize, usize) {
        self.array.dim()
    }

    fn layer(&self) -> LayerId {
        LayerId::Dense
    }
}

impl DenseOps for Dense {
    type Elem = Complex64;

    fn conj(&self) -> Self {
        Self::wrap(kernels::conj(self.as_array()))
    }

    fn transpose(&self) -> Self {
        Self::wrap(kernels::transpose(self.as_array()))
    }

    fn adjoint(&self) -> Self {
        Self::wrap(kernels::adjoint(self.as_array()))
    }

    fn trace(&self) -> Result<Complex64, DataError> {
        kernels::trace(self.as_array())
    }

    fn matmul(&self, other: &Self) -> Result<Self, DataError> {
        kernels::matmul(self.as_array(), other.as_array()).map(Self::wrap)
    }

    fn reshape(&self, rows: usize, cols: usize) -> Result<Self, DataError> {
        kernels::reshape(self.as_array(), rows, cols).map(Self::wrap)
    }

    fn partial_trace(&self, dims: &[usize], selection: &Selection) -> Result<Self, DataError> {
        ptrace::partial_trace(self.as_array(), dims, selection).map(Self::wrap)
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}
