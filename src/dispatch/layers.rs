// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Built-in data layers.

use std::marker::PhantomData;

use num_complex::{Complex32, Complex64};

use super::{DataLayer, LayerId, LayerMember, Matrix};
use crate::data::{Dense, DeviceDense, Scalar};
use crate::error::{DispatchError, Result};
use crate::validation::Selection;

/// Data layer backed by one concrete matrix type.
pub struct NativeLayer<S> {
    _marker: PhantomData<fn() -> S>,
}

/// Host complex128 layer.
pub type DenseLayer = NativeLayer<Dense>;

/// Device layer with complex128 storage.
pub type DeviceComplex128Layer = NativeLayer<DeviceDense<Complex64>>;

/// Device layer with complex64 storage.
pub type DeviceComplex64Layer = NativeLayer<DeviceDense<Complex32>>;

impl<S: LayerMember> NativeLayer<S> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn member<'a>(&self, m: &'a Matrix) -> Result<&'a S> {
        S::from_matrix(m).ok_or_else(|| {
            DispatchError::WrongLayer {
                expected: S::LAYER,
                actual: m.layer(),
            }
            .into()
        })
    }
}

impl<S: LayerMember> Default for NativeLayer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LayerMember> DataLayer for NativeLayer<S> {
    fn id(&self) -> LayerId {
        S::LAYER
    }

    fn adjoint(&self, m: &Matrix) -> Result<Matrix> {
        Ok(self.member(m)?.adjoint().into())
    }

    fn conj(&self, m: &Matrix) -> Result<Matrix> {
        Ok(self.member(m)?.conj().into())
    }

    fn transpose(&self, m: &Matrix) -> Result<Matrix> {
        Ok(self.member(m)?.transpose().into())
    }

    fn trace(&self, m: &Matrix) -> Result<Complex64> {
        Ok(self.member(m)?.trace()?.to_complex64())
    }

    fn partial_trace(&self, m: &Matrix, dims: &[usize], selection: &Selection) -> Result<Matrix> {
        Ok(self.member(m)?.partial_trace(dims, selection)?.into())
    }

    fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let a = self.member(a)?;
        let b = self.member(b)?;
        Ok(a.matmul(b)?.into())
    }

    fn reshape(&self, m: &Matrix, rows: usize, cols: usize) -> Result<Matrix> {
        Ok(self.member(m)?.reshape(rows, cols)?.into())
    }

    fn copy(&self, m: &Matrix) -> Result<Matrix> {
        Ok(self.member(m)?.copy().into())
    }
}
