// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Device-bound dense matrix.
//!
//! A [`DeviceDense`] carries the [`DeviceId`] it lives on. Every kernel runs
//! where its input already is and returns a result bound to the same device;
//! binary kernels refuse operands from two different devices instead of
//! moving data.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use super::{kernels, ptrace, Data, DenseOps, DeviceId, Dtype, Scalar};
use crate::config::DeviceConfig;
use crate::dispatch::LayerId;
use crate::error::DataError;
use crate::validation::{validate_shape, Selection};

/// Dense matrix stored on an accelerator device.
///
/// `T` fixes the precision: `Complex64` for complex128 storage, `Complex32`
/// for complex64 storage.
///
/// # Example
///
/// ```ignore
/// use num_complex::Complex64;
/// use qubit_os_dense::data::{DeviceDense, DeviceId};
///
/// let ket = DeviceDense::from_flat(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)])?
///     .on_device(DeviceId(1));
/// assert_eq!(ket.shape(), (2, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDense<T: Scalar> {
    array: Array2<T>,
    device: DeviceId,
}

impl<T: Scalar> DeviceDense<T> {
    /// Build from a flat row-major buffer and an explicit shape.
    ///
    /// Fails if either dimension is zero or `rows * cols != data.len()`.
    pub fn from_shape(data: Vec<T>, shape: (usize, usize)) -> Result<Self, DataError> {
        if validate_shape(shape)? != data.len() {
            return Err(DataError::Shape(format!(
                "invalid shape {:?} for input data with size {}",
                shape,
                data.len()
            )));
        }
        Ok(Self::wrap(Array2::from_shape_vec(shape, data)?, DeviceId::default()))
    }

    /// Build from a flat buffer.
    ///
    /// A flat sequence always becomes a column vector (ket) of shape
    /// `(len, 1)`. Use [`from_shape`](Self::from_shape) for anything else.
    pub fn from_flat(data: Vec<T>) -> Result<Self, DataError> {
        let len = data.len();
        Self::from_shape(data, (len, 1))
    }

    /// Wrap an existing array without copying it.
    pub fn from_array(array: Array2<T>) -> Result<Self, DataError> {
        validate_shape(array.dim())?;
        Ok(Self::wrap(array, DeviceId::default()))
    }

    pub fn zeros(shape: (usize, usize)) -> Result<Self, DataError> {
        validate_shape(shape)?;
        Ok(Self::wrap(Array2::zeros(shape), DeviceId::default()))
    }

    pub fn identity(n: usize) -> Result<Self, DataError> {
        validate_shape((n, n))?;
        Ok(Self::wrap(Array2::eye(n), DeviceId::default()))
    }

    /// Bind to `device`.
    pub fn on_device(mut self, device: DeviceId) -> Self {
        self.device = device;
        self
    }

    /// Bind to the configured default device (`device.default_id`).
    ///
    /// Constructors bind to device 0 since they take no configuration.
    pub fn on_configured_device(self, config: &DeviceConfig) -> Self {
        self.on_device(config.device_id())
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn dtype(&self) -> Dtype {
        T::DTYPE
    }

    pub fn nrows(&self) -> usize {
        self.array.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.array.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.array.get((row, col)).copied()
    }

    /// Borrow the device buffer.
    pub fn as_array(&self) -> ArrayView2<'_, T> {
        self.array.view()
    }

    /// Copy the values back to the host as complex128.
    pub fn to_array(&self) -> Array2<Complex64> {
        self.array.mapv(Scalar::to_complex64)
    }

    pub fn into_array(self) -> Array2<T> {
        self.array
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        self.same_device(kernels::scale(self.as_array(), factor))
    }

    /// Divide every element by `divisor`.
    pub fn div_scalar(&self, divisor: T) -> Self {
        self.same_device(kernels::div_scalar(self.as_array(), divisor))
    }

    /// Drop elements below `tol`. Device storage is kept as is.
    pub fn tidyup(self, _tol: f64) -> Self {
        self
    }

    pub(crate) fn wrap(array: Array2<T>, device: DeviceId) -> Self {
        Self { array, device }
    }

    pub(crate) fn same_device(&self, array: Array2<T>) -> Self {
        Self::wrap(array, self.device)
    }

    pub(crate) fn check_device(&self, other: &Self) -> Result<(), DataError> {
        if self.device != other.device {
            return Err(DataError::DeviceMismatch {
                left: self.device.0,
                right: other.device.0,
            });
        }
        Ok(())
    }

    pub(crate) fn array_mut(&mut self) -> &mut Array2<T> {
        &mut self.array
    }
}

impl<T: Scalar> Data for DeviceDense<T> {
    fn shape(&self) -> (usize, usize) {
        self.array.dim()
    }

    fn layer(&self) -> LayerId {
        LayerId::device(T::DTYPE)
    }
}

impl<T: Scalar> DenseOps for DeviceDense<T> {
    type Elem = T;

    fn conj(&self) -> Self {
        self.same_device(kernels::conj(self.as_array()))
    }

    fn transpose(&self) -> Self {
        self.same_device(kernels::transpose(self.as_array()))
    }

    fn adjoint(&self) -> Self {
        self.same_device(kernels::adjoint(self.as_array()))
    }

    fn trace(&self) -> Result<T, DataError> {
        kernels::trace(self.as_array())
    }

    fn matmul(&self, other: &Self) -> Result<Self, DataError> {
        self.check_device(other)?;
        kernels::matmul(self.as_array(), other.as_array()).map(|a| self.same_device(a))
    }

    fn reshape(&self, rows: usize, cols: usize) -> Result<Self, DataError> {
        kernels::reshape(self.as_array(), rows, cols).map(|a| self.same_device(a))
    }

    fn partial_trace(&self, dims: &[usize], selection: &Selection) -> Result<Self, DataError> {
        ptrace::partial_trace(self.as_array(), dims, selection).map(|a| self.same_device(a))
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}
