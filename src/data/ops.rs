// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Arithmetic operators for [`DeviceDense`].
//!
//! Scalar operators cannot fail. Matrix `+` and `-` can (shape or device
//! mismatch), so they are implemented on references with a `Result` output.

use std::ops::{Add, Div, DivAssign, Mul, MulAssign, Neg, Sub};

use super::{kernels, DeviceDense, Scalar};
use crate::error::DataError;

impl<T: Scalar> Mul<T> for DeviceDense<T> {
    type Output = DeviceDense<T>;

    fn mul(mut self, rhs: T) -> Self::Output {
        self *= rhs;
        self
    }
}

impl<T: Scalar> Mul<T> for &DeviceDense<T> {
    type Output = DeviceDense<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

impl<T: Scalar> Div<T> for DeviceDense<T> {
    type Output = DeviceDense<T>;

    fn div(mut self, rhs: T) -> Self::Output {
        self /= rhs;
        self
    }
}

impl<T: Scalar> Div<T> for &DeviceDense<T> {
    type Output = DeviceDense<T>;

    fn div(self, rhs: T) -> Self::Output {
        self.div_scalar(rhs)
    }
}

impl<T: Scalar> MulAssign<T> for DeviceDense<T> {
    fn mul_assign(&mut self, rhs: T) {
        self.array_mut().map_inplace(|z| *z *= rhs);
    }
}

impl<T: Scalar> DivAssign<T> for DeviceDense<T> {
    fn div_assign(&mut self, rhs: T) {
        self.array_mut().map_inplace(|z| *z /= rhs);
    }
}

impl<T: Scalar> Neg for DeviceDense<T> {
    type Output = DeviceDense<T>;

    fn neg(mut self) -> Self::Output {
        self.array_mut().map_inplace(|z| *z = -*z);
        self
    }
}

impl<T: Scalar> Neg for &DeviceDense<T> {
    type Output = DeviceDense<T>;

    fn neg(self) -> Self::Output {
        self.same_device(kernels::neg(self.as_array()))
    }
}

impl<T: Scalar> Add for &DeviceDense<T> {
    type Output = Result<DeviceDense<T>, DataError>;

    fn add(self, rhs: Self) -> Self::Output {
        self.check_device(rhs)?;
        kernels::add(self.as_array(), rhs.as_array()).map(|a| self.same_device(a))
    }
}

impl<T: Scalar> Sub for &DeviceDense<T> {
    type Output = Result<DeviceDense<T>, DataError>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.check_device(rhs)?;
        kernels::sub(self.as_array(), rhs.as_array()).map(|a| self.same_device(a))
    }
}
