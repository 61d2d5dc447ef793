// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conversions between host and device matrices.

use super::{Dense, DeviceDense, DeviceId, Scalar};

/// Upload a host matrix to `device` with precision `T`.
///
/// Converting to `Complex32` rounds each component to single precision.
pub fn to_device<T: Scalar>(dense: &Dense, device: DeviceId) -> DeviceDense<T> {
    DeviceDense::wrap(dense.as_array().mapv(T::from_complex64), device)
}

/// Download a device matrix to the host. The result is always complex128.
pub fn to_host<T: Scalar>(matrix: &DeviceDense<T>) -> Dense {
    // A DeviceDense is never empty, so neither is its host copy.
    Dense::wrap(matrix.to_array())
}

/// Change the precision of a device matrix without leaving its device.
pub fn cast<T: Scalar, U: Scalar>(matrix: &DeviceDense<T>) -> DeviceDense<U> {
    DeviceDense::wrap(
        matrix.as_array().mapv(|z| U::from_complex64(z.to_complex64())),
        matrix.device(),
    )
}
