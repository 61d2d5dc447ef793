// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense matrix storage and kernels.
//!
//! Two storage types are provided:
//!
//! - [`Dense`]: the host's native complex128 matrix
//! - [`DeviceDense`]: a matrix bound to an accelerator device, generic over
//!   its element precision
//!
//! Both expose the same operations through [`DenseOps`], which is what the
//! dispatch layer is written against.

pub mod convert;
pub mod dense;
pub mod device;
pub mod json;
pub mod kernels;
pub mod ops;
pub mod ptrace;
pub mod scalar;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dispatch::LayerId;
use crate::error::DataError;
use crate::validation::Selection;

pub use convert::{to_device, to_host};
pub use dense::Dense;
pub use device::DeviceDense;
pub use json::MatrixJson;
pub use ptrace::partial_trace;
pub use scalar::{Dtype, Scalar};

/// Identifier of the accelerator a [`DeviceDense`] is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device:{}", self.0)
    }
}

/// Shape and layer identity shared by every registered matrix type.
pub trait Data {
    /// `(rows, cols)`.
    fn shape(&self) -> (usize, usize);

    /// Layer this matrix type belongs to.
    fn layer(&self) -> LayerId;
}

/// Operations every registered matrix type provides.
///
/// All methods return new, independently owned matrices.
pub trait DenseOps: Data + Clone + Send + Sync + 'static {
    /// Element type.
    type Elem: Scalar;

    fn conj(&self) -> Self;
    fn transpose(&self) -> Self;
    fn adjoint(&self) -> Self;
    fn trace(&self) -> Result<Self::Elem, DataError>;
    fn matmul(&self, other: &Self) -> Result<Self, DataError>;
    fn reshape(&self, rows: usize, cols: usize) -> Result<Self, DataError>;
    fn partial_trace(&self, dims: &[usize], selection: &Selection) -> Result<Self, DataError>;
    fn copy(&self) -> Self;
}
