// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Data layer trait definition.

use std::fmt;
use std::str::FromStr;

use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

use crate::data::{Data, Dense, DeviceDense, Dtype};
use crate::error::Result;
use crate::validation::Selection;

/// Identity of a registered matrix type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    /// Host complex128 matrix
    Dense,
    /// Device matrix, complex128 storage
    DeviceComplex128,
    /// Device matrix, complex64 storage
    DeviceComplex64,
}

impl LayerId {
    /// All built-in layers.
    pub const ALL: [LayerId; 3] = [
        LayerId::Dense,
        LayerId::DeviceComplex128,
        LayerId::DeviceComplex64,
    ];

    /// Device layer holding elements of `dtype`.
    pub fn device(dtype: Dtype) -> Self {
        match dtype {
            Dtype::Complex128 => LayerId::DeviceComplex128,
            Dtype::Complex64 => LayerId::DeviceComplex64,
        }
    }

    /// Canonical layer name.
    pub fn name(&self) -> &'static str {
        match self {
            LayerId::Dense => "dense",
            LayerId::DeviceComplex128 => "device_complex128",
            LayerId::DeviceComplex64 => "device_complex64",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LayerId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("unknown layer '{s}'"))
    }
}

/// A matrix of any registered type.
///
/// Generic entry points take a `Matrix` and route it to the layer of its
/// concrete type.
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    Dense(Dense),
    DeviceComplex128(DeviceDense<Complex64>),
    DeviceComplex64(DeviceDense<Complex32>),
}

impl Matrix {
    /// Layer of the concrete type.
    pub fn layer(&self) -> LayerId {
        match self {
            Matrix::Dense(_) => LayerId::Dense,
            Matrix::DeviceComplex128(_) => LayerId::DeviceComplex128,
            Matrix::DeviceComplex64(_) => LayerId::DeviceComplex64,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => m.shape(),
            Matrix::DeviceComplex128(m) => m.shape(),
            Matrix::DeviceComplex64(m) => m.shape(),
        }
    }
}

impl From<Dense> for Matrix {
    fn from(m: Dense) -> Self {
        Matrix::Dense(m)
    }
}

impl From<DeviceDense<Complex64>> for Matrix {
    fn from(m: DeviceDense<Complex64>) -> Self {
        Matrix::DeviceComplex128(m)
    }
}

impl From<DeviceDense<Complex32>> for Matrix {
    fn from(m: DeviceDense<Complex32>) -> Self {
        Matrix::DeviceComplex64(m)
    }
}

/// Ties a concrete matrix type to its [`Matrix`] variant.
pub trait LayerMember: crate::data::DenseOps + Into<Matrix> {
    /// Layer this type is registered under.
    const LAYER: LayerId;

    /// Borrow the concrete matrix if `m` holds this type.
    fn from_matrix(m: &Matrix) -> Option<&Self>;
}

impl LayerMember for Dense {
    const LAYER: LayerId = LayerId::Dense;

    fn from_matrix(m: &Matrix) -> Option<&Self> {
        match m {
            Matrix::Dense(d) => Some(d),
            _ => None,
        }
    }
}

impl LayerMember for DeviceDense<Complex64> {
    const LAYER: LayerId = LayerId::DeviceComplex128;

    fn from_matrix(m: &Matrix) -> Option<&Self> {
        match m {
            Matrix::DeviceComplex128(d) => Some(d),
            _ => None,
        }
    }
}

impl LayerMember for DeviceDense<Complex32> {
    const LAYER: LayerId = LayerId::DeviceComplex64;

    fn from_matrix(m: &Matrix) -> Option<&Self> {
        match m {
            Matrix::DeviceComplex64(d) => Some(d),
            _ => None,
        }
    }
}

/// The trait every data layer implements.
///
/// A layer only accepts matrices of its own type; anything else is a
/// `DispatchError::WrongLayer`.
pub trait DataLayer: Send + Sync {
    /// Layer identity.
    fn id(&self) -> LayerId;

    /// Layer name.
    fn name(&self) -> &str {
        self.id().name()
    }

    fn adjoint(&self, m: &Matrix) -> Result<Matrix>;

    fn conj(&self, m: &Matrix) -> Result<Matrix>;

    fn transpose(&self, m: &Matrix) -> Result<Matrix>;

    /// Trace, widened to complex128.
    fn trace(&self, m: &Matrix) -> Result<Complex64>;

    fn partial_trace(&self, m: &Matrix, dims: &[usize], selection: &Selection) -> Result<Matrix>;

    fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;

    fn reshape(&self, m: &Matrix, rows: usize, cols: usize) -> Result<Matrix>;

    fn copy(&self, m: &Matrix) -> Result<Matrix>;
}
