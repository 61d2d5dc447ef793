// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Element types a device matrix can hold.

use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, Neg};
use std::str::FromStr;

use ndarray::LinalgScalar;
use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

/// Storage precision of a dense matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    /// Double precision complex (two f64)
    #[default]
    Complex128,
    /// Single precision complex (two f32)
    Complex64,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dtype::Complex128 => write!(f, "complex128"),
            Dtype::Complex64 => write!(f, "complex64"),
        }
    }
}

impl FromStr for Dtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complex128" | "c128" => Ok(Dtype::Complex128),
            "complex64" | "c64" => Ok(Dtype::Complex64),
            other => Err(format!("unknown dtype '{other}'")),
        }
    }
}

/// Complex element type of a device matrix.
///
/// Every kernel is generic over this trait so a matrix keeps its precision
/// through all operations. Conversion to and from [`Complex64`] is only used
/// at the host boundary.
pub trait Scalar:
    LinalgScalar
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
    + DivAssign
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
{
    /// Precision tag for this element type.
    const DTYPE: Dtype;

    /// Complex conjugate.
    fn conj(self) -> Self;

    /// Widen to double precision.
    fn to_complex64(self) -> Complex64;

    /// Narrow (or copy) from double precision.
    fn from_complex64(z: Complex64) -> Self;
}

impl Scalar for Complex64 {
    const DTYPE: Dtype = Dtype::Complex128;

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn to_complex64(self) -> Complex64 {
        self
    }

    #[inline]
    fn from_complex64(z: Complex64) -> Self {
        z
    }
}

impl Scalar for Complex32 {
    const DTYPE: Dtype = Dtype::Complex64;

    #[inline]
    fn conj(self) -> Self {
        Complex32::conj(&self)
    }

    #[inline]
    fn to_complex64(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }

    #[inline]
    fn from_complex64(z: Complex64) -> Self {
        Complex32::new(z.re as f32, z.im as f32)
    }
}
