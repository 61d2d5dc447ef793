// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON representation of a host matrix.
//!
//! ```json
//! { "shape": [2, 2], "data": [[1.0, 0.0], [0.0, 0.0], [0.0, 0.0], [1.0, 0.0]] }
//! ```
//!
//! `data` is row-major, one `[re, im]` pair per element.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::{Data, Dense};
use crate::error::DataError;

/// Serialized matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixJson {
    /// `[rows, cols]`
    pub shape: [usize; 2],
    /// Row-major `[re, im]` pairs
    pub data: Vec<[f64; 2]>,
}

impl MatrixJson {
    pub fn from_dense(dense: &Dense) -> Self {
        let (rows, cols) = dense.shape();
        Self {
            shape: [rows, cols],
            data: dense.as_array().iter().map(|z| [z.re, z.im]).collect(),
        }
    }

    /// Validate and build the host matrix.
    pub fn into_dense(self) -> Result<Dense, DataError> {
        let values = self
            .data
            .into_iter()
            .map(|[re, im]| Complex64::new(re, im))
            .collect();
        Dense::from_shape(values, (self.shape[0], self.shape[1]))
    }
}
