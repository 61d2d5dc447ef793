// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed dispatch over the registered matrix types.
//!
//! Each concrete matrix type is a *layer* identified by a [`LayerId`]. A
//! [`LayerRegistry`] holds one [`DataLayer`] per id plus the conversions
//! between them, and routes a generic operation on a [`Matrix`] to the
//! layer of its concrete type.

pub mod layers;
pub mod registry;
mod r#trait;

pub use layers::{DenseLayer, DeviceComplex128Layer, DeviceComplex64Layer, NativeLayer};
pub use r#trait::{DataLayer, LayerId, LayerMember, Matrix};
pub use registry::{ConversionFn, LayerRegistry, PRECISION_ALIAS};
