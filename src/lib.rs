// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Dense Data Layer
//!
//! This crate provides device-bound dense complex matrices for QubitOS,
//! the generalised partial trace, and a typed registry that routes generic
//! matrix operations to the implementation for each storage type.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Layer Registry              │
//! │   (aliases, conversions, dispatch)       │
//! ├──────────────┬──────────────────────────┤
//! │ Dense layer  │  Device layers           │
//! │ (host c128)  │  (c128 / c64 per device) │
//! ├──────────────┴──────────────────────────┤
//! │   Kernels + partial trace (ndarray)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`data`]: Matrix storage types, kernels and the partial trace
//! - [`dispatch`]: Data layer trait and registry
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
