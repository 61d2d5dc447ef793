// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the dense data layer.

use std::fmt;

use crate::dispatch::LayerId;

/// Result type alias for data layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Matrix data error (shape, validation, index)
    Data(DataError),
    /// Dispatch error
    Dispatch(DispatchError),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Data(e) => write!(f, "Data error: {}", e),
            Error::Dispatch(e) => write!(f, "Dispatch error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Data(e) => Some(e),
            Error::Dispatch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<DataError> for Error {
    fn from(e: DataError) -> Self {
        Error::Data(e)
    }
}

impl From<DispatchError> for Error {
    fn from(e: DispatchError) -> Self {
        Error::Dispatch(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Errors raised by matrix construction and the numeric kernels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Matrix is not square, or a shape is inconsistent with the buffer
    Shape(String),
    /// Input failed a structural check (nested or duplicate selection)
    Validation(String),
    /// Index outside the valid range
    Index(String),
    /// Operands are bound to different devices
    DeviceMismatch { left: u32, right: u32 },
    /// Size limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Shape(msg) => write!(f, "Shape error: {}", msg),
            DataError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DataError::Index(msg) => write!(f, "Index error: {}", msg),
            DataError::DeviceMismatch { left, right } => {
                write!(
                    f,
                    "Device mismatch: operands live on device {} and device {}",
                    left, right
                )
            }
            DataError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for DataError {}

impl From<ndarray::ShapeError> for DataError {
    fn from(e: ndarray::ShapeError) -> Self {
        DataError::Shape(e.to_string())
    }
}

/// Errors raised by the layer registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No layer registered under this name or alias
    NotFound(String),
    /// A layer was handed a matrix it does not own
    WrongLayer { expected: LayerId, actual: LayerId },
    /// No conversion registered between two layers
    NoConversion { from: LayerId, to: LayerId },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotFound(name) => write!(f, "Layer not found: {}", name),
            DispatchError::WrongLayer { expected, actual } => {
                write!(f, "Wrong layer: expected {}, got {}", expected, actual)
            }
            DispatchError::NoConversion { from, to } => {
                write!(f, "No conversion registered from {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for DispatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // =========================================================================
    // Display
    // =========================================================================

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("unknown alias target".into());
        assert_eq!(e.to_string(), "Configuration error: unknown alias target");
    }

    #[test]
    fn test_error_display_data() {
        let e = Error::Data(DataError::Shape(
            "partial trace is only defined for square matrices".into(),
        ));
        assert_eq!(
            e.to_string(),
            "Data error: Shape error: partial trace is only defined for square matrices"
        );
    }

    #[test]
    fn test_error_display_dispatch() {
        let e = Error::Dispatch(DispatchError::NotFound("gpu".into()));
        assert_eq!(e.to_string(), "Dispatch error: Layer not found: gpu");
    }

    #[test]
    fn test_data_error_display_index() {
        let e = DataError::Index("invalid selection index in partial trace".into());
        assert_eq!(
            e.to_string(),
            "Index error: invalid selection index in partial trace"
        );
    }

    #[test]
    fn test_data_error_display_device_mismatch() {
        let e = DataError::DeviceMismatch { left: 0, right: 1 };
        assert_eq!(
            e.to_string(),
            "Device mismatch: operands live on device 0 and device 1"
        );
    }

    #[test]
    fn test_data_error_display_resource_limit() {
        let e = DataError::ResourceLimit {
            resource: "matrix dimension".into(),
            limit: 4096,
            requested: 8192,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for matrix dimension: limit=4096, requested=8192"
        );
    }

    #[test]
    fn test_dispatch_error_display_wrong_layer() {
        let e = DispatchError::WrongLayer {
            expected: LayerId::Dense,
            actual: LayerId::DeviceComplex128,
        };
        assert_eq!(
            e.to_string(),
            "Wrong layer: expected dense, got device_complex128"
        );
    }

    #[test]
    fn test_dispatch_error_display_no_conversion() {
        let e = DispatchError::NoConversion {
            from: LayerId::DeviceComplex64,
            to: LayerId::Dense,
        };
        assert_eq!(
            e.to_string(),
            "No conversion registered from device_complex64 to dense"
        );
    }

    // =========================================================================
    // source() and From
    // =========================================================================

    #[test]
    fn test_error_source() {
        assert!(Error::Data(DataError::Index("x".into())).source().is_some());
        assert!(Error::Dispatch(DispatchError::NotFound("x".into()))
            .source()
            .is_some());
        assert!(Error::Io(std::io::Error::other("disk")).source().is_some());
        assert!(Error::Config("x".into()).source().is_none());
        assert!(Error::Serialization("x".into()).source().is_none());
    }

    #[test]
    fn test_from_ndarray_shape_error() {
        let err = ndarray::Array2::<f64>::from_shape_vec((2, 2), vec![1.0]).unwrap_err();
        let e: DataError = err.into();
        assert!(matches!(e, DataError::Shape(_)));
    }

    #[test]
    fn test_from_serde_errors() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_data_and_dispatch_errors() {
        let e: Error = DataError::Validation("x".into()).into();
        assert!(matches!(e, Error::Data(DataError::Validation(_))));

        let e: Error = DispatchError::NotFound("x".into()).into();
        assert!(matches!(e, Error::Dispatch(DispatchError::NotFound(_))));
    }
}
