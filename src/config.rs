// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the dense data layer.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (QUBITOS_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use crate::data::{DeviceId, Dtype};
use crate::dispatch::LayerId;
use crate::error::{Error, Result};

/// Alias registered for the complex128 device layer regardless of
/// configuration.
pub const DEVICE_ALIAS: &str = "cupyd";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Device settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Layer dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Size limits
    #[serde(default)]
    pub limits: Limits,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["config.yaml", "config.yml", "/etc/qubitos/dense.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("QUBITOS_DENSE_DEVICE") {
            if let Ok(id) = val.parse() {
                self.device.default_id = id;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DENSE_PRECISION") {
            if let Ok(dtype) = val.parse() {
                self.device.precision = dtype;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DENSE_DEFAULT_LAYER") {
            if let Ok(layer) = val.parse() {
                self.dispatch.default_layer = layer;
            }
        }
        if let Ok(val) = env::var("QUBITOS_DENSE_MAX_DIMENSION") {
            if let Ok(max) = val.parse() {
                self.limits.max_dimension = max;
            }
        }
        if let Ok(val) = env::var("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QUBITOS_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_dimension == 0 {
            return Err(Error::Config("max_dimension cannot be 0".into()));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "unknown log format '{}', expected json or pretty",
                self.logging.format
            )));
        }
        for (alias, target) in &self.dispatch.aliases {
            if alias.trim().is_empty() {
                return Err(Error::Config("alias names cannot be empty".into()));
            }
            if let Ok(named) = alias.parse::<LayerId>() {
                if named != *target {
                    return Err(Error::Config(format!(
                        "alias '{}' shadows layer {} but points to {}",
                        alias, named, target
                    )));
                }
            }
            if alias == DEVICE_ALIAS && *target != LayerId::DeviceComplex128 {
                return Err(Error::Config(format!(
                    "alias '{}' is reserved for {}",
                    DEVICE_ALIAS,
                    LayerId::DeviceComplex128
                )));
            }
        }
        Ok(())
    }
}

/// Device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device new matrices are bound to
    #[serde(default)]
    pub default_id: u32,

    /// Element precision used when uploading host data
    #[serde(default)]
    pub precision: Dtype,
}

impl DeviceConfig {
    pub fn device_id(&self) -> DeviceId {
        DeviceId(self.default_id)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            default_id: 0,
            precision: Dtype::Complex128,
        }
    }
}

/// Layer dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Layer used when a caller names none
    #[serde(default = "default_layer")]
    pub default_layer: LayerId,

    /// Extra alias names, on top of the built-in `cupyd`
    #[serde(default)]
    pub aliases: BTreeMap<String, LayerId>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_layer: default_layer(),
            aliases: BTreeMap::new(),
        }
    }
}

fn default_layer() -> LayerId {
    LayerId::DeviceComplex128
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Size limits applied before any numeric work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Largest accepted row or column count
    #[serde(default = "default_max_dimension")]
    pub max_dimension: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
        }
    }
}

fn default_max_dimension() -> usize {
    4096
}
