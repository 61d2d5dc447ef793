// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layer registry for typed dispatch.
//!
//! The registry maps each [`LayerId`] to the [`DataLayer`] that implements
//! it, keeps a table of alias names and a table of conversions between
//! layers. Generic entry points pick the layer from the operand's concrete
//! type, so no caller ever has to name the implementation.

use std::collections::HashMap;
use std::sync::Arc;

use num_complex::{Complex32, Complex64};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::layers::{DenseLayer, DeviceComplex128Layer, DeviceComplex64Layer};
use super::{DataLayer, LayerId, Matrix};
use crate::config::{Config, Limits, DEVICE_ALIAS};
use crate::data::{convert, DeviceId};
use crate::error::{DispatchError, Error, Result};
use crate::validation::{validate_dimension_limit, Selection};

/// Converts a matrix into another layer. The device argument is used when
/// the target lives on a device and the source does not.
pub type ConversionFn = fn(&Matrix, DeviceId) -> Result<Matrix>;

/// Alias that always follows the configured device precision.
pub const PRECISION_ALIAS: &str = "device";

/// Registry of data layers.
///
/// The registry is thread-safe and can be shared behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use qubit_os_dense::config::Config;
/// use qubit_os_dense::data::Dense;
/// use qubit_os_dense::dispatch::{LayerRegistry, Matrix};
/// use qubit_os_dense::validation::Selection;
///
/// let registry = LayerRegistry::with_builtin_layers(&Config::default())?;
/// let target = registry.resolve("cupyd")?;
/// let rho = registry.convert(&Matrix::Dense(Dense::identity(4)?), target)?;
/// let reduced = registry.partial_trace(&rho, &[2, 2], &Selection::from(0))?;
/// ```
pub struct LayerRegistry {
    /// Registered layers
    layers: RwLock<HashMap<LayerId, Arc<dyn DataLayer>>>,

    /// Alias name to layer
    aliases: RwLock<HashMap<String, LayerId>>,

    /// Conversions keyed by (from, to)
    conversions: RwLock<HashMap<(LayerId, LayerId), ConversionFn>>,

    /// Default layer
    default_layer: RwLock<Option<LayerId>>,

    /// Device host data is uploaded to
    device: DeviceId,

    /// Size limits
    limits: Limits,
}

impl LayerRegistry {
    /// Create an empty registry.
    pub fn new(device: DeviceId, limits: Limits) -> Self {
        Self {
            layers: RwLock::new(HashMap::new()),
            aliases: RwLock::new(HashMap::new()),
            conversions: RwLock::new(HashMap::new()),
            default_layer: RwLock::new(None),
            device,
            limits,
        }
    }

    /// Create a registry holding the built-in layers, their conversions and
    /// aliases, configured from `config`.
    pub fn with_builtin_layers(config: &Config) -> Result<Self> {
        config.validate()?;

        let registry = Self::new(config.device.device_id(), config.limits.clone());
        registry.register(Arc::new(DenseLayer::new()));
        registry.register(Arc::new(DeviceComplex128Layer::new()));
        registry.register(Arc::new(DeviceComplex64Layer::new()));

        registry.add_conversion(LayerId::Dense, LayerId::DeviceComplex128, dense_to_device128);
        registry.add_conversion(LayerId::Dense, LayerId::DeviceComplex64, dense_to_device64);
        registry.add_conversion(LayerId::DeviceComplex128, LayerId::Dense, device128_to_dense);
        registry.add_conversion(LayerId::DeviceComplex64, LayerId::Dense, device64_to_dense);
        registry.add_conversion(
            LayerId::DeviceComplex128,
            LayerId::DeviceComplex64,
            device128_to_device64,
        );
        registry.add_conversion(
            LayerId::DeviceComplex64,
            LayerId::DeviceComplex128,
            device64_to_device128,
        );

        registry.register_alias(DEVICE_ALIAS, LayerId::DeviceComplex128)?;
        registry.register_alias(PRECISION_ALIAS, LayerId::device(config.device.precision))?;
        for (alias, layer) in &config.dispatch.aliases {
            registry.register_alias(alias, *layer)?;
        }

        registry.set_default(config.dispatch.default_layer)?;
        Ok(registry)
    }

    /// Register a layer.
    ///
    /// If a layer with the same id already exists, it will be replaced.
    pub fn register(&self, layer: Arc<dyn DataLayer>) {
        let id = layer.id();
        info!(layer = %id, "Registering data layer");

        let mut layers = self.layers.write();
        if layers.insert(id, layer).is_some() {
            warn!(layer = %id, "Replaced existing data layer");
        }

        let mut default = self.default_layer.write();
        if default.is_none() {
            debug!(layer = %id, "Setting as default layer");
            *default = Some(id);
        }
    }

    /// Unregister a layer.
    ///
    /// Aliases and conversions that mention the layer are kept; they fail
    /// with `NotFound` until the layer is registered again.
    pub fn unregister(&self, id: LayerId) -> Option<Arc<dyn DataLayer>> {
        let mut layers = self.layers.write();
        let removed = layers.remove(&id);

        if removed.is_some() {
            warn!(layer = %id, "Unregistered data layer");

            let mut default = self.default_layer.write();
            if *default == Some(id) {
                warn!(layer = %id, "Unregistered default layer");
                *default = None;
            }
        }

        removed
    }

    /// Get a layer by id.
    pub fn get(&self, id: LayerId) -> Result<Arc<dyn DataLayer>> {
        let layers = self.layers.read();
        layers
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Dispatch(DispatchError::NotFound(id.to_string())))
    }

    /// Register `alias` as another name for `layer`.
    ///
    /// The alias may not reuse the canonical name of a different layer.
    pub fn register_alias(&self, alias: &str, layer: LayerId) -> Result<()> {
        if alias.is_empty() {
            return Err(Error::Config("alias names cannot be empty".into()));
        }
        if let Ok(named) = alias.parse::<LayerId>() {
            if named != layer {
                return Err(Error::Config(format!(
                    "alias '{}' shadows layer {}",
                    alias, named
                )));
            }
        }
        info!(alias = %alias, layer = %layer, "Registering layer alias");
        self.aliases.write().insert(alias.to_string(), layer);
        Ok(())
    }

    /// Resolve a layer name or alias to a registered layer.
    pub fn resolve(&self, name: &str) -> Result<LayerId> {
        let id = match name.parse::<LayerId>() {
            Ok(id) => id,
            Err(_) => self
                .aliases
                .read()
                .get(name)
                .copied()
                .ok_or_else(|| Error::Dispatch(DispatchError::NotFound(name.to_string())))?,
        };
        if !self.contains(id) {
            return Err(Error::Dispatch(DispatchError::NotFound(name.to_string())));
        }
        Ok(id)
    }

    /// Resolve `name`, or return the default layer if `name` is None.
    pub fn resolve_or_default(&self, name: Option<&str>) -> Result<LayerId> {
        match name {
            Some(n) => self.resolve(n),
            None => self.default_layer().ok_or_else(|| {
                Error::Dispatch(DispatchError::NotFound(
                    "No default layer configured".to_string(),
                ))
            }),
        }
    }

    /// Set the default layer.
    pub fn set_default(&self, id: LayerId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::Dispatch(DispatchError::NotFound(id.to_string())));
        }
        *self.default_layer.write() = Some(id);
        info!(layer = %id, "Set as default layer");
        Ok(())
    }

    /// Get the default layer.
    pub fn default_layer(&self) -> Option<LayerId> {
        *self.default_layer.read()
    }

    /// Register a conversion from one layer to another, replacing any
    /// previous one.
    pub fn add_conversion(&self, from: LayerId, to: LayerId, conversion: ConversionFn) {
        debug!(from = %from, to = %to, "Registering conversion");
        self.conversions.write().insert((from, to), conversion);
    }

    /// Convert `m` into layer `to`, uploading to the registry's device.
    ///
    /// Converting into the matrix's own layer returns a copy.
    pub fn convert(&self, m: &Matrix, to: LayerId) -> Result<Matrix> {
        self.convert_on(m, to, self.device)
    }

    /// Convert `m` into layer `to`, uploading host data to `device`.
    pub fn convert_on(&self, m: &Matrix, to: LayerId, device: DeviceId) -> Result<Matrix> {
        let from = m.layer();
        if !self.contains(to) {
            return Err(Error::Dispatch(DispatchError::NotFound(to.to_string())));
        }
        if from == to {
            return Ok(m.clone());
        }
        let conversion = self
            .conversions
            .read()
            .get(&(from, to))
            .copied()
            .ok_or(DispatchError::NoConversion { from, to })?;
        debug!(from = %from, to = %to, %device, "Converting matrix");
        conversion(m, device)
    }

    /// List all registered layers, in id order.
    pub fn list(&self) -> Vec<LayerId> {
        let mut ids: Vec<LayerId> = self.layers.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// List all aliases with their layers, sorted by alias.
    pub fn list_aliases(&self) -> Vec<(String, LayerId)> {
        let mut aliases: Vec<(String, LayerId)> = self
            .aliases
            .read()
            .iter()
            .map(|(alias, id)| (alias.clone(), *id))
            .collect();
        aliases.sort();
        aliases
    }

    /// Check if a layer is registered.
    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.read().contains_key(&id)
    }

    /// Get the number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the size limits.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Get the upload device.
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Layer owning `m`, after the size check.
    fn layer_for(&self, m: &Matrix, op: &str) -> Result<Arc<dyn DataLayer>> {
        validate_dimension_limit(m.shape(), &self.limits)?;
        let layer = self.get(m.layer())?;
        debug!(op, layer = %layer.id(), shape = ?m.shape(), "Dispatching");
        Ok(layer)
    }

    pub fn adjoint(&self, m: &Matrix) -> Result<Matrix> {
        self.layer_for(m, "adjoint")?.adjoint(m)
    }

    pub fn conj(&self, m: &Matrix) -> Result<Matrix> {
        self.layer_for(m, "conj")?.conj(m)
    }

    pub fn transpose(&self, m: &Matrix) -> Result<Matrix> {
        self.layer_for(m, "transpose")?.transpose(m)
    }

    /// Trace, widened to complex128 whatever the layer's precision.
    pub fn trace(&self, m: &Matrix) -> Result<Complex64> {
        self.layer_for(m, "trace")?.trace(m)
    }

    pub fn partial_trace(&self, m: &Matrix, dims: &[usize], selection: &Selection) -> Result<Matrix> {
        self.layer_for(m, "partial_trace")?
            .partial_trace(m, dims, selection)
    }

    /// Matrix product in the layer of `a`.
    ///
    /// When `b` belongs to another layer it is converted first. Host data is
    /// uploaded to the device `a` is bound to, but a precision cast keeps
    /// `b` on its own device, so device operands bound to two different
    /// devices fail with `DeviceMismatch`. Nothing moves between devices
    /// implicitly.
    pub fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let layer = self.layer_for(a, "matmul")?;
        validate_dimension_limit(b.shape(), &self.limits)?;
        if a.layer() == b.layer() {
            return layer.matmul(a, b);
        }
        let device = device_of(a).unwrap_or(self.device);
        let b = self.convert_on(b, a.layer(), device)?;
        layer.matmul(a, &b)
    }

    pub fn reshape(&self, m: &Matrix, rows: usize, cols: usize) -> Result<Matrix> {
        validate_dimension_limit((rows, cols), &self.limits)?;
        self.layer_for(m, "reshape")?.reshape(m, rows, cols)
    }

    pub fn copy(&self, m: &Matrix) -> Result<Matrix> {
        self.layer_for(m, "copy")?.copy(m)
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new(DeviceId::default(), Limits::default())
    }
}

fn device_of(m: &Matrix) -> Option<DeviceId> {
    match m {
        Matrix::Dense(_) => None,
        Matrix::DeviceComplex128(d) => Some(d.device()),
        Matrix::DeviceComplex64(d) => Some(d.device()),
    }
}

fn wrong_layer(expected: LayerId, m: &Matrix) -> Error {
    Error::Dispatch(DispatchError::WrongLayer {
        expected,
        actual: m.layer(),
    })
}

fn dense_to_device128(m: &Matrix, device: DeviceId) -> Result<Matrix> {
    match m {
        Matrix::Dense(d) => Ok(convert::to_device::<Complex64>(d, device).into()),
        other => Err(wrong_layer(LayerId::Dense, other)),
    }
}

fn dense_to_device64(m: &Matrix, device: DeviceId) -> Result<Matrix> {
    match m {
        Matrix::Dense(d) => Ok(convert::to_device::<Complex32>(d, device).into()),
        other => Err(wrong_layer(LayerId::Dense, other)),
    }
}

fn device128_to_dense(m: &Matrix, _device: DeviceId) -> Result<Matrix> {
    match m {
        Matrix::DeviceComplex128(d) => Ok(convert::to_host(d).into()),
        other => Err(wrong_layer(LayerId::DeviceComplex128, other)),
    }
}

fn device64_to_dense(m: &Matrix, _device: DeviceId) -> Result<Matrix> {
    match m {
        Matrix::DeviceComplex64(d) => Ok(convert::to_host(d).into()),
        other => Err(wrong_layer(LayerId::DeviceComplex64, other)),
    }
}

// Casts between precisions stay on the source device.
fn device128_to_device64(m: &Matrix, _device: DeviceId) -> Result<Matrix> {
    match m {
        Matrix::DeviceComplex128(d) => Ok(convert::cast::<Complex64, Complex32>(d).into()),
        other => Err(wrong_layer(LayerId::DeviceComplex128, other)),
    }
}

fn device64_to_device128(m: &Matrix, _device: DeviceId) -> Result<Matrix> {
    match m {
        Matrix::DeviceComplex64(d) => Ok(convert::cast::<Complex32, Complex64>(d).into()),
        other => Err(wrong_layer(LayerId::DeviceComplex64, other)),
    }
}
