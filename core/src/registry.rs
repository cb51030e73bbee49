//! Registry for host-supplied string-to-value converters.
//!
//! Custom value types ([`ValueType::Custom`](crate::ValueType::Custom)) are
//! converted through a [`ConverterRegistry`] injected into the engine.
//! Registration is expected at process start; a single mutex serializes
//! concurrent registration and the registry is safe to share across parses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::value::Value;

/// A registered from-string construction capability.
pub type Converter = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// Maps custom type names to converter functions.
///
/// Registration is idempotent: registering a name that already exists is
/// accepted and keeps the first converter. [`reset`](Self::reset) clears all
/// registrations.
///
/// # Examples
///
/// ```
/// use argot_core::{ConverterRegistry, Value};
///
/// let registry = ConverterRegistry::new();
/// let fresh = registry.register("port", |raw| {
///     raw.parse::<u16>()
///         .map(|p| Value::Custom { type_name: "port".into(), repr: p.to_string() })
///         .map_err(|e| e.to_string())
/// });
/// assert!(fresh);
///
/// // Idempotent: a second registration under the same name is a no-op.
/// assert!(!registry.register("port", |_| Err("unused".into())));
/// assert!(registry.convert("port", "8080").unwrap().is_ok());
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Mutex<HashMap<String, Arc<Converter>>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter under `name`. Returns `false` (and keeps the
    /// existing converter) when the name was already registered.
    pub fn register<F>(&self, name: &str, converter: F) -> bool
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        let mut guard = self.lock();
        if guard.contains_key(name) {
            return false;
        }
        guard.insert(name.to_string(), Arc::new(converter));
        true
    }

    /// Looks up and applies the converter for `name`, if registered.
    pub fn convert(&self, name: &str, raw: &str) -> Option<Result<Value, String>> {
        let converter = self.lock().get(name).cloned();
        converter.map(|c| c(raw))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Removes every registration.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Converter>>> {
        match self.converters.lock() {
            Ok(guard) => guard,
            // A panicking converter leaves the map intact; keep serving it.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.lock().keys().cloned().collect();
        f.debug_struct("ConverterRegistry")
            .field("registered", &names)
            .finish()
    }
}
