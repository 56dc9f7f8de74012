//! The sub-client registry.
//!
//! [`ClientRegistry`] is an explicit map from string keys to sub-client
//! constructor functions. It exists for two reasons: the typed accessors on
//! [`Client`](crate::Client) need a place to memoize instances, and
//! request-scoped sub-clients must be constructible fresh so per-request
//! configuration is never accidentally shared.
//!
//! - [`get`](ClientRegistry::get) memoizes one instance per key
//! - [`make`](ClientRegistry::make) always constructs a fresh instance,
//!   bypassing the cache
//! - [`has`](ClientRegistry::has) reports whether a key is registered
//!
//! Factories capture whatever shared resources they need (transport,
//! credentials, configuration) when the top-level `Client` registers them;
//! produced instances are type-erased and recovered by downcast.
//!
//! The instance cache takes a plain `Mutex`: first accesses from separate
//! tasks may race to construct, in which case one instance wins the cache.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors raised by registry lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No factory is registered under the requested key.
    #[error("No API client registered under '{name}'.")]
    UnknownClient {
        /// The key that missed.
        name: String,
    },

    /// The registered instance is not of the requested type.
    #[error("API client '{name}' is not of the requested type.")]
    TypeMismatch {
        /// The key whose instance mismatched.
        name: String,
    },
}

type Factory = Box<dyn Fn() -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// String-keyed registry of sub-client factories.
#[derive(Default)]
pub struct ClientRegistry {
    factories: HashMap<&'static str, Factory>,
    instances: Mutex<HashMap<&'static str, Arc<dyn Any + Send + Sync>>>,
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&&str> = self.factories.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ClientRegistry")
            .field("factories", &keys)
            .finish_non_exhaustive()
    }
}

// Verify ClientRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientRegistry>();
};

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a key, replacing any previous entry.
    pub fn register<T, F>(&mut self, name: &'static str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factories
            .insert(name, Box::new(move || Arc::new(factory())));
        // A stale cached instance must not outlive its factory.
        if let Ok(mut instances) = self.instances.lock() {
            instances.remove(name);
        }
    }

    /// Returns `true` if a factory is registered under the key.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the memoized instance for a key, constructing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownClient`] for unregistered keys and
    /// [`RegistryError::TypeMismatch`] when `T` is not the registered type.
    ///
    /// # Panics
    ///
    /// Panics if the instance cache mutex was poisoned by a panicking
    /// factory on another thread.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        let (key, factory) =
            self.factories
                .get_key_value(name)
                .ok_or_else(|| RegistryError::UnknownClient {
                    name: name.to_string(),
                })?;

        let mut instances = self.instances.lock().expect("registry cache poisoned");
        let erased = instances.entry(*key).or_insert_with(|| factory()).clone();
        drop(instances);

        erased
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
            })
    }

    /// Constructs a fresh instance, bypassing the cache.
    ///
    /// Use this for request-scoped sub-clients that mutate per-request
    /// configuration; a fresh instance is never shared with other callers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownClient`] for unregistered keys and
    /// [`RegistryError::TypeMismatch`] when `T` is not the registered type.
    pub fn make<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownClient {
                name: name.to_string(),
            })?;

        factory()
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
            })
    }
}
