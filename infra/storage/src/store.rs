//! The key-value contract and the process-local backends.

use crate::error::StorageError;
use crate::security::StorageKey;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::trace;

/// A durable string key-value store, the moral equivalent of browser local storage.
///
/// Implementations are synchronous: a write has completed (or failed) when `set`
/// returns, so callers can mirror state within the same event-loop turn.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Returns the stored value, or `Ok(None)` when the key was never written.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys and a backend-specific
    /// error when the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys and a backend-specific
    /// error when the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Process-local store. Cloning shares the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<FxHashMap<StorageKey, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = StorageKey::try_from(key)?;
        Ok(self.entries.read().get(&key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = StorageKey::try_from(key)?;
        trace!(key = %key, bytes = value.len(), "Memory entry replaced");
        self.entries.write().insert(key, value.to_owned());
        Ok(())
    }
}

/// A store that is never available, used when no backend could be opened.
///
/// Every call fails with [`StorageError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct DisabledStore {
    reason: Option<String>,
}

impl DisabledStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self { reason: Some(reason.into()) }
    }

    fn unavailable(&self) -> StorageError {
        StorageError::Unavailable {
            message: self.reason.clone().unwrap_or_else(|| "storage is disabled".to_owned()).into(),
            context: None,
        }
    }
}

impl KeyValueStore for DisabledStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(self.unavailable())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(self.unavailable())
    }
}
