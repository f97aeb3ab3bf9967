use crate::error::{FormError, FormErrorExt};
use regform_domain::{PersistedSnapshot, RegistrationFormValues};
use regform_storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Mirrors form values into a [`KeyValueStore`] under one fixed key.
///
/// The password never reaches the store: writes go through [`PersistedSnapshot`],
/// which blanks it, and hydration discards whatever password a tampered entry holds.
///
/// The infallible [`hydrate`](Self::hydrate) and [`persist`](Self::persist) log
/// failures at `warn` and carry on; the `try_` variants surface them.
#[derive(Debug, Clone)]
pub struct FormPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl FormPersistence {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored snapshot.
    ///
    /// # Errors
    /// Returns [`FormError::Storage`] when the store cannot be read and
    /// [`FormError::Snapshot`] when the entry is not a snapshot object.
    pub fn try_hydrate(&self) -> Result<Option<RegistrationFormValues>, FormError> {
        let Some(raw) = self.store.get(&self.key).context("Reading form snapshot")? else {
            return Ok(None);
        };

        let snapshot: PersistedSnapshot =
            serde_json::from_str(&raw).context("Decoding form snapshot")?;
        Ok(Some(snapshot.into_values()))
    }

    /// Initial form values: the stored snapshot, or all-empty on absence or any failure.
    #[must_use]
    pub fn hydrate(&self) -> RegistrationFormValues {
        match self.try_hydrate() {
            Ok(Some(values)) => {
                debug!(key = %self.key, "Hydrated form from snapshot");
                values
            },
            Ok(None) => RegistrationFormValues::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Falling back to empty form");
                RegistrationFormValues::default()
            },
        }
    }

    /// Replaces the stored snapshot with `values`, password blanked.
    ///
    /// # Errors
    /// Returns [`FormError::Snapshot`] if encoding fails and [`FormError::Storage`]
    /// if the write fails.
    pub fn try_persist(&self, values: &RegistrationFormValues) -> Result<(), FormError> {
        let encoded = serde_json::to_string(&PersistedSnapshot::from(values))
            .context("Encoding form snapshot")?;
        self.store.set(&self.key, &encoded).context("Writing form snapshot")?;
        debug!(key = %self.key, bytes = encoded.len(), "Form snapshot written");
        Ok(())
    }

    /// Same as [`try_persist`](Self::try_persist) but swallows failures.
    /// Returns whether the snapshot was written.
    pub fn persist(&self, values: &RegistrationFormValues) -> bool {
        self.try_persist(values)
            .inspect_err(|e| warn!(key = %self.key, error = %e, "Form snapshot not saved"))
            .is_ok()
    }
}
