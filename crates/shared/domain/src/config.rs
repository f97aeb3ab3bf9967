use crate::constants::{DATA_DIR, STORAGE_KEY, SUBMIT_DELAY_MS};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration of the registration form application.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub form: FormConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Form behaviour knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub storage_key: String,
    pub submit_delay_ms: u64,
}

/// Which key-value backend holds the persisted snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for FormConfig {
    fn default() -> Self {
        Self { storage_key: STORAGE_KEY.to_owned(), submit_delay_ms: SUBMIT_DELAY_MS }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::File, data_dir: PathBuf::from(DATA_DIR) }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}

impl FormConfig {
    #[must_use]
    pub const fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}
