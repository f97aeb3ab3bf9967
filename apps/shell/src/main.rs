mod app;
mod cli;
mod command;

use anyhow::{Context, Result};
use app::Shell;
use clap::Parser;
use cli::Args;
use regform_kernel::config::load_config;
use regform_kernel::domain::config::{AppConfig, StorageBackend, StorageConfig};
use regform_logger::Logger;
use regform_registration::RegistrationForm;
use regform_storage::{DisabledStore, FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config: AppConfig =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let _logger =
        Logger::init("regform", &config.logging).context("Failed to initialize logging")?;

    let store = open_store(&config.storage, args.memory);
    let form = RegistrationForm::from_config(&config.form, store);

    Shell::new(form).run().await
}

fn open_store(config: &StorageConfig, force_memory: bool) -> Arc<dyn KeyValueStore> {
    if force_memory || config.backend == StorageBackend::Memory {
        info!("Form snapshot kept in memory");
        return Arc::new(MemoryStore::new());
    }

    match FileStore::builder().root(&config.data_dir).open() {
        Ok(store) => {
            info!(root = %store.root().display(), "Form snapshot stored on disk");
            Arc::new(store)
        },
        Err(e) => {
            warn!(error = %e, "Storage unavailable, the form will not be persisted");
            Arc::new(DisabledStore::with_reason(e.to_string()))
        },
    }
}
