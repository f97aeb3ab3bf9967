use config::{Config, Environment, File};
use regform_domain::constants::ENV_PREFIX;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Custom error type for config loading.
#[regform_derive::regform_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: an optional file, then `REGFORM__` environment overrides.
///
/// 1. **File**: when `path` is given it must exist; the format follows the extension
///    (`.toml`, `.json`, `.yaml`, ...).
/// 2. **Environment**: variables prefixed with `REGFORM__`, nested with double
///    underscores (`REGFORM__FORM__SUBMIT_DELAY_MS=500` sets `form.submit_delay_ms`).
///
/// Missing values fall back to the target type's serde defaults.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or malformed, or if the merged
/// values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use regform_domain::config::AppConfig;
/// use regform_kernel::config::load_config;
///
/// let cfg: AppConfig = load_config(None::<&str>).unwrap_or_default();
/// assert!(!cfg.form.storage_key.is_empty());
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    build(path.as_ref().map(AsRef::as_ref), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

fn build<T>(path: Option<&Path>, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    builder
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

/// Same as [`load_config`] but reads overrides from `vars` instead of the process environment.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: HashMap<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    build(path.as_ref().map(AsRef::as_ref), environment().source(Some(vars)))
}
