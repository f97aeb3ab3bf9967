//! # Logger
//!
//! Turns the `[logging]` section of the application config into a `tracing`
//! subscriber: compact console output on stderr, plus a daily rolling file in
//! `directory` (plain text or JSON lines) written by a non-blocking worker.
//!
//! `level` accepts anything an env filter does, from `debug` to
//! `regform_registration=trace,info`. A non-empty `RUST_LOG` takes precedence.
//!
//! ## Example
//!
//! ```rust
//! use regform_domain::config::LoggingConfig;
//! use regform_logger::Logger;
//!
//! let config = LoggingConfig { level: "debug".to_owned(), ..LoggingConfig::default() };
//! let (_logger, _default) = Logger::scoped("regform", &config).unwrap();
//! tracing::debug!("only visible on this thread");
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use regform_domain::config::LoggingConfig;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::dispatcher::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const MAX_LOG_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";
const ENV_OVERRIDE: &str = "RUST_LOG";

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

struct Assembly {
    filter: EnvFilter,
    layers: Vec<BoxedLayer>,
    logger: Logger,
}

/// Handle to the installed logging system.
///
/// Keep it alive for the life of the program: dropping it flushes and stops the
/// file worker.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
    file_dir: Option<PathBuf>,
}

impl Logger {
    /// Installs the process-wide subscriber described by `config`.
    ///
    /// `name` prefixes the log files (`<name>.<date>.log`).
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an empty name or bad filter
    /// directives, [`LoggerError::Internal`] or [`LoggerError::Appender`] when the log
    /// directory cannot be used, and [`LoggerError::Subscriber`] if a global
    /// subscriber is already installed.
    pub fn init(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        let Assembly { filter, layers, logger } = assemble(name, config)?;
        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        tracing::debug!(name, file = ?logger.file_dir, "Logging initialized");
        Ok(logger)
    }

    /// Like [`init`](Self::init) but only for the current thread, until the
    /// returned [`DefaultGuard`] is dropped.
    ///
    /// # Errors
    /// Same as [`init`](Self::init), except that it never conflicts with a global
    /// subscriber.
    pub fn scoped(name: &str, config: &LoggingConfig) -> Result<(Self, DefaultGuard), LoggerError> {
        let Assembly { filter, layers, logger } = assemble(name, config)?;
        let default = tracing_subscriber::registry().with(filter).with(layers).set_default();
        Ok((logger, default))
    }

    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }

    /// Directory receiving the rolling log files, if any.
    #[must_use]
    pub fn file_dir(&self) -> Option<&Path> {
        self.file_dir.as_deref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log files");
        }
    }
}

/// Parses filter directives, with `info` for targets they do not mention.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] when `directives` do not parse.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse(directives)
        .map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("'{directives}': {e}").into(),
            context: None,
        })
}

fn assemble(name: &str, config: &LoggingConfig) -> Result<Assembly, LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    let filter = match std::env::var(ENV_OVERRIDE) {
        Ok(directives) if !directives.trim().is_empty() => {
            parse_filter(&directives).context(ENV_OVERRIDE)?
        },
        _ => parse_filter(&config.level).context("logging.level")?,
    };

    let mut layers = vec![console_layer()];
    let mut logger = Logger { guard: None, file_dir: None };

    if let Some(dir) = &config.directory {
        let (layer, guard) = file_layer(name, dir, config.json)?;
        layers.push(layer);
        logger.guard = Some(guard);
        logger.file_dir = Some(dir.clone());
    }

    Ok(Assembly { filter, layers, logger })
}

fn console_layer() -> BoxedLayer {
    fmt::layer()
        .compact()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .boxed()
}

fn file_layer(name: &str, dir: &Path, json: bool) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(dir).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create log directory: {}", dir.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if json { layer.json().boxed() } else { layer.boxed() };

    Ok((layer, guard))
}
