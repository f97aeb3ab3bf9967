//! Kernel utilities shared across the registration form crates.
//! Keep this crate lightweight: it re-exports the domain and provides layered config loading.
//!
//! ```rust
//! use regform_kernel::config::load_config;
//! use regform_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config(None::<&str>).expect("defaults always load");
//! assert_eq!(cfg.form.storage_key, "formData");
//! ```

pub mod config;

pub use regform_domain as domain;
