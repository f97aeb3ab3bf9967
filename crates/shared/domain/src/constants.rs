/// Storage key under which the redacted form snapshot lives.
pub const STORAGE_KEY: &str = "formData";

/// Simulated network latency of a submission, in milliseconds.
pub const SUBMIT_DELAY_MS: u64 = 2000;

/// Prefix for environment overrides (`REGFORM__FORM__SUBMIT_DELAY_MS=500`).
pub const ENV_PREFIX: &str = "REGFORM";

/// Default directory of the file-backed store, relative to the working directory.
pub const DATA_DIR: &str = ".regform";
