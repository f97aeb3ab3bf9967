//! Key-value snapshot storage.
//!
//! A small synchronous abstraction standing in for browser local storage, with
//! interchangeable backends.
//!
//! # Backends
//!
//! - **[`MemoryStore`]**: process-local map, shared between clones.
//! - **[`FileStore`]**: one file per key inside a canonicalized root directory.
//!   Writes use an "atomic swap" (unique temp file + `fsync` + `rename`), and stale
//!   temp files from interrupted writes are purged when the store opens.
//! - **[`DisabledStore`]**: always unavailable; lets callers keep running when
//!   no durable backend can be opened.
//!
//! # Example
//!
//! ```rust
//! use regform_storage::{KeyValueStore, MemoryStore, StorageError};
//!
//! fn main() -> Result<(), StorageError> {
//!     let store = MemoryStore::new();
//!     store.set("formData", r#"{"name":"Jo","password":""}"#)?;
//!     assert!(store.get("formData")?.is_some());
//!     assert!(store.get("missing")?.is_none());
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod file;
mod maintenance;
mod security;
mod store;

pub use builder::FileStoreBuilder;
pub use error::{StorageError, StorageErrorExt};
pub use file::FileStore;
pub use security::StorageKey;
pub use store::{DisabledStore, KeyValueStore, MemoryStore};
