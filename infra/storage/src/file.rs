//! Directory-backed store with sandboxed paths and atomic replacement.
//!
//! Every key maps to a single `<key>.json` file directly under the canonical root.
//! Writes go through a unique temporary file that is synced and then renamed over
//! the target, so a reader never observes a half-written snapshot.

use crate::builder::FileStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::security::{self, StorageKey};
use crate::store::KeyValueStore;
use std::fs;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

pub(crate) const TMP_MARKER: &str = ".regformtmp.";

/// The internal shared state of a [`FileStore`].
#[derive(Debug)]
pub struct FileStoreInner {
    /// The canonicalized directory holding all entries.
    pub(crate) root: PathBuf,
    /// Counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to a sandboxed directory of snapshots.
///
/// Cloning is cheap; all clones share the same root.
///
/// # Example
///
/// ```rust
/// use regform_storage::{FileStore, KeyValueStore, StorageError};
///
/// fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("data");
///     let store = FileStore::builder().root(&root).create(true).open()?;
///
///     store.set("formData", r#"{"name":"Jo"}"#)?;
///     assert_eq!(store.get("formData")?.as_deref(), Some(r#"{"name":"Jo"}"#));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    pub(crate) inner: Arc<FileStoreInner>,
}

impl Deref for FileStore {
    type Target = FileStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FileStore {
    #[must_use = "The store is not opened until you call .open()"]
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    /// The canonical directory that holds the entries.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical location of `key` inside the sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys and
    /// [`StorageError::PathTraversalAttempt`] if the entry resolves outside the root.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key = StorageKey::try_from(key)?;
        security::resolve_key(&self.root, &key)
    }

    /// Removes the entry for `key`. Missing entries are not an error.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the file exists but cannot be removed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Entry removed");
                Ok(())
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to remove: {}", path.display()).into()),
            }),
        }
    }

    pub fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root);
    }

    fn replace_atomically(&self, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        let temp = unique_tmp_path(target, &self.tmp_counter);
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp)
            .context(format!("Temp creation failed: {}", temp.display()))?;

        let written = write_synced(&mut file, data);
        drop(file);
        if let Err(err) = written.and_then(|()| swap_into_place(&temp, target)) {
            discard_tmp(&temp);
            return Err(err);
        }

        sync_dir(&self.root);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.resolve(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", path.display()).into()),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        self.replace_atomically(&path, value.as_bytes())?;
        debug!(path = %path.display(), bytes = value.len(), "Entry saved atomically");
        Ok(())
    }
}

fn write_synced(file: &mut fs::File, data: &[u8]) -> Result<(), StorageError> {
    file.write_all(data).context("Write failed")?;
    file.sync_all().context("Hardware sync failed")?;
    Ok(())
}

fn swap_into_place(temp: &Path, target: &Path) -> Result<(), StorageError> {
    let swap_failed = || format!("Atomic swap failed: {} -> {}", temp.display(), target.display());
    match fs::rename(temp, target) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(target)
                .context(format!("Failed to replace existing file: {}", target.display()))?;
            fs::rename(temp, target).context(swap_failed())
        },
        Err(err) => Err(StorageError::Io { source: err, context: Some(swap_failed().into()) }),
    }
}

fn discard_tmp(temp: &Path) {
    if let Err(err) = fs::remove_file(temp) {
        tracing::warn!(path = %temp.display(), error = %err, "Temp file cleanup failed");
    }
}

fn sync_dir(path: &Path) {
    match fs::File::open(path) {
        Ok(dir) => {
            if let Err(err) = dir.sync_all() {
                tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("entry");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
}
