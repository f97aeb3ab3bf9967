use crate::error::StorageError;
use std::fmt;
use std::path::{Path, PathBuf};

const MAX_KEY_LEN: usize = 128;
const FILE_SUFFIX: &str = "json";

/// A validated storage key: non-empty, at most 128 characters of `[A-Za-z0-9_-]`.
///
/// Keys are case-sensitive (`formData` and `formdata` are distinct entries).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl TryFrom<&str> for StorageKey {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        if value.is_empty() {
            return Err(StorageError::InvalidKey {
                message: "EMPTY".into(),
                context: Some("Storage key cannot be empty".into()),
            });
        }

        if value.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey {
                message: format!("{} characters", value.len()).into(),
                context: Some("Storage key is too long".into()),
            });
        }

        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(StorageError::InvalidKey {
                message: value.to_owned().into(),
                context: Some("Storage key contains illegal characters".into()),
            });
        }

        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for StorageKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a key to its file inside the sandbox root.
///
/// The key alphabet already excludes separators and dots; the prefix check guards
/// against a root that was swapped for a symlink after canonicalization.
pub(crate) fn resolve_key(root: &Path, key: &StorageKey) -> Result<PathBuf, StorageError> {
    let path = root.join(format!("{key}.{FILE_SUFFIX}"));

    if path.parent() != Some(root) {
        return Err(StorageError::PathTraversalAttempt {
            message: path.display().to_string().into(),
            context: Some("Resolved key escaped the storage root".into()),
        });
    }

    match path.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(path),
        Ok(canonical) => Err(StorageError::PathTraversalAttempt {
            message: canonical.display().to_string().into(),
            context: Some("Existing entry is a symlink outside sandbox".into()),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path),
        Err(e) => Err(StorageError::Io {
            source: e,
            context: Some(format!("Failed to verify {}", path.display()).into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(StorageKey::try_from("formData").is_ok());
        assert!(StorageKey::try_from("form_data-v2").is_ok());

        assert!(StorageKey::try_from("").is_err());
        assert!(StorageKey::try_from("../etc/passwd").is_err());
        assert!(StorageKey::try_from("form.data").is_err());
        assert!(StorageKey::try_from("a".repeat(MAX_KEY_LEN + 1).as_str()).is_err());
    }

    #[test]
    fn test_resolve_stays_in_root() {
        let root = Path::new("/nonexistent-regform-root");
        let key = StorageKey::try_from("formData").unwrap();

        let path = resolve_key(root, &key).unwrap();
        assert_eq!(path, root.join("formData.json"));
    }
}
