//! One-file-per-key JSON store.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use lexicard_core::traits::KeyValueStore;

use crate::error::StorageError;

const EXTENSION: &str = "json";

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory and are renamed over
/// the target, so a crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() && !dir.is_dir() {
            return Err(StorageError::NotADirectory(dir).into());
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory: {}", dir.display()))?;
        tracing::debug!("opened json-file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(value.as_bytes())
            .with_context(|| format!("failed to write {key}"))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("failed to flush {key}"))?;
        tmp.persist(&path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        tracing::debug!("wrote {} byte(s) to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }

    fn clear(&mut self) -> Result<()> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list {}", self.dir.display()))?;
        let mut removed = 0;
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to list {}", self.dir.display()))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        tracing::info!("cleared {removed} stored value(s) from {}", self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("wordLibrary").unwrap(), None);

        store.set("wordLibrary", r#"{"default":[]}"#).unwrap();
        store.set("wordLibrary", r#"{"custom":[]}"#).unwrap();
        assert_eq!(
            store.get("wordLibrary").unwrap().as_deref(),
            Some(r#"{"custom":[]}"#)
        );
        assert!(dir.path().join("wordLibrary.json").is_file());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileStore::open(dir.path())
            .unwrap()
            .set("quizRecords", "[]")
            .unwrap();
        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("quizRecords").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::open(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn open_rejects_file_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = JsonFileStore::open(file.path()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        for key in ["../escape", "a/b", "", "with space"] {
            let err = store.set(key, "x").unwrap_err();
            assert!(err.to_string().contains("invalid storage key"), "{key}");
        }
    }

    #[test]
    fn remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());

        store.clear().unwrap();
        assert_eq!(store.get("b").unwrap(), None);
        assert!(dir.path().join("notes.txt").exists());
    }
}
