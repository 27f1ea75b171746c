use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::{DurableStorage, StorageError, StorageWrite};

/// Storage persisted to a flat TOML table of string values.
///
/// Every batch rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe half of a batch.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the file at `path`. A missing or blank file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = Self::load(&path)?;
        info!(
            "Opened session storage at {} ({} keys)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(toml::from_str(&content)?)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string(entries)?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(contents.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        debug!("Session storage written: {} keys", entries.len());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn apply(&self, batch: &[StorageWrite]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();

        let mut next = entries.clone();
        for write in batch {
            match &write.value {
                Some(value) => {
                    next.insert(write.key.to_string(), value.clone());
                }
                None => {
                    next.remove(write.key);
                }
            }
        }

        // The cache only moves once the file is on disk.
        self.save(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{TOKEN_KEY, USER_KEY, USERNAME_KEY};

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::open(dir.path().join("session.toml")).unwrap();
        assert!(s.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let s = FileStorage::open(&path).unwrap();
        s.apply(&[
            StorageWrite::set(TOKEN_KEY, "t1"),
            StorageWrite::set(USER_KEY, r#"{"username":"a","firstLogin":true}"#),
            StorageWrite::set(USERNAME_KEY, "a"),
        ])
        .unwrap();
        drop(s);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(
            reopened.get(USER_KEY).as_deref(),
            Some(r#"{"username":"a","firstLogin":true}"#)
        );
        assert_eq!(reopened.get(USERNAME_KEY).as_deref(), Some("a"));
    }

    #[test]
    fn remove_drops_key_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let s = FileStorage::open(&path).unwrap();
        s.set(TOKEN_KEY, "t1").unwrap();
        s.remove(TOKEN_KEY).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("token"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/session.toml");
        let s = FileStorage::open(&path).unwrap();
        s.set(TOKEN_KEY, "t").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "this is = = not toml").unwrap();
        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::TomlParse(_))
        ));
    }
}
