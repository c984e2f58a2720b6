use crate::error::app_error::AppError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable string storage keyed by name, the server-side stand-in for browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Stores every key in one JSON object on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| AppError::storage_format(format!("Corrupt store at {}", self.path.display()), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::storage(format!("Failed to read {}", self.path.display()), e)),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::storage(format!("Failed to create {}", parent.display()), e))?;
        }

        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| AppError::storage(format!("Failed to write {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| AppError::storage(format!("Failed to replace {}", self.path.display()), e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.lock().map_err(|_| AppError::StateUnavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().map_err(|_| AppError::StateUnavailable)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().join("session.json"));
        assert_eq!(store.get("current_user").expect("read"), None);
    }

    #[test]
    fn values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("session.json");

        FileStore::new(&path).set("current_user", "rohan@example.com").expect("write");
        FileStore::new(&path).set("other", "kept").expect("write");

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("current_user").expect("read").as_deref(), Some("rohan@example.com"));
        assert_eq!(reopened.get("other").expect("read").as_deref(), Some("kept"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported_not_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").expect("seed file");

        let err = FileStore::new(&path).get("current_user").unwrap_err();
        assert!(matches!(err, AppError::StorageFormat { .. }));
    }

    #[test]
    fn memory_store_overwrites_in_place() {
        let store = MemoryStore::default();
        store.set("current_user", "a").expect("write");
        store.set("current_user", "b").expect("write");
        assert_eq!(store.get("current_user").expect("read").as_deref(), Some("b"));
    }
}
