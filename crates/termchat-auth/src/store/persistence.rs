//! Load/save backends for the identity mapping.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use termchat_core::error::{AppError, ErrorKind};
use termchat_core::result::AppResult;

use super::record::IdentityRecord;

/// Identity handle → record.
pub type IdentityMap = BTreeMap<String, IdentityRecord>;

/// Whole-mapping persistence boundary of the credential store.
pub trait CredentialPersistence: Send + std::fmt::Debug {
    /// Reads the persisted mapping. `Ok(None)` means no backing store exists yet.
    fn load(&self) -> AppResult<Option<IdentityMap>>;

    /// Replaces the persisted mapping with `map`.
    fn save(&self, map: &IdentityMap) -> AppResult<()>;
}

/// Pretty-printed JSON file, overwritten wholesale on every save.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Creates a backend for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CredentialPersistence for JsonFilePersistence {
    fn load(&self) -> AppResult<Option<IdentityMap>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read '{}'", self.path.display()),
                    e,
                ));
            }
        };

        let map: IdentityMap = serde_json::from_str(&raw).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Credential file '{}' is corrupt: {e}", self.path.display()),
                e,
            )
        })?;

        info!(path = %self.path.display(), identities = map.len(), "Loaded credential file");
        Ok(Some(map))
    }

    fn save(&self, map: &IdentityMap) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename over it so readers never see a
        // half-written mapping.
        let staging = self.staging_path();
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), identities = map.len(), "Credential file written");
        Ok(())
    }
}

/// In-memory backend. Clones share the same saved snapshot and failure switch.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    saved: Arc<Mutex<Option<IdentityMap>>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryPersistence {
    /// Creates an empty backend with no saved mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `map`.
    pub fn with_map(map: IdentityMap) -> Self {
        Self {
            saved: Arc::new(Mutex::new(Some(map))),
            fail_saves: Arc::default(),
        }
    }

    /// Makes every later save fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    /// The last saved mapping, if any.
    pub fn snapshot(&self) -> Option<IdentityMap> {
        self.saved.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl CredentialPersistence for MemoryPersistence {
    fn load(&self) -> AppResult<Option<IdentityMap>> {
        Ok(self.snapshot())
    }

    fn save(&self, map: &IdentityMap) -> AppResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::storage("Persistence is unavailable"));
        }
        let mut guard = self
            .saved
            .lock()
            .map_err(|_| AppError::internal("Memory persistence lock poisoned"))?;
        *guard = Some(map.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFilePersistence::new(dir.path().join("users.json"));
        assert!(backend.load().expect("load").is_none());
    }

    #[test]
    fn test_save_writes_on_disk_field_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFilePersistence::new(dir.path().join("nested/users.json"));

        let mut map = IdentityMap::new();
        map.insert("alice".to_string(), IdentityRecord::new("Alice", "abc123"));
        backend.save(&map).expect("save");

        let raw = fs::read_to_string(backend.path()).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["alice"]["nickname"], "Alice");
        assert_eq!(value["alice"]["password"], "abc123");
        assert_eq!(value["alice"]["online"], true);
        assert!(!backend.staging_path().exists());

        let loaded = backend.load().expect("load").expect("present");
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("users.json");
        fs::write(&path, "{ not json").expect("write");

        let err = JsonFilePersistence::new(&path).load().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_memory_failing_save() {
        let backend = MemoryPersistence::new();
        let shared = backend.clone();
        shared.set_failing(true);
        assert!(backend.save(&IdentityMap::new()).is_err());
        assert!(backend.snapshot().is_none());

        shared.set_failing(false);
        assert!(backend.save(&IdentityMap::new()).is_ok());
        assert_eq!(backend.snapshot(), Some(IdentityMap::new()));
    }
}
