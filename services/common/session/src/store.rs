use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

pub const DEFAULT_CREDENTIAL_KEY: &str = "token";

/// Single persisted slot holding the raw session credential.
///
/// Implementations replace the value atomically; readers never observe a
/// partially written credential.
pub trait CredentialStore: Send + Sync {
    fn key(&self) -> &str;
    fn load(&self) -> StoreResult<Option<String>>;
    fn save(&self, credential: &str) -> StoreResult<()>;
    fn remove(&self) -> StoreResult<()>;
}

/// Process-local slot. Clones share the slot, the way tabs of one browser
/// profile share local storage.
#[derive(Clone)]
pub struct MemoryCredentialStore {
    key: Arc<str>,
    slot: Arc<RwLock<Option<String>>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_KEY)
    }
}

impl MemoryCredentialStore {
    pub fn new(key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self {
            key: Arc::from(key),
            slot: Arc::new(RwLock::new(None)),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn with_credential(self, credential: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.slot.write() {
            *guard = Some(credential.into());
        }
        self
    }

    /// Simulates storage being disabled or over quota.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "memory slot '{}' disabled",
                self.key
            )))
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> StoreResult<Option<String>> {
        self.check_available()?;
        let guard = self
            .slot
            .read()
            .map_err(|_| StoreError::Unavailable("memory slot poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, credential: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut guard = self
            .slot
            .write()
            .map_err(|_| StoreError::Unavailable("memory slot poisoned".into()))?;
        *guard = Some(credential.to_owned());
        Ok(())
    }

    fn remove(&self) -> StoreResult<()> {
        self.check_available()?;
        let mut guard = self
            .slot
            .write()
            .map_err(|_| StoreError::Unavailable("memory slot poisoned".into()))?;
        guard.take();
        Ok(())
    }
}

/// Durable slot: one file named after the key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    key: String,
    path: PathBuf,
    staging: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        let key = key.into();
        let dir = dir.as_ref();
        Self {
            path: dir.join(&key),
            staging: dir.join(format!(".{key}.tmp")),
            key,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_owned()))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, credential: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        fs::write(&self.staging, credential).map_err(|err| self.io_error(err))?;
        fs::rename(&self.staging, &self.path).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), "persisted session credential");
        Ok(())
    }

    fn remove(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
