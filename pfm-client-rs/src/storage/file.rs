//! File-based credential storage with secure permissions.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::CredentialStore;
use crate::error::{Error, Result};

/// File-based credential storage: one JSON object of key → value, 0600 permissions.
pub struct FileCredentialStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Create storage at the specified path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Create storage at the default path: `~/.config/mybank-pfm/session.json`
    pub fn default_path() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot determine config directory".into()))?;
        let path = config_dir.join("mybank-pfm").join("session.json");
        Ok(Self::new(path))
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| Error::StorageSerialization(e.to_string()))
    }

    fn write_all(&self, data: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage_io(parent, e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| Error::StorageSerialization(e.to_string()))?;
        std::fs::write(&self.path, &content)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;

        // Set 0600 permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| Error::storage_io(&self.path, format!("chmod: {}", e)))?;
        }

        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let data = self.read_all()?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_all()?;
        data.insert(key.to_string(), value.to_string());
        self.write_all(&data)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read_all()?;
        if data.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&data)
    }

    fn name(&self) -> &str {
        "file"
    }
}
