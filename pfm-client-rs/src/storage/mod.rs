//! Durable key-value storage for session credentials.
//!
//! Provides the [`CredentialStore`] trait and implementations:
//! - [`FileCredentialStore`] - JSON file with 0600 permissions
//! - [`MemoryCredentialStore`] - In-memory (testing, ephemeral sessions)
//! - [`CallbackCredentialStore`] - User-provided callbacks
//! - [`KeyringCredentialStore`] - System keyring (feature-gated)
//!
//! The session layer writes under the fixed keys in [`crate::config`]
//! (`tokens`, `user`).

mod callback;
mod file;
mod memory;

#[cfg(feature = "keyring")]
mod keyring;

use async_trait::async_trait;

pub use callback::{CallbackCredentialStore, StoreFuture};
pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

#[cfg(feature = "keyring")]
pub use keyring::KeyringCredentialStore;

use crate::error::Result;

/// Trait for credential storage backends.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a value exists for `key`.
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this storage backend.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Blanket impl for `Arc<T>`.
#[async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Blanket impl for `Box<T>`.
#[async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for Box<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}
