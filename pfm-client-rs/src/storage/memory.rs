//! In-memory credential storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::CredentialStore;
use crate::error::Result;

/// In-memory credential storage. Contents are lost when dropped.
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-seeded with an access/refresh pair.
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let pair = serde_json::json!({
            "accessToken": access_token,
            "refreshToken": refresh_token,
        });
        let mut values = HashMap::new();
        values.insert(crate::config::TOKENS_KEY.to_string(), pair.to_string());
        Self {
            values: RwLock::new(values),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.values.read().await.contains_key(key))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryCredentialStore::new();

        assert!(store.get("accessToken").await.unwrap().is_none());
        assert!(!store.exists("accessToken").await.unwrap());

        store.set("accessToken", "tok1").await.unwrap();
        assert!(store.exists("accessToken").await.unwrap());
        assert_eq!(store.get("accessToken").await.unwrap().as_deref(), Some("tok1"));

        store.set("accessToken", "tok2").await.unwrap();
        assert_eq!(store.get("accessToken").await.unwrap().as_deref(), Some("tok2"));

        store.remove("accessToken").await.unwrap();
        store.remove("accessToken").await.unwrap();
        assert!(!store.exists("accessToken").await.unwrap());
    }

    #[tokio::test]
    async fn test_with_tokens() {
        let store = MemoryCredentialStore::with_tokens("a", "r");
        let raw = store.get("tokens").await.unwrap().unwrap();
        let pair: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(pair["accessToken"], "a");
        assert_eq!(pair["refreshToken"], "r");
    }
}
