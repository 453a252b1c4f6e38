//! Session lifecycle manager.
//!
//! Holds the current credential pair, writes it through to the configured
//! store, and coordinates renewal so that concurrent 401s share one refresh
//! call.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{self, TOKENS_KEY, USER_KEY};
use crate::error::{Error, Result};
use crate::models::auth::{TokenPair, User};
use crate::storage::CredentialStore;

use super::events::{SessionEvent, EVENT_CHANNEL_CAPACITY};

/// Manages the MyBank session.
///
/// Thread-safe: shared behind an `Arc` by the client and its transport.
pub struct SessionManager {
    /// Current token pair. Replaced as a unit.
    tokens: RwLock<Option<TokenPair>>,
    /// Identity returned by the last login.
    user: RwLock<Option<User>>,
    /// Durable copy of the session.
    store: Arc<dyn CredentialStore>,
    /// HTTP client for the renewal call.
    client: reqwest::Client,
    /// Absolute URL of the renewal endpoint.
    refresh_url: Url,
    /// Held for the duration of a renewal.
    renewal: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a manager with no credentials loaded. Call [`Self::restore`]
    /// to pick up a previously stored session.
    pub fn new(store: Arc<dyn CredentialStore>, client: reqwest::Client, base_url: &Url) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tokens: RwLock::new(None),
            user: RwLock::new(None),
            store,
            client,
            refresh_url: config::endpoint_url(base_url, config::REFRESH_PATH),
            renewal: Mutex::new(()),
            events,
        }
    }

    /// Name of the backing store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Load the session from the store.
    ///
    /// Returns `true` when a complete pair was found. A stored pair that is
    /// unreadable or lacks an access token is treated as empty.
    pub async fn restore(&self) -> Result<bool> {
        let raw = match self.store.get(TOKENS_KEY).await? {
            Some(raw) => raw,
            None => {
                debug!(source = self.store.name(), "No stored session");
                return Ok(false);
            }
        };

        let pair = match serde_json::from_str::<TokenPair>(&raw) {
            Ok(pair) if !pair.access_token.is_empty() => pair,
            Ok(_) => {
                warn!(source = self.store.name(), "Stored session has no access token; ignoring it");
                return Ok(false);
            }
            Err(e) => {
                warn!(source = self.store.name(), "Stored session is unreadable; ignoring it: {}", e);
                return Ok(false);
            }
        };

        let user = match self.store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable cached user: {}", e);
                    None
                }
            },
            None => None,
        };

        info!(source = self.store.name(), "Restored session from storage");
        *self.tokens.write().await = Some(pair);
        *self.user.write().await = user;
        Ok(true)
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    /// Current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    /// Snapshot of the current pair.
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    /// Presence check only; says nothing about whether the server still
    /// accepts the token.
    pub async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }

    /// Replace both tokens and persist them.
    ///
    /// The in-memory pair only changes once the store accepted the new one,
    /// so a failed write leaves the previous session intact everywhere.
    pub async fn set_tokens(&self, pair: TokenPair) -> Result<()> {
        self.persist_tokens(&pair).await?;
        *self.tokens.write().await = Some(pair);
        debug!("Credentials stored");
        let _ = self.events.send(SessionEvent::Authenticated);
        Ok(())
    }

    /// Remember the signed-in user.
    pub async fn cache_user(&self, user: User) -> Result<()> {
        let raw = serde_json::to_string(&user)?;
        *self.user.write().await = Some(user);
        self.store.set(USER_KEY, &raw).await
    }

    /// The user cached by the last login, if any.
    pub async fn cached_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// Forget the session: both tokens and the cached user.
    pub async fn clear(&self) -> Result<()> {
        self.forget().await;
        self.remove_stored().await?;
        info!("Signed out");
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Renew the session after a 401 on a request that carried `stale`.
    ///
    /// Returns the access token to retry with. Renewal is single-flight: a
    /// caller that waited on another renewal reuses its result instead of
    /// calling the endpoint again.
    ///
    /// - [`Error::NotAuthenticated`]: nothing to renew with; the caller
    ///   should surface its original 401.
    /// - [`Error::RefreshFailed`]: the endpoint refused; the session has been
    ///   purged and [`SessionEvent::LoginRequired`] emitted.
    pub async fn renew(&self, stale: Option<&str>) -> Result<String> {
        let _guard = self.renewal.lock().await;

        // Double-check: another task may have renewed while we waited
        let current = self.tokens.read().await.clone();
        let pair = match current {
            Some(pair) => pair,
            None => return Err(Error::NotAuthenticated),
        };
        if !pair.access_token.is_empty() && stale != Some(pair.access_token.as_str()) {
            debug!("Session already renewed by a concurrent request");
            return Ok(pair.access_token);
        }
        if pair.refresh_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        match super::renewal::refresh_tokens(&self.client, &self.refresh_url, &pair.refresh_token)
            .await
        {
            Ok(renewed) => {
                let access = renewed.access_token.clone();
                *self.tokens.write().await = Some(renewed.clone());
                if let Err(e) = self.persist_tokens(&renewed).await {
                    warn!("Failed to persist renewed tokens: {}", e);
                }
                info!("Session renewed");
                let _ = self.events.send(SessionEvent::Renewed);
                Ok(access)
            }
            Err(e) => {
                warn!("Session renewal failed: {}", e);
                self.forget().await;
                if let Err(store_err) = self.remove_stored().await {
                    warn!("Failed to purge stored session: {}", store_err);
                }
                let reason = match &e {
                    Error::RefreshFailed(msg) => msg.clone(),
                    other => other.to_string(),
                };
                let _ = self.events.send(SessionEvent::LoginRequired { reason });
                Err(e)
            }
        }
    }

    /// Exchange `refresh_token` for a new pair without touching the session.
    ///
    /// Sent without a bearer and never renewed on 401.
    pub(crate) async fn exchange(&self, refresh_token: &str) -> Result<TokenPair> {
        super::renewal::refresh_tokens(&self.client, &self.refresh_url, refresh_token).await
    }

    async fn forget(&self) {
        *self.tokens.write().await = None;
        *self.user.write().await = None;
    }

    /// Single write: the store never sees one token without the other.
    async fn persist_tokens(&self, pair: &TokenPair) -> Result<()> {
        let raw = serde_json::to_string(pair)?;
        self.store.set(TOKENS_KEY, &raw).await
    }

    async fn remove_stored(&self) -> Result<()> {
        self.store.remove(TOKENS_KEY).await?;
        self.store.remove(USER_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCredentialStore;
    use async_trait::async_trait;

    /// Store that refuses every write after construction.
    struct ReadOnlyStore {
        inner: MemoryCredentialStore,
    }

    #[async_trait]
    impl CredentialStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::StorageSerialization("disk full".into()))
        }
        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    async fn stored_pair(store: &dyn CredentialStore) -> Option<TokenPair> {
        let raw = store.get(TOKENS_KEY).await.unwrap()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    fn manager(store: Arc<dyn CredentialStore>) -> SessionManager {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        SessionManager::new(store, reqwest::Client::new(), &base)
    }

    #[tokio::test]
    async fn test_restore_complete_pair() {
        let store = Arc::new(MemoryCredentialStore::with_tokens("tok1", "ref1"));
        let session = manager(store);
        assert!(session.restore().await.unwrap());
        assert_eq!(session.access_token().await.as_deref(), Some("tok1"));
        assert_eq!(session.refresh_token().await.as_deref(), Some("ref1"));
    }

    #[tokio::test]
    async fn test_restore_incomplete_pair_is_empty() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(TOKENS_KEY, r#"{"accessToken":"tok1"}"#).await.unwrap();
        let session = manager(store);
        assert!(!session.restore().await.unwrap());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_set_tokens_overwrites_pair() {
        let store = Arc::new(MemoryCredentialStore::new());
        let session = manager(store.clone());
        session.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
        session.set_tokens(TokenPair::new("A2", "R2")).await.unwrap();

        assert_eq!(
            session.tokens().await,
            Some(TokenPair::new("A2", "R2"))
        );
        assert_eq!(stored_pair(store.as_ref()).await, Some(TokenPair::new("A2", "R2")));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_pair() {
        let store = Arc::new(ReadOnlyStore {
            inner: MemoryCredentialStore::with_tokens("A1", "R1"),
        });
        let session = manager(store.clone());
        session.restore().await.unwrap();
        let mut events = session.subscribe();

        let result = session.set_tokens(TokenPair::new("A2", "R2")).await;
        assert!(result.is_err());
        assert_eq!(session.tokens().await, Some(TokenPair::new("A1", "R1")));
        assert_eq!(stored_pair(store.as_ref()).await, Some(TokenPair::new("A1", "R1")));
        assert!(events.try_recv().is_err());

        let reopened = manager(store);
        assert!(reopened.restore().await.unwrap());
        assert_eq!(reopened.tokens().await, Some(TokenPair::new("A1", "R1")));
    }

    #[tokio::test]
    async fn test_access_token_read_is_idempotent() {
        let session = manager(Arc::new(MemoryCredentialStore::with_tokens("tok1", "ref1")));
        session.restore().await.unwrap();
        assert_eq!(session.access_token().await, session.access_token().await);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = Arc::new(MemoryCredentialStore::new());
        let session = manager(store.clone());
        let mut events = session.subscribe();

        session.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
        session
            .cache_user(User {
                id: "u1".into(),
                email: "user@example.com".into(),
                name: "Kim".into(),
            })
            .await
            .unwrap();
        session.clear().await.unwrap();

        assert!(!session.is_authenticated().await);
        assert!(session.cached_user().await.is_none());
        assert!(!store.exists(USER_KEY).await.unwrap());
        assert!(!store.exists(TOKENS_KEY).await.unwrap());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Authenticated);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_renew_without_session() {
        let session = manager(Arc::new(MemoryCredentialStore::new()));
        assert!(matches!(
            session.renew(Some("stale")).await,
            Err(Error::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_renew_reuses_rotated_token() {
        let session = manager(Arc::new(MemoryCredentialStore::new()));
        session.set_tokens(TokenPair::new("A2", "R2")).await.unwrap();
        // The request carried A1, but the pair already moved on to A2.
        assert_eq!(session.renew(Some("A1")).await.unwrap(), "A2");
    }
}
