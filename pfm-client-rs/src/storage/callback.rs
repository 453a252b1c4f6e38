//! Callback-based credential storage for host-provided persistence.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

use super::CredentialStore;
use crate::error::Result;

/// Future returned by a storage callback.
pub type StoreFuture<T> = BoxFuture<'static, Result<T>>;

type GetFn = dyn Fn(String) -> StoreFuture<Option<String>> + Send + Sync;
type SetFn = dyn Fn(String, String) -> StoreFuture<()> + Send + Sync;
type RemoveFn = dyn Fn(String) -> StoreFuture<()> + Send + Sync;

/// Storage backed by user-provided async callbacks.
///
/// Lets an embedding application keep credentials wherever it already keeps
/// its own state (a browser bridge, a secrets service, a database row).
pub struct CallbackCredentialStore {
    get_fn: Arc<GetFn>,
    set_fn: Arc<SetFn>,
    remove_fn: Arc<RemoveFn>,
}

impl CallbackCredentialStore {
    /// Create from async closures.
    pub fn new<G, S, R>(get: G, set: S, remove: R) -> Self
    where
        G: Fn(String) -> StoreFuture<Option<String>> + Send + Sync + 'static,
        S: Fn(String, String) -> StoreFuture<()> + Send + Sync + 'static,
        R: Fn(String) -> StoreFuture<()> + Send + Sync + 'static,
    {
        Self {
            get_fn: Arc::new(get),
            set_fn: Arc::new(set),
            remove_fn: Arc::new(remove),
        }
    }
}

#[async_trait]
impl CredentialStore for CallbackCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (self.get_fn)(key.to_string()).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (self.set_fn)(key.to_string(), value.to_string()).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (self.remove_fn)(key.to_string()).await
    }

    fn name(&self) -> &str {
        "callback"
    }
}
