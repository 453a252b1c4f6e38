//! Client construction from application configuration.

use std::sync::Arc;

use anyhow::Context;
use pfm_client::storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use pfm_client::{PfmClient, SessionEvent};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::config::{Config, StorageBackend};

/// Open the credential store selected by `[session]`.
pub fn open_store(config: &Config) -> anyhow::Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.session.backend {
        StorageBackend::Memory => Arc::new(MemoryCredentialStore::new()),
        StorageBackend::File => match &config.session.path {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => Arc::new(
                FileCredentialStore::default_path()
                    .context("Cannot locate the default session file; set session.path")?,
            ),
        },
        #[cfg(feature = "system-keyring")]
        StorageBackend::Keyring => Arc::new(pfm_client::storage::KeyringCredentialStore::new()),
        #[cfg(not(feature = "system-keyring"))]
        StorageBackend::Keyring => {
            anyhow::bail!("session.backend = \"keyring\" requires the `system-keyring` feature")
        }
    };
    Ok(store)
}

/// Build a client for the configured API and session store.
pub async fn build_client(config: &Config) -> anyhow::Result<PfmClient> {
    let store = open_store(config)?;
    let client = PfmClient::builder()
        .base_url(config.api.base_url.as_str())
        .timeout(config.api.timeout())
        .storage(store)
        .build()
        .await
        .with_context(|| format!("Failed to initialise client for {}", config.api.base_url))?;
    Ok(client)
}

/// Notices for the session events raised so far.
///
/// Called once the command has finished so nothing is lost to runtime
/// shutdown.
pub fn drain_notices(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<String> {
    let mut notices = Vec::new();
    loop {
        match events.try_recv() {
            Ok(SessionEvent::LoginRequired { reason }) => notices.push(format!(
                "Session expired ({reason}). Run `mybank-pfm login` to sign in again."
            )),
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_notices_reports_login_required() {
        let (tx, mut rx) = broadcast::channel(4);
        tx.send(SessionEvent::Authenticated).unwrap();
        tx.send(SessionEvent::LoginRequired {
            reason: "refresh token expired".into(),
        })
        .unwrap();
        drop(tx);

        let notices = drain_notices(&mut rx);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("refresh token expired"));
        assert!(drain_notices(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_file_store_round_trip_through_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.session.path = Some(dir.path().join("session.json"));

        let client = build_client(&config).await.unwrap();
        client.set_auth("tok1", "ref1").await.unwrap();

        let reopened = build_client(&config).await.unwrap();
        assert!(reopened.is_authenticated().await);
        assert_eq!(reopened.session().store_name(), "file");
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_reported() {
        let mut config = Config::default();
        config.session.backend = StorageBackend::Memory;
        config.api.base_url = "localhost without scheme".into();
        assert!(build_client(&config).await.is_err());
    }
}
