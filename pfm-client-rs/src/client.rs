//! Main client entry point.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::info;
use url::Url;

use crate::api::{AuthApi, InvestmentApi, PaymentApi, PfmApi};
use crate::auth::{SessionEvent, SessionManager};
use crate::config::{self, REQUEST_TIMEOUT};
use crate::error::Result;
use crate::models::auth::TokenPair;
use crate::models::envelope::Envelope;
use crate::storage::{CredentialStore, MemoryCredentialStore};
use crate::transport::http::{build_http_client, ApiHttpClient};
use crate::transport::request::{ApiRequest, RequestOptions};

/// MyBank PFM API client.
///
/// Every call carries the stored access token. A 401 triggers one session
/// renewal and one retry; if renewal fails the session is purged and
/// [`SessionEvent::LoginRequired`] is broadcast.
///
/// # Examples
///
/// ```rust,no_run
/// use pfm_client::{PfmClient, models::auth::LoginRequest};
///
/// # async fn example() -> pfm_client::Result<()> {
/// let client = PfmClient::builder()
///     .base_url("http://localhost:8080")
///     .build()
///     .await?;
///
/// client
///     .auth()
///     .login(&LoginRequest::new("user@example.com", "secret"))
///     .await?;
///
/// let summary = client.pfm().assets().await?;
/// println!("total balance: {}", summary.total_balance);
/// # Ok(())
/// # }
/// ```
pub struct PfmClient {
    session: Arc<SessionManager>,
    http: ApiHttpClient,
}

impl PfmClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> PfmClientBuilder {
        PfmClientBuilder::new()
    }

    /// GET `path`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Envelope<T>> {
        let request = ApiRequest::new(Method::GET, path).with_options(options);
        self.http.execute(&request).await
    }

    /// POST `body` to `path`.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<Envelope<T>> {
        let request = ApiRequest::new(Method::POST, path)
            .with_body(serde_json::to_value(body)?)
            .with_options(options);
        self.http.execute(&request).await
    }

    /// PUT `body` to `path`.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<Envelope<T>> {
        let request = ApiRequest::new(Method::PUT, path)
            .with_body(serde_json::to_value(body)?)
            .with_options(options);
        self.http.execute(&request).await
    }

    /// DELETE `path`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Envelope<T>> {
        let request = ApiRequest::new(Method::DELETE, path).with_options(options);
        self.http.execute(&request).await
    }

    /// Execute a prepared request. Used for calls without a body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<Envelope<T>> {
        self.http.execute(request).await
    }

    /// Store a credential pair, replacing whatever was stored before.
    pub async fn set_auth(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<()> {
        self.session
            .set_tokens(TokenPair::new(access_token, refresh_token))
            .await
    }

    /// Forget both tokens and the cached user.
    pub async fn clear_auth(&self) -> Result<()> {
        self.session.clear().await
    }

    /// Whether an access token is stored. Does not contact the server.
    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    /// Get a reference to the session manager.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// API origin this client talks to.
    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Asset and spending endpoints.
    pub fn pfm(&self) -> PfmApi<'_> {
        PfmApi::new(self)
    }

    /// Transfer and payment history endpoints.
    pub fn payments(&self) -> PaymentApi<'_> {
        PaymentApi::new(self)
    }

    /// Round-up investing endpoints.
    pub fn investments(&self) -> InvestmentApi<'_> {
        InvestmentApi::new(self)
    }
}

/// Builder for [`PfmClient`].
pub struct PfmClientBuilder {
    base_url: Option<String>,
    storage: Option<Arc<dyn CredentialStore>>,
    reqwest_client: Option<reqwest::Client>,
    timeout: Duration,
}

impl PfmClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            storage: None,
            reqwest_client: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Set the API origin. Defaults to `PFM_API_URL`, then `http://localhost:8080`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the credential store. Defaults to an in-memory store.
    pub fn storage(mut self, storage: Arc<dyn CredentialStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set a custom reqwest client. Overrides [`Self::timeout`].
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.reqwest_client = Some(client);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client and restore any stored session.
    pub async fn build(self) -> Result<PfmClient> {
        let base_url = match &self.base_url {
            Some(raw) => config::parse_base_url(raw)?,
            None => config::base_url_from_env()?,
        };

        let client = match self.reqwest_client {
            Some(client) => client,
            None => build_http_client(self.timeout)?,
        };

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));

        let session = Arc::new(SessionManager::new(storage, client.clone(), &base_url));
        session.restore().await?;

        info!(
            base_url = base_url.as_str(),
            storage = session.store_name(),
            "PfmClient initialized"
        );

        let http = ApiHttpClient::new(client, base_url, Arc::clone(&session));
        Ok(PfmClient { session, http })
    }
}

impl Default for PfmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_rejects_bad_url() {
        let result = PfmClient::builder().base_url("ftp://nope").build().await;
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[tokio::test]
    async fn test_set_and_clear_auth() {
        let client = PfmClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .await
            .unwrap();
        assert!(!client.is_authenticated().await);

        client.set_auth("tok1", "ref1").await.unwrap();
        assert!(client.is_authenticated().await);

        client.clear_auth().await.unwrap();
        assert!(!client.is_authenticated().await);
    }
}
