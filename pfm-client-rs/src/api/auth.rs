//! Authentication endpoints.

use reqwest::Method;
use tracing::{info, warn};

use crate::client::PfmClient;
use crate::config::{KAKAO_CALLBACK_PATH, LOGIN_PATH, LOGOUT_PATH, ME_PATH, REGISTER_PATH};
use crate::error::Result;
use crate::models::auth::{
    KakaoCallbackRequest, LoginRequest, LoginResponse, RegisterRequest, TokenPair, User,
};
use crate::transport::request::{ApiRequest, RequestOptions};

/// `/api/v1/auth/*`.
pub struct AuthApi<'a> {
    client: &'a PfmClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a PfmClient) -> Self {
        Self { client }
    }

    /// Log in with email and password. Stores the returned credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .client
            .post(LOGIN_PATH, request, RequestOptions::new())
            .await?
            .into_data()?;
        self.establish(&response).await?;
        info!(user = response.user.id.as_str(), "Logged in");
        Ok(response)
    }

    /// Create an account. The server signs the new user in directly.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .client
            .post(REGISTER_PATH, request, RequestOptions::new())
            .await?
            .into_data()?;
        self.establish(&response).await?;
        info!(user = response.user.id.as_str(), "Registered");
        Ok(response)
    }

    /// Exchange a Kakao authorization code for a session.
    pub async fn kakao_login(&self, code: &str) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .client
            .post(KAKAO_CALLBACK_PATH, &KakaoCallbackRequest { code }, RequestOptions::new())
            .await?
            .into_data()?;
        self.establish(&response).await?;
        info!(user = response.user.id.as_str(), "Logged in with Kakao");
        Ok(response)
    }

    /// Sign out on the server, then locally.
    ///
    /// Local credentials are cleared even when the server call fails; the
    /// server error is still returned.
    pub async fn logout(&self) -> Result<()> {
        let request = ApiRequest::new(Method::POST, LOGOUT_PATH);
        let outcome = match self.client.send::<serde_json::Value>(&request).await {
            Ok(envelope) => envelope.into_unit(),
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            warn!("Server logout failed: {}", e);
        }
        self.client.clear_auth().await?;
        outcome
    }

    /// Renew explicitly with `refresh_token` and store the new pair.
    ///
    /// Like automatic renewal this call carries no bearer and is never
    /// retried. A refusal is returned as [`crate::Error::RefreshFailed`] and
    /// leaves the current session untouched.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let session = self.client.session();
        let pair = session.exchange(refresh_token).await?;
        session.set_tokens(pair.clone()).await?;
        info!("Session refreshed on request");
        Ok(pair)
    }

    /// The signed-in user.
    pub async fn me(&self) -> Result<User> {
        self.client
            .get(ME_PATH, RequestOptions::new())
            .await?
            .into_data()
    }

    async fn establish(&self, response: &LoginResponse) -> Result<()> {
        let session = self.client.session();
        session.set_tokens(response.token_pair()).await?;
        session.cache_user(response.user.clone()).await
    }
}
