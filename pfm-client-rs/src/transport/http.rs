//! HTTP client with 401 renewal-and-retry for the MyBank API.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::SessionManager;
use crate::config::{self, CONNECT_TIMEOUT, USER_AGENT};
use crate::error::{Error, Result};
use crate::models::envelope::{Envelope, ErrorEnvelope};
use crate::transport::headers;
use crate::transport::request::{ApiRequest, Attempt};

/// Build the reqwest client used for API and renewal calls.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// HTTP client for the MyBank API.
///
/// Attaches the session's bearer credential and, on a 401, renews the
/// session once and re-dispatches.
pub struct ApiHttpClient {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<SessionManager>,
}

impl ApiHttpClient {
    pub fn new(client: reqwest::Client, base_url: Url, session: Arc<SessionManager>) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute a request and decode its envelope.
    ///
    /// At most two dispatches: the initial one, and one retry after a
    /// successful renewal. A 401 on the retry is final.
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<Envelope<T>> {
        let initial = Attempt::Initial {
            bearer: self.session.access_token().await,
        };

        let unauthorized = match self.dispatch(request, &initial).await {
            Err(err @ Error::Unauthorized { .. }) => err,
            other => return decode(other?, request).await,
        };

        warn!(
            path = request.path.as_str(),
            correlation_id = request.correlation_id.as_str(),
            "Got 401 - renewing session"
        );

        let bearer = match self.session.renew(initial.bearer()).await {
            Ok(token) => token,
            Err(Error::NotAuthenticated) => return Err(unauthorized),
            Err(e) => return Err(e),
        };

        let response = self.dispatch(request, &Attempt::Retry { bearer }).await?;
        decode(response, request).await
    }

    /// Send one attempt. Non-2xx responses come back as errors.
    async fn dispatch(&self, request: &ApiRequest, attempt: &Attempt) -> Result<reqwest::Response> {
        let mut url = config::endpoint_url(&self.base_url, &request.path);
        if !request.options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .options
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        let mut hdrs = headers::api_headers(attempt.bearer(), &request.correlation_id);
        headers::merge_extra(&mut hdrs, &request.options.headers);

        debug!(
            method = %request.method,
            path = request.path.as_str(),
            attempt = %attempt,
            correlation_id = request.correlation_id.as_str(),
            "Dispatching request"
        );

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(hdrs);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let err = Error::from_transport(e);
            warn!(path = request.path.as_str(), attempt = %attempt, "Request failed: {}", err);
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();
        let message = match &envelope {
            Some(env) => env.failure_message(),
            None => body,
        };

        if status == 401 {
            return Err(Error::Unauthorized {
                message,
                envelope: envelope.map(Box::new),
            });
        }

        warn!(status, path = request.path.as_str(), "API error: {}", message);
        Err(Error::Api {
            status,
            message,
            envelope: envelope.map(Box::new),
        })
    }
}

/// Decode a 2xx response. An empty body is read as a bare success.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    request: &ApiRequest,
) -> Result<Envelope<T>> {
    let bytes = response.bytes().await.map_err(Error::from_transport)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!(path = request.path.as_str(), "Empty response body");
        return Ok(Envelope {
            success: true,
            data: None,
            message: None,
            error: None,
            timestamp: None,
            correlation_id: None,
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}
