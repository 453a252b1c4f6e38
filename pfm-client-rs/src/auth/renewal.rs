//! The renewal call: exchange a refresh token for a new credential pair.

use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::auth::{RefreshRequest, RefreshResponse, TokenPair};
use crate::models::envelope::Envelope;
use crate::transport::headers;

/// Renew the session.
///
/// POST `{base}/api/v1/auth/refresh`
/// Body: `{"refreshToken": "..."}`
///
/// Sent without a bearer credential. Every failure mode (transport error,
/// non-2xx status, `success: false`, missing access token) is reported as
/// [`Error::RefreshFailed`]. When the server rotates only the access token,
/// the previous refresh token is carried into the new pair.
pub async fn refresh_tokens(
    client: &reqwest::Client,
    url: &Url,
    refresh_token: &str,
) -> Result<TokenPair> {
    if refresh_token.is_empty() {
        return Err(Error::RefreshFailed("No refresh token stored".into()));
    }

    let correlation_id = Uuid::new_v4().to_string();
    info!(correlation_id = correlation_id.as_str(), "Renewing session...");

    let response = client
        .post(url.clone())
        .headers(headers::refresh_headers(&correlation_id))
        .json(&RefreshRequest { refresh_token })
        .send()
        .await
        .map_err(|e| Error::RefreshFailed(format!("Refresh request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::RefreshFailed(format!(
            "Refresh endpoint returned {}: {}",
            status, body
        )));
    }

    let envelope: Envelope<RefreshResponse> = response
        .json()
        .await
        .map_err(|e| Error::RefreshFailed(format!("Failed to parse refresh response: {}", e)))?;

    if !envelope.success {
        return Err(Error::RefreshFailed(envelope.failure_message()));
    }

    let data = envelope
        .data
        .ok_or_else(|| Error::RefreshFailed("Response does not contain tokens".into()))?;

    if data.access_token.is_empty() {
        return Err(Error::RefreshFailed(
            "Response does not contain accessToken".into(),
        ));
    }

    let refresh_token = if data.refresh_token.is_empty() {
        refresh_token.to_string()
    } else {
        data.refresh_token
    };

    debug!("Session renewed");
    Ok(TokenPair::new(data.access_token, refresh_token))
}
