//! Authentication-related types.

use serde::{Deserialize, Serialize};

/// The current access/refresh credential pair.
///
/// Always replaced as a whole; never mutated one member at a time.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Signed-in user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// WebAuthn assertion for second-factor login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fido2_assertion: Option<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            fido2_assertion: None,
        }
    }

    pub fn with_fido2_assertion(mut self, assertion: impl Into<String>) -> Self {
        self.fido2_assertion = Some(assertion.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
}

/// Payload of a successful login, registration or social login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    pub user: User,
}

impl LoginResponse {
    pub fn token_pair(&self) -> TokenPair {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Payload of the renewal endpoint. Extra fields (user, expiry) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct KakaoCallbackRequest<'a> {
    pub code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_omits_missing_assertion() {
        let body = serde_json::to_value(LoginRequest::new("user@example.com", "pw")).unwrap();
        assert_eq!(body, json!({"email": "user@example.com", "password": "pw"}));

        let body = serde_json::to_value(
            LoginRequest::new("user@example.com", "pw").with_fido2_assertion("assert"),
        )
        .unwrap();
        assert_eq!(body["fido2Assertion"], "assert");
    }

    #[test]
    fn test_login_response_decodes() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "accessToken": "tok1",
            "refreshToken": "ref1",
            "tokenType": "Bearer",
            "expiresIn": 3600,
            "user": {"id": "u1", "email": "user@example.com", "name": "Kim"}
        }))
        .unwrap();
        assert_eq!(resp.token_pair(), TokenPair::new("tok1", "ref1"));
        assert_eq!(resp.user.name, "Kim");
    }

    #[test]
    fn test_refresh_response_ignores_extra_fields() {
        let resp: RefreshResponse = serde_json::from_value(json!({
            "accessToken": "A2",
            "refreshToken": "R2",
            "expiresIn": 900,
            "user": {"id": "u1", "email": "e", "name": "n"}
        }))
        .unwrap();
        assert_eq!(resp.access_token, "A2");
        assert_eq!(resp.refresh_token, "R2");
    }

    #[test]
    fn test_token_pair_debug_redacts() {
        let dbg = format!("{:?}", TokenPair::new("secret-a", "secret-r"));
        assert!(!dbg.contains("secret"));
    }
}
