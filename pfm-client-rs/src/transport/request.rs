//! Description of an outbound API call.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Per-call options: query parameters and extra headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query parameters.
    pub fn queries(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Add an extra header. `Authorization` is managed by the client and ignored here.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Config(format!("Invalid header value for '{}': {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// One logical API call.
///
/// The same `ApiRequest` is dispatched again, unchanged, when the session is
/// renewed; only the bearer credential differs between attempts.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub options: RequestOptions,
    pub correlation_id: String,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Which dispatch of a logical request this is.
///
/// Only an [`Attempt::Initial`] that comes back 401 can lead to renewal; the
/// retry carries the renewed credential and its outcome is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// First dispatch, with whatever access token the session holds.
    Initial { bearer: Option<String> },
    /// Single re-dispatch after a successful renewal.
    Retry { bearer: String },
}

impl Attempt {
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::Initial { bearer } => bearer.as_deref(),
            Self::Retry { bearer } => Some(bearer.as_str()),
        }
    }
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial { .. } => write!(f, "initial"),
            Self::Retry { .. } => write!(f, "retry"),
        }
    }
}
