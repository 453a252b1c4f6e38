//! Error types for pfm-client.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::envelope::ErrorEnvelope;

/// The main error type for pfm-client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ───────────────────────────────────────────────────────
    /// No credentials available for an operation that needs them.
    #[error("Not authenticated - log in or call set_auth first")]
    NotAuthenticated,

    /// The server rejected the request with 401 and the session could not be
    /// recovered (already retried, or no refresh token stored).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message from the error envelope, or the raw body.
        message: String,
        /// Decoded error envelope, when the body carried one.
        envelope: Option<Box<ErrorEnvelope>>,
    },

    /// Session renewal failed. Stored credentials have been purged.
    #[error("Session renewal failed: {0}")]
    RefreshFailed(String),

    // ── API ──────────────────────────────────────────────────────────────────
    /// API returned a non-success HTTP status other than 401.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope, or the raw body.
        message: String,
        /// Decoded error envelope, when the body carried one.
        envelope: Option<Box<ErrorEnvelope>>,
    },

    /// The envelope reported `success: false`.
    #[error("{message}")]
    Business {
        /// Human-readable message from the envelope.
        message: String,
        /// Machine-readable error code, if any.
        code: Option<String>,
        /// Additional detail, if any.
        detail: Option<String>,
        /// Correlation id echoed by the server.
        correlation_id: Option<String>,
    },

    /// A successful envelope carried no payload where one was required.
    #[error("Response envelope has no data")]
    MissingData,

    // ── Storage ──────────────────────────────────────────────────────────────
    /// Storage I/O error.
    #[error("Storage I/O error at {path}: {message}")]
    StorageIo {
        /// Path that caused the error.
        path: PathBuf,
        /// Error description.
        message: String,
    },

    /// Storage serialization error.
    #[error("Storage serialization error: {0}")]
    StorageSerialization(String),

    /// Keyring backend error.
    #[error("Keyring error: {0}")]
    Keyring(String),

    // ── Infrastructure ───────────────────────────────────────────────────────
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,
}

impl Error {
    /// Returns true if this error indicates re-authentication is needed.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Error::NotAuthenticated | Error::Unauthorized { .. } | Error::RefreshFailed(_)
        )
    }

    /// Returns true for a 401 response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// HTTP status associated with this error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The decoded error envelope, if the server sent one.
    #[must_use]
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Error::Unauthorized { envelope, .. } | Error::Api { envelope, .. } => {
                envelope.as_deref()
            }
            _ => None,
        }
    }

    /// Creates a storage I/O error.
    #[must_use]
    pub fn storage_io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageIo {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Maps a reqwest error, separating timeouts from other transport failures.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }
}

/// Convenience type alias.
pub type Result<T> = std::result::Result<T, Error>;
