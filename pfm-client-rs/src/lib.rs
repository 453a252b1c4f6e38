//! # pfm-client
//!
//! Session-aware Rust client for the MyBank PFM API: asset aggregation,
//! spending analysis, transfers and round-up investing.
//!
//! The client keeps an access/refresh token pair in a [`CredentialStore`],
//! attaches the access token to every call, and on a 401 renews the session
//! once and retries. When renewal fails the session is purged and
//! [`SessionEvent::LoginRequired`] is broadcast to subscribers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pfm_client::models::auth::LoginRequest;
//! use pfm_client::storage::FileCredentialStore;
//! use pfm_client::{PfmClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = PfmClient::builder()
//!         .base_url("http://localhost:8080")
//!         .storage(Arc::new(FileCredentialStore::default_path()?))
//!         .build()
//!         .await?;
//!
//!     if !client.is_authenticated().await {
//!         client
//!             .auth()
//!             .login(&LoginRequest::new("user@example.com", "secret"))
//!             .await?;
//!     }
//!
//!     let spending = client.pfm().spending_analysis(Some(7)).await?;
//!     println!("spent {} over {}", spending.total_spending, spending.period);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `keyring` - Enable system keyring credential storage
//! - `full` - Enable all optional features

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod transport;

// Re-exports for ergonomic usage
pub use auth::{SessionEvent, SessionManager};
pub use client::{PfmClient, PfmClientBuilder};
pub use error::{Error, Result};
pub use models::envelope::{Envelope, ErrorDetail};
pub use storage::CredentialStore;
pub use transport::RequestOptions;
