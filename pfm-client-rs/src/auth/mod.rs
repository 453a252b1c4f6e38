//! Session state and renewal.
//!
//! [`SessionManager`] owns the current credential pair, writes it through to a
//! [`crate::storage::CredentialStore`], and renews it on behalf of the
//! transport when a request is rejected with 401.

pub mod events;
pub mod manager;
pub mod renewal;

pub use events::SessionEvent;
pub use manager::SessionManager;
