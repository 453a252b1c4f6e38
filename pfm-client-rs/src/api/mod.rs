//! Endpoint groups of the MyBank API.
//!
//! Each group borrows the [`crate::PfmClient`] and unwraps the response
//! envelope into the payload type.

pub mod auth;
pub mod investment;
pub mod payment;
pub mod pfm;

pub use auth::AuthApi;
pub use investment::InvestmentApi;
pub use payment::PaymentApi;
pub use pfm::PfmApi;
