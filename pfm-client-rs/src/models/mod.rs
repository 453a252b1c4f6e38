//! Data models for the MyBank PFM API.

pub mod auth;
pub mod envelope;
pub mod investment;
pub mod payment;
pub mod pfm;
