//! MyBank PFM command-line dashboard.
//!
//! Thin front end over [`pfm_client`]: loads `pfm.toml` plus `PFM_*`
//! overrides, opens the configured session store and runs one subcommand.

pub mod commands;
pub mod config;
pub mod session;
