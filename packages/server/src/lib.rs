//! Relay identity-events service.
//!
//! Receives Security Event Tokens (SETs) from the accounts identity provider
//! on a webhook, verifies them against the provider's published JWKS, and
//! reconciles local account, profile, and alias state.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::Config;
