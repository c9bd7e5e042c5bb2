// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Reconciliation and dispatch are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseProfileClient)

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domains::accounts::models::LinkedAccount;

// =============================================================================
// Profile Client Trait (Infrastructure - identity provider profile endpoint)
// =============================================================================

/// Failure modes of a provider profile fetch.
///
/// `NoSessionToken` and `Unreachable` are expected conditions (revoked grant,
/// network trouble) that callers defer on; `Malformed` means the provider
/// answered with something we cannot parse and must be surfaced to operators.
#[derive(Debug, Error)]
pub enum ProfileFetchError {
    #[error("linked account has no usable session token")]
    NoSessionToken,

    #[error("identity provider unreachable: {0}")]
    Unreachable(#[source] anyhow::Error),

    #[error("identity provider profile response could not be parsed: {0}")]
    Malformed(#[source] anyhow::Error),
}

#[async_trait]
pub trait BaseProfileClient: Send + Sync {
    /// Fetch the current provider profile for a linked account.
    ///
    /// Returns the raw profile JSON; the reconciler stores it verbatim as the
    /// account's cached provider data.
    async fn fetch_profile(&self, account: &LinkedAccount) -> Result<Value, ProfileFetchError>;
}

// =============================================================================
// Metrics Trait (Infrastructure - statsd-style counters)
// =============================================================================

pub trait BaseMetrics: Send + Sync {
    /// Increment a named counter by one
    fn incr(&self, name: &str);
}

// =============================================================================
// Error Reporter Trait (Infrastructure - anomaly/error sink)
// =============================================================================

pub trait BaseErrorReporter: Send + Sync {
    /// Report an anomaly that needs operator attention but is not an error value
    fn capture_message(&self, message: &str, context: &Value);

    /// Report an error with contextual state attached
    fn capture_error(&self, error: &dyn std::fmt::Display, context: &Value);
}
