//! Server dependencies for domain logic (using traits for testability)
//!
//! This module provides the central dependency container handed to the webhook
//! dispatch and reconciliation code. All external services use trait
//! abstractions so tests can inject fakes.

use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::common::SubscriptionPlans;
use crate::kernel::traits::{BaseErrorReporter, BaseMetrics, BaseProfileClient};

// =============================================================================
// RelayDeps
// =============================================================================

/// Dependencies accessible to event dispatch and reconciliation
#[derive(Clone)]
pub struct RelayDeps {
    pub db_pool: PgPool,
    /// Identity provider profile endpoint client
    pub profile_client: Arc<dyn BaseProfileClient>,
    pub metrics: Arc<dyn BaseMetrics>,
    pub reporter: Arc<dyn BaseErrorReporter>,
    /// Plan ids that map provider subscriptions onto local tiers
    pub plans: SubscriptionPlans,
}

impl RelayDeps {
    pub fn new(
        db_pool: PgPool,
        profile_client: Arc<dyn BaseProfileClient>,
        metrics: Arc<dyn BaseMetrics>,
        reporter: Arc<dyn BaseErrorReporter>,
        plans: SubscriptionPlans,
    ) -> Self {
        Self {
            db_pool,
            profile_client,
            metrics,
            reporter,
            plans,
        }
    }
}

// =============================================================================
// Tracing-backed defaults (implement the kernel traits)
// =============================================================================

/// Counter emission via structured log events under the `metrics` target
pub struct TracingMetrics;

impl BaseMetrics for TracingMetrics {
    fn incr(&self, name: &str) {
        tracing::info!(target: "metrics", counter = name, value = 1);
    }
}

/// Error sink that logs under the `events` target.
///
/// Deployments with an external error tracker swap this for an adapter; the
/// domain code only sees the trait.
pub struct TracingReporter;

impl BaseErrorReporter for TracingReporter {
    fn capture_message(&self, message: &str, context: &Value) {
        tracing::error!(target: "events", context = %context, "{}", message);
    }

    fn capture_error(&self, error: &dyn std::fmt::Display, context: &Value) {
        tracing::error!(target: "events", error = %error, context = %context, "captured error");
    }
}
