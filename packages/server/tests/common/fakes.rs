//! Fake collaborators for driving reconciliation and dispatch in tests.

use async_trait::async_trait;
use relay_core::domains::accounts::models::LinkedAccount;
use relay_core::domains::identity_events::{KeySource, VerifyingKey};
use relay_core::kernel::{BaseErrorReporter, BaseMetrics, BaseProfileClient, ProfileFetchError};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// =============================================================================
// Profile client
// =============================================================================

/// What the fake provider answers with on each fetch.
#[derive(Debug, Clone)]
pub enum FakeProfileResponse {
    Profile(Value),
    NoToken,
    Unreachable,
    Malformed,
}

pub struct FakeProfileClient {
    response: Mutex<FakeProfileResponse>,
    pub calls: AtomicUsize,
}

impl FakeProfileClient {
    pub fn new(response: FakeProfileResponse) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(profile: Value) -> Self {
        Self::new(FakeProfileResponse::Profile(profile))
    }

    pub fn set_response(&self, response: FakeProfileResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseProfileClient for FakeProfileClient {
    async fn fetch_profile(&self, _account: &LinkedAccount) -> Result<Value, ProfileFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.response.lock().unwrap().clone() {
            FakeProfileResponse::Profile(profile) => Ok(profile),
            FakeProfileResponse::NoToken => Err(ProfileFetchError::NoSessionToken),
            FakeProfileResponse::Unreachable => Err(ProfileFetchError::Unreachable(
                anyhow::anyhow!("connection refused"),
            )),
            FakeProfileResponse::Malformed => Err(ProfileFetchError::Malformed(anyhow::anyhow!(
                "not json"
            ))),
        }
    }
}

// =============================================================================
// Metrics
// =============================================================================

#[derive(Default)]
pub struct RecordingMetrics {
    counters: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a counter was incremented
    pub fn count(&self, name: &str) -> usize {
        self.counters
            .lock()
            .unwrap()
            .iter()
            .filter(|counter| counter.as_str() == name)
            .count()
    }
}

impl BaseMetrics for RecordingMetrics {
    fn incr(&self, name: &str) {
        self.counters.lock().unwrap().push(name.to_string());
    }
}

// =============================================================================
// Error reporter
// =============================================================================

#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl BaseErrorReporter for RecordingReporter {
    fn capture_message(&self, message: &str, _context: &Value) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn capture_error(&self, error: &dyn std::fmt::Display, _context: &Value) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

// =============================================================================
// Key source
// =============================================================================

/// Serves fixed key sets and counts forced refreshes.
pub struct StaticKeySource {
    cached: Vec<VerifyingKey>,
    refreshed: Vec<VerifyingKey>,
    pub refresh_calls: AtomicUsize,
}

impl StaticKeySource {
    pub fn new(cached: Vec<VerifyingKey>, refreshed: Vec<VerifyingKey>) -> Self {
        Self {
            cached,
            refreshed,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn serving(keys: Vec<VerifyingKey>) -> Self {
        Self::new(keys.clone(), keys)
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn current(&self) -> Vec<VerifyingKey> {
        self.cached.clone()
    }

    async fn force_refresh(&self) -> Vec<VerifyingKey> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refreshed.clone()
    }
}
