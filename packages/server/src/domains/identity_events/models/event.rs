use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// Event-type URLs under the provider's event schema,
// https://schemas.accounts.firefox.com/event/
pub const PROFILE_CHANGE_EVENT: &str =
    "https://schemas.accounts.firefox.com/event/profile-change";
pub const SUBSCRIPTION_CHANGE_EVENT: &str =
    "https://schemas.accounts.firefox.com/event/subscription-state-change";
pub const DELETE_USER_EVENT: &str = "https://schemas.accounts.firefox.com/event/delete-user";
pub const PASSWORD_CHANGE_EVENT: &str =
    "https://schemas.accounts.firefox.com/event/password-change";

/// Event types that trigger a profile reconciliation
pub const PROFILE_EVENTS: [&str; 2] = [PROFILE_CHANGE_EVENT, SUBSCRIPTION_CHANGE_EVENT];

/// Event types that are known and intentionally unhandled
pub const IGNORED_EVENTS: [&str; 1] = [PASSWORD_CHANGE_EVENT];

/// Security Event Token (SET, RFC 8417) payload sent by the identity provider
/// to relying parties.
///
/// Immutable once parsed; instances are only produced by successful signature
/// verification in the authenticator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Issuer
    pub iss: String,
    /// Subject: the provider's user id
    pub sub: String,
    /// Audience: this service's registered client id
    pub aud: String,
    /// Creation time, unix timestamp
    pub iat: i64,
    /// Unique id for this SET
    pub jti: String,
    /// Event-type URL → event payload
    pub events: HashMap<String, Value>,
}

impl SecurityEvent {
    pub fn event_keys(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}
