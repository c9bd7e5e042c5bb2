//! Security Event Token verification against the provider's JWKS.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use super::keys::{KeySource, VerifyingKey};
use super::models::event::SecurityEvent;

/// Allow `iat` to be slightly in the future, for clock skew
const IAT_LEEWAY_SECS: i64 = 5;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The key source produced zero keys; verification was never attempted
    #[error("identity provider verifying keys are not available")]
    NoVerifyingKeys,

    /// Keys exist but none is RS256-capable
    #[error("no RS256-capable verifying key in the provider key set")]
    NoUsableKey,

    /// Signature verified but the token claims to be from the future
    #[error("security event token issued-at is too far in the future")]
    ImmatureIssuedAt,

    /// No trusted key validated the signature/claims
    #[error("could not authenticate security event token: {0}")]
    Unverified(#[source] jsonwebtoken::errors::Error),
}

/// Verifies inbound SETs with a one-shot key-refresh retry.
///
/// Key rotation at the provider shows up as "no cached key verifies"; the
/// authenticator refreshes the key set exactly once and retries. A second
/// failure is treated as a malformed or forged token, not a transient
/// condition, and is never retried further.
pub struct EventAuthenticator {
    keys: Arc<dyn KeySource>,
    client_id: String,
}

impl EventAuthenticator {
    pub fn new(keys: Arc<dyn KeySource>, client_id: String) -> Self {
        Self { keys, client_id }
    }

    /// Verify a raw SET and return its decoded claims.
    pub async fn authenticate(&self, raw_token: &str) -> Result<SecurityEvent, AuthenticationError> {
        let keys = self.keys.current().await;
        match self.verify_with_keys(raw_token, &keys) {
            Ok(event) => Ok(event),
            // An empty key set fails immediately: it is never "no restriction",
            // and a refresh would race the same provider outage.
            Err(AuthenticationError::NoVerifyingKeys) => Err(AuthenticationError::NoVerifyingKeys),
            // Future-dated tokens are a clock problem, not a key problem.
            Err(AuthenticationError::ImmatureIssuedAt) => Err(AuthenticationError::ImmatureIssuedAt),
            Err(_) => {
                // Cached keys may predate a provider rotation; refetch once.
                let keys = self.keys.force_refresh().await;
                self.verify_with_keys(raw_token, &keys)
            }
        }
    }

    fn verify_with_keys(
        &self,
        raw_token: &str,
        keys: &[VerifyingKey],
    ) -> Result<SecurityEvent, AuthenticationError> {
        if keys.is_empty() {
            return Err(AuthenticationError::NoVerifyingKeys);
        }

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_required_spec_claims(&["aud"]);
        // SETs carry iat/jti, not exp
        validation.validate_exp = false;

        let mut last_error: Option<jsonwebtoken::errors::Error> = None;
        for key in keys.iter().filter(|key| key.alg == "RS256") {
            let (Some(n), Some(e)) = (key.n.as_deref(), key.e.as_deref()) else {
                continue;
            };
            let decoding_key = match DecodingKey::from_rsa_components(n, e) {
                Ok(decoding_key) => decoding_key,
                Err(error) => {
                    warn!(kid = ?key.kid, %error, "skipping malformed verifying key");
                    continue;
                }
            };
            match jsonwebtoken::decode::<SecurityEvent>(raw_token, &decoding_key, &validation) {
                Ok(data) => {
                    let now = Utc::now().timestamp();
                    if data.claims.iat > now + IAT_LEEWAY_SECS {
                        // Signature checked out; log the skew magnitude so
                        // provider clock drift is observable, then reject.
                        warn!(
                            iat = data.claims.iat,
                            iat_age_s = now - data.claims.iat,
                            "security event token issued-at is in the future"
                        );
                        return Err(AuthenticationError::ImmatureIssuedAt);
                    }
                    return Ok(data.claims);
                }
                Err(error) => last_error = Some(error),
            }
        }

        Err(match last_error {
            Some(error) => AuthenticationError::Unverified(error),
            None => AuthenticationError::NoUsableKey,
        })
    }
}
