//! Provider verifying keys and the process-wide key cache.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;

/// JWKS fetches must never hang a webhook request
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One public key from the provider's published JWKS.
///
/// `n`/`e` are base64url-encoded RSA components; non-RSA entries leave them
/// unset and are skipped by the authenticator.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyingKey {
    #[serde(default)]
    pub kid: Option<String>,
    pub alg: String,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<VerifyingKey>,
}

/// Source of the provider's current verifying keys.
///
/// `current` may serve a cached set; `force_refresh` must bypass any cache.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn current(&self) -> Vec<VerifyingKey>;
    async fn force_refresh(&self) -> Vec<VerifyingKey>;
}

/// Process-wide cache of the provider's JWKS.
///
/// Lazily fetched on first use and kept until someone calls `force_refresh`
/// (the authenticator does, once, when no cached key verifies a token).
/// Refresh is not atomic: concurrent refreshes may fetch twice and the last
/// writer wins. That duplicates work but never serves a key that the provider
/// did not publish.
pub struct VerifyingKeyCache {
    client: reqwest::Client,
    jwks_url: String,
    keys: RwLock<Option<Vec<VerifyingKey>>>,
}

impl VerifyingKeyCache {
    pub fn new(oauth_endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid and should never fail");
        Self {
            client,
            jwks_url: format!("{}/jwks", oauth_endpoint.trim_end_matches('/')),
            keys: RwLock::new(None),
        }
    }

    /// Fetch the published key set.
    ///
    /// Any failure (unreachable endpoint, non-success status, unparseable
    /// body) yields an empty list; the authenticator treats an empty set as
    /// unverifiable, never as "no restriction".
    async fn fetch(&self) -> Vec<VerifyingKey> {
        match self.client.get(&self.jwks_url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<JwksResponse>().await {
                    Ok(body) => body.keys,
                    Err(error) => {
                        warn!(%error, url = %self.jwks_url, "failed to parse JWKS response");
                        Vec::new()
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), url = %self.jwks_url, "JWKS endpoint returned non-success");
                Vec::new()
            }
            Err(error) => {
                warn!(%error, url = %self.jwks_url, "JWKS fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl KeySource for VerifyingKeyCache {
    async fn current(&self) -> Vec<VerifyingKey> {
        {
            let cached = self.keys.read().await;
            if let Some(keys) = cached.as_ref() {
                return keys.clone();
            }
        }
        let fetched = self.fetch().await;
        *self.keys.write().await = Some(fetched.clone());
        fetched
    }

    async fn force_refresh(&self) -> Vec<VerifyingKey> {
        let fetched = self.fetch().await;
        *self.keys.write().await = Some(fetched.clone());
        fetched
    }
}
