//! Reqwest client for the identity provider's profile endpoint.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::domains::accounts::models::LinkedAccount;
use crate::kernel::traits::{BaseProfileClient, ProfileFetchError};

/// Profile fetches must never hang a webhook request
const PROFILE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AccountsProfileClient {
    client: reqwest::Client,
    profile_url: String,
}

impl AccountsProfileClient {
    pub fn new(profile_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROFILE_FETCH_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid and should never fail");
        Self {
            client,
            profile_url,
        }
    }
}

#[async_trait]
impl BaseProfileClient for AccountsProfileClient {
    async fn fetch_profile(&self, account: &LinkedAccount) -> Result<Value, ProfileFetchError> {
        // A revoked or never-granted OAuth token shows up as an absent token
        let Some(token) = account.access_token.as_deref().filter(|t| !t.is_empty()) else {
            return Err(ProfileFetchError::NoSessionToken);
        };

        let response = self
            .client
            .get(&self.profile_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|error| ProfileFetchError::Unreachable(error.into()))?;

        let status = response.status();
        response.json::<Value>().await.map_err(|error| {
            if error.is_decode() {
                ProfileFetchError::Malformed(
                    anyhow::Error::new(error)
                        .context(format!("profile endpoint answered {}", status)),
                )
            } else {
                ProfileFetchError::Unreachable(error.into())
            }
        })
    }
}
