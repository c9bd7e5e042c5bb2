use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base URL of the identity provider's OAuth server (JWKS lives at `<endpoint>/jwks`)
    pub accounts_oauth_endpoint: String,
    /// URL of the identity provider's profile endpoint
    pub accounts_profile_url: String,
    /// This service's registered OAuth client id (the `aud` of inbound SETs)
    pub accounts_client_id: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Provider subscription plan ids that grant the premium tier
    pub subscriptions_with_premium: Vec<String>,
    /// Provider subscription plan ids that grant the phone-masking tier
    pub subscriptions_with_phone: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            accounts_oauth_endpoint: env::var("ACCOUNTS_OAUTH_ENDPOINT")
                .unwrap_or_else(|_| "https://oauth.accounts.firefox.com/v1".to_string()),
            accounts_profile_url: env::var("ACCOUNTS_PROFILE_URL")
                .unwrap_or_else(|_| "https://profile.accounts.firefox.com/v1/profile".to_string()),
            accounts_client_id: env::var("ACCOUNTS_CLIENT_ID")
                .context("ACCOUNTS_CLIENT_ID must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "relay-server".to_string()),
            subscriptions_with_premium: csv_env("SUBSCRIPTIONS_WITH_PREMIUM"),
            subscriptions_with_phone: csv_env("SUBSCRIPTIONS_WITH_PHONE"),
        })
    }
}

/// Parse a comma-separated environment variable into a list, dropping blanks
fn csv_env(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_env_splits_and_trims() {
        env::set_var("TEST_CSV_ENV_PLANS", "plan_a, plan_b ,,plan_c");
        assert_eq!(csv_env("TEST_CSV_ENV_PLANS"), vec!["plan_a", "plan_b", "plan_c"]);
        env::remove_var("TEST_CSV_ENV_PLANS");
    }

    #[test]
    fn test_csv_env_missing_is_empty() {
        assert!(csv_env("TEST_CSV_ENV_MISSING").is_empty());
    }
}
