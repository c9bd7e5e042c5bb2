//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use relay_core::domains::accounts::models::{LinkedAccount, Profile, User};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a user with a profile and a linked provider account.
///
/// The cached provider data starts with the given subscriptions and an
/// access token, matching a healthy OAuth grant.
pub async fn create_linked_user(
    pool: &PgPool,
    email: &str,
    uid: &str,
    subscriptions: &[&str],
) -> Result<LinkedAccount> {
    let user = User::create(email, pool).await?;
    Profile::create(user.id, pool).await?;
    let extra_data = json!({
        "email": email,
        "subscriptions": subscriptions,
    });
    let account =
        LinkedAccount::create(user.id, uid, &extra_data, Some("oauth-access-token"), pool).await?;
    Ok(account)
}

/// Unique-enough values so shared-database tests do not collide.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

pub fn unique_uid(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
