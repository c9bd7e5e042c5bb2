use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Identity provider name for accounts links
pub const PROVIDER_ACCOUNTS: &str = "fxa";

/// LinkedAccount model - SQL persistence layer
///
/// A user's link to the external identity provider. `uid` is the provider's
/// subject id and identifies at most one local user. `extra_data` caches the
/// provider profile (email, subscriptions) as returned by the profile
/// endpoint; it is replaced wholesale during reconciliation.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LinkedAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub uid: String,
    pub extra_data: Value,
    pub access_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LinkedAccount {
    /// Find the account linked to a provider subject id
    pub async fn find_by_uid(uid: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM linked_accounts WHERE uid = $1 AND provider = $2",
        )
        .bind(uid)
        .bind(PROVIDER_ACCOUNTS)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Find a user's linked account
    pub async fn find_by_user_id(user_id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM linked_accounts WHERE user_id = $1 AND provider = $2",
        )
        .bind(user_id)
        .bind(PROVIDER_ACCOUNTS)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new link
    pub async fn create(
        user_id: Uuid,
        uid: &str,
        extra_data: &Value,
        access_token: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO linked_accounts (user_id, provider, uid, extra_data, access_token)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(PROVIDER_ACCOUNTS)
        .bind(uid)
        .bind(extra_data)
        .bind(access_token)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Replace the cached provider profile data (reconciliation-transaction scoped)
    pub async fn replace_extra_data(
        id: Uuid,
        extra_data: &Value,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query("UPDATE linked_accounts SET extra_data = $2 WHERE id = $1")
            .bind(id)
            .bind(extra_data)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
