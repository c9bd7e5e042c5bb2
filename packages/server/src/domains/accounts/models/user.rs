use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// User model - SQL persistence layer
///
/// Owns exactly one Profile and at most one LinkedAccount per provider.
/// `email` mirrors the identity provider's primary email and is swapped
/// during reconciliation.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Find user by ID, tolerating absence
    pub async fn find_optional(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a new user
    pub async fn create(email: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("INSERT INTO users (email) VALUES ($1) RETURNING *")
            .bind(email)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Set the user's primary email (reconciliation-transaction scoped)
    pub async fn set_email(id: Uuid, email: &str, conn: &mut PgConnection) -> Result<()> {
        sqlx::query("UPDATE users SET email = $2 WHERE id = $1")
            .bind(id)
            .bind(email)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Delete the user row.
    ///
    /// Profile, linked account, and email identities cascade; alias resources
    /// must already have been deleted one at a time so their archival hooks
    /// fired.
    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
