use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// EmailAddress model - SQL persistence layer
///
/// The email-identity record kept alongside `users.email`; reconciliation
/// updates the first record for the user, creating one if absent.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EmailAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl EmailAddress {
    /// First email identity for a user, oldest first (reconciliation-transaction scoped)
    pub async fn find_first_for_user(
        user_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM email_addresses WHERE user_id = $1 ORDER BY created_at, id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Into::into)
    }

    /// All email identities for a user
    pub async fn find_by_user_id(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM email_addresses WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Update the email on an existing identity record (reconciliation-transaction scoped)
    pub async fn set_email(id: Uuid, email: &str, conn: &mut PgConnection) -> Result<()> {
        sqlx::query("UPDATE email_addresses SET email = $2 WHERE id = $1")
            .bind(id)
            .bind(email)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Insert a new identity record (reconciliation-transaction scoped)
    pub async fn create(user_id: Uuid, email: &str, conn: &mut PgConnection) -> Result<()> {
        sqlx::query("INSERT INTO email_addresses (user_id, email) VALUES ($1, $2)")
            .bind(user_id)
            .bind(email)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
