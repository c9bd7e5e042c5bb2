use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::sha256_hex;

/// RelayAddress model - SQL persistence layer
///
/// A random forwarding alias owned by a user.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RelayAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl RelayAddress {
    /// All relay aliases owned by a user
    pub async fn find_by_user(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM relay_addresses WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new relay alias
    pub async fn create(user_id: Uuid, address: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO relay_addresses (user_id, address) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(address)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete this alias, leaving an archival `deleted_addresses` record.
    ///
    /// Archival row and row delete commit together. Callers that remove many
    /// aliases must call this per alias rather than bulk-deleting, or the
    /// archival records are silently skipped.
    pub async fn delete(self, pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;
        sqlx::query("INSERT INTO deleted_addresses (address_hash) VALUES ($1)")
            .bind(sha256_hex(&self.address))
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM relay_addresses WHERE id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
