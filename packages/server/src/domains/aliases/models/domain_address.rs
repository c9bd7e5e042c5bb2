use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::sha256_hex;

/// DomainAddress model - SQL persistence layer
///
/// A forwarding alias on the user's own subdomain (premium feature).
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DomainAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl DomainAddress {
    /// All domain aliases owned by a user
    pub async fn find_by_user(user_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM domain_addresses WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new domain alias
    pub async fn create(user_id: Uuid, address: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO domain_addresses (user_id, address) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(address)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete this alias, leaving an archival `deleted_addresses` record.
    pub async fn delete(self, pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;
        sqlx::query("INSERT INTO deleted_addresses (address_hash) VALUES ($1)")
            .bind(sha256_hex(&self.address))
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM domain_addresses WHERE id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
