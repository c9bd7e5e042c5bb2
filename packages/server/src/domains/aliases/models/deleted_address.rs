use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// DeletedAddress model - SQL persistence layer
///
/// Archival record written when an alias is deleted; keeps a hash of the full
/// address so a deleted alias can never be reissued, without retaining the
/// address itself.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DeletedAddress {
    pub id: Uuid,
    pub address_hash: String,
    pub deleted_at: DateTime<Utc>,
}

impl DeletedAddress {
    /// Whether an archival record exists for the given hash
    pub async fn exists(address_hash: &str, pool: &PgPool) -> Result<bool> {
        let row: Option<Self> = sqlx::query_as::<_, Self>(
            "SELECT * FROM deleted_addresses WHERE address_hash = $1 LIMIT 1",
        )
        .bind(address_hash)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// Count all archival records
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deleted_addresses")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
