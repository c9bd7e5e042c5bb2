use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Profile model - SQL persistence layer
///
/// Subscription state owned by a user. The premium/phone flags themselves are
/// derived from the linked account's cached provider data; this row carries
/// the dates that depend on transition *direction*, so they are only written
/// inside reconciliation transactions.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date_subscribed: Option<DateTime<Utc>>,
    pub date_subscribed_phone: Option<DateTime<Utc>>,
    pub date_phone_subscription_reset: Option<DateTime<Utc>>,
    /// Progress through first-run onboarding, stepped by the front-end
    pub onboarding_state: i32,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Find the profile owned by a user
    pub async fn find_by_user_id(user_id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a new profile for a user
    pub async fn create(user_id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("INSERT INTO profiles (user_id) VALUES ($1) RETURNING *")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Record the premium subscription start (off→on transition only)
    pub async fn set_date_subscribed(
        user_id: Uuid,
        at: DateTime<Utc>,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query("UPDATE profiles SET date_subscribed = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(at)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Record the phone subscription start and reset dates (off→on transition only)
    pub async fn set_phone_subscription_dates(
        user_id: Uuid,
        at: DateTime<Utc>,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE profiles
             SET date_subscribed_phone = $2, date_phone_subscription_reset = $2
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
