//! Profile reconciliation: pull the provider's current profile for a linked
//! account and apply it to local state in one transaction.

use chrono::Utc;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::common::sha256_hex;
use crate::domains::accounts::models::{EmailAddress, LinkedAccount, Profile, User};
use crate::kernel::deps::RelayDeps;
use crate::kernel::traits::ProfileFetchError;

use super::models::event::SecurityEvent;

/// Result of a reconciliation attempt, as seen by the webhook caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Local state now matches the provider profile
    Accepted,
    /// The update hit a uniqueness constraint; nothing was changed
    Conflict,
    /// The provider could not be consulted right now; it will re-deliver
    Deferred,
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The provider answered with something unparseable; operators need to see this
    #[error("identity provider profile response could not be parsed: {0}")]
    MalformedProfile(#[source] anyhow::Error),

    #[error("profile reconciliation failed: {0}")]
    Update(#[source] anyhow::Error),
}

/// Fetch the provider profile for `account` and reconcile local state.
///
/// `authentic_event`/`event_key` are present when reconciliation was triggered
/// by a webhook event (used for logging only); the profile-refresh endpoint
/// passes `None`.
pub async fn reconcile(
    account: &LinkedAccount,
    deps: &RelayDeps,
    authentic_event: Option<&SecurityEvent>,
    event_key: Option<&str>,
) -> Result<ReconcileOutcome, ReconcileError> {
    let profile = match deps.profile_client.fetch_profile(account).await {
        Ok(profile) => profile,
        Err(error @ ProfileFetchError::Malformed(_)) => {
            return Err(ReconcileError::MalformedProfile(error.into()));
        }
        Err(error) => {
            // Revoked grants and unreachable providers are expected; the
            // provider re-delivers, so defer instead of raising.
            deps.reporter
                .capture_error(&error, &json!({ "uid": account.uid }));
            return Ok(ReconcileOutcome::Deferred);
        }
    };

    let Some(new_email) = profile.get("email").and_then(Value::as_str).map(str::to_owned)
    else {
        deps.reporter.capture_message(
            "identity provider profile response has no email field",
            &json!({ "uid": account.uid, "profile": profile }),
        );
        return Ok(ReconcileOutcome::Deferred);
    };

    if let (Some(event), Some(key)) = (authentic_event, event_key) {
        info!(
            uid = %event.sub,
            event_key = key,
            real_address = %sha256_hex(&new_email),
            "processing identity provider event"
        );
    }

    apply_update(account, &profile, &new_email, deps).await
}

/// Apply a fetched profile to local state.
///
/// The flag diffs, dates, email swap, and cached-data replacement commit
/// together or not at all.
async fn apply_update(
    account: &LinkedAccount,
    new_extra_data: &Value,
    new_email: &str,
    deps: &RelayDeps,
) -> Result<ReconcileOutcome, ReconcileError> {
    // Pre-transaction flags come from the previously cached provider data;
    // transition direction, not endpoint state, drives the side effects.
    let had_premium = deps.plans.has_premium(&account.extra_data);
    let had_phone = deps.plans.has_phone(&account.extra_data);

    match apply_update_tx(account, new_extra_data, new_email, had_premium, had_phone, deps).await {
        Ok(()) => Ok(ReconcileOutcome::Accepted),
        Err(error) if is_unique_violation(&error) => {
            deps.reporter.capture_error(
                &error,
                &json!({ "uid": account.uid, "real_address": sha256_hex(new_email) }),
            );
            Ok(ReconcileOutcome::Conflict)
        }
        Err(error) => Err(ReconcileError::Update(error)),
    }
}

async fn apply_update_tx(
    account: &LinkedAccount,
    new_extra_data: &Value,
    new_email: &str,
    had_premium: bool,
    had_phone: bool,
    deps: &RelayDeps,
) -> Result<(), anyhow::Error> {
    let mut tx = deps.db_pool.begin().await?;

    LinkedAccount::replace_extra_data(account.id, new_extra_data, &mut tx).await?;

    let now_premium = deps.plans.has_premium(new_extra_data);
    let now_phone = deps.plans.has_phone(new_extra_data);
    let now = Utc::now();

    if !had_premium && now_premium {
        Profile::set_date_subscribed(account.user_id, now, &mut tx).await?;
        deps.metrics.incr("user_purchased_premium");
    }
    if had_premium && !now_premium {
        deps.metrics.incr("user_has_downgraded");
    }

    if !had_phone && now_phone {
        Profile::set_phone_subscription_dates(account.user_id, now, &mut tx).await?;
        deps.metrics.incr("user_purchased_phone");
    }
    if had_phone && !now_phone {
        deps.metrics.incr("user_has_dropped_phone");
    }

    User::set_email(account.user_id, new_email, &mut tx).await?;
    match EmailAddress::find_first_for_user(account.user_id, &mut tx).await? {
        Some(record) => EmailAddress::set_email(record.id, new_email, &mut tx).await?,
        None => EmailAddress::create(account.user_id, new_email, &mut tx).await?,
    }

    tx.commit().await?;
    Ok(())
}

/// Postgres unique-constraint violation (SQLSTATE 23505)
fn is_unique_violation(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_error)) if db_error.code().as_deref() == Some("23505")
    )
}
