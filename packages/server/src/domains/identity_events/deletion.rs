//! Account deletion triggered by a delete-user security event.

use anyhow::Result;
use tracing::info;

use crate::domains::accounts::models::{LinkedAccount, User};
use crate::domains::aliases::models::{DomainAddress, RelayAddress};
use crate::kernel::deps::RelayDeps;

use super::models::event::SecurityEvent;

/// Remove every alias owned by the subject's local user, then the user.
///
/// Aliases are deleted one at a time, not in bulk: each `delete` writes the
/// alias's archival record, and a bulk delete would skip them. Runs only
/// after the event has been authenticated.
pub async fn handle_account_delete(
    event: &SecurityEvent,
    account: &LinkedAccount,
    event_key: &str,
    deps: &RelayDeps,
) -> Result<()> {
    for address in RelayAddress::find_by_user(account.user_id, &deps.db_pool).await? {
        address.delete(&deps.db_pool).await?;
    }
    for address in DomainAddress::find_by_user(account.user_id, &deps.db_pool).await? {
        address.delete(&deps.db_pool).await?;
    }

    User::delete(account.user_id, &deps.db_pool).await?;

    info!(
        uid = %event.sub,
        event_key,
        "deleted user and alias resources for identity provider event"
    );
    Ok(())
}
