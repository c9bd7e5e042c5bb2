//! Fan-out of a verified security event to the reconciler and deletion
//! handler, and the merge of per-key outcomes into one response.

use anyhow::Result;
use serde_json::json;

use crate::kernel::deps::RelayDeps;

use crate::domains::accounts::models::LinkedAccount;

use super::deletion::handle_account_delete;
use super::models::event::{SecurityEvent, DELETE_USER_EVENT, IGNORED_EVENTS, PROFILE_EVENTS};
use super::reconciler::{reconcile, ReconcileOutcome};

/// What the webhook should answer after all event keys are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every key was processed and nothing needs a retry signal (200)
    FullyProcessed,
    /// Accepted but nothing actionable, or the provider should re-deliver later (202)
    NothingToRetry,
    /// A reconciliation hit a uniqueness conflict (409)
    Conflicted,
}

/// Per-event-key result, before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Reconciled(ReconcileOutcome),
    Deleted,
    Ignored,
    Unknown,
}

/// Handle every event-type key in a verified SET.
///
/// Unknown subjects and unknown event types are non-fatal: the provider must
/// not retry either, so both end up as `NothingToRetry`.
pub async fn dispatch_event(event: &SecurityEvent, deps: &RelayDeps) -> Result<DispatchOutcome> {
    let Some(account) = LinkedAccount::find_by_uid(&event.sub, &deps.db_pool).await? else {
        // No local account for this subject; answering an error would make
        // the provider re-deliver forever.
        return Ok(DispatchOutcome::NothingToRetry);
    };

    let mut outcomes = Vec::with_capacity(event.events.len());
    for event_key in event.event_keys() {
        if PROFILE_EVENTS.contains(&event_key) {
            let outcome = reconcile(&account, deps, Some(event), Some(event_key)).await?;
            outcomes.push(KeyOutcome::Reconciled(outcome));
        } else if event_key == DELETE_USER_EVENT {
            handle_account_delete(event, &account, event_key, deps).await?;
            outcomes.push(KeyOutcome::Deleted);
        } else if IGNORED_EVENTS.contains(&event_key) {
            // password-change: known and intentionally unhandled
            outcomes.push(KeyOutcome::Ignored);
        } else {
            deps.reporter.capture_message(
                &format!("unknown event key {}", event_key),
                &json!({ "uid": event.sub, "jti": event.jti }),
            );
            deps.metrics.incr("unknown_event_key");
            outcomes.push(KeyOutcome::Unknown);
        }
    }

    Ok(merge_outcomes(&outcomes))
}

fn merge_outcomes(outcomes: &[KeyOutcome]) -> DispatchOutcome {
    if outcomes
        .iter()
        .any(|outcome| *outcome == KeyOutcome::Reconciled(ReconcileOutcome::Conflict))
    {
        return DispatchOutcome::Conflicted;
    }
    if outcomes
        .iter()
        .any(|outcome| *outcome == KeyOutcome::Reconciled(ReconcileOutcome::Deferred))
    {
        return DispatchOutcome::NothingToRetry;
    }
    let processed_any = outcomes.iter().any(|outcome| {
        matches!(
            outcome,
            KeyOutcome::Reconciled(ReconcileOutcome::Accepted) | KeyOutcome::Deleted
        )
    });
    if processed_any {
        DispatchOutcome::FullyProcessed
    } else {
        DispatchOutcome::NothingToRetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_accepted_is_fully_processed() {
        let outcomes = [
            KeyOutcome::Reconciled(ReconcileOutcome::Accepted),
            KeyOutcome::Deleted,
        ];
        assert_eq!(merge_outcomes(&outcomes), DispatchOutcome::FullyProcessed);
    }

    #[test]
    fn test_conflict_wins_over_everything() {
        let outcomes = [
            KeyOutcome::Reconciled(ReconcileOutcome::Accepted),
            KeyOutcome::Reconciled(ReconcileOutcome::Conflict),
            KeyOutcome::Reconciled(ReconcileOutcome::Deferred),
        ];
        assert_eq!(merge_outcomes(&outcomes), DispatchOutcome::Conflicted);
    }

    #[test]
    fn test_deferred_downgrades_to_retry_later() {
        let outcomes = [
            KeyOutcome::Reconciled(ReconcileOutcome::Accepted),
            KeyOutcome::Reconciled(ReconcileOutcome::Deferred),
        ];
        assert_eq!(merge_outcomes(&outcomes), DispatchOutcome::NothingToRetry);
    }

    #[test]
    fn test_only_ignored_or_unknown_keys() {
        assert_eq!(
            merge_outcomes(&[KeyOutcome::Ignored]),
            DispatchOutcome::NothingToRetry
        );
        assert_eq!(
            merge_outcomes(&[KeyOutcome::Unknown, KeyOutcome::Ignored]),
            DispatchOutcome::NothingToRetry
        );
        assert_eq!(merge_outcomes(&[]), DispatchOutcome::NothingToRetry);
    }

    #[test]
    fn test_ignored_alongside_accepted_still_fully_processed() {
        let outcomes = [
            KeyOutcome::Ignored,
            KeyOutcome::Reconciled(ReconcileOutcome::Accepted),
        ];
        assert_eq!(merge_outcomes(&outcomes), DispatchOutcome::FullyProcessed);
    }
}
