//! Profile refresh for session-authenticated users.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::accounts::models::LinkedAccount;
use crate::domains::identity_events::reconcile;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

/// `GET /accounts/profile/refresh`
///
/// Re-pulls the provider profile for the caller's own linked account and
/// reconciles local state, same as a webhook-triggered update.
pub async fn profile_refresh_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
) -> Response {
    let Some(Extension(user)) = auth else {
        return (StatusCode::UNAUTHORIZED, "401 Unauthorized").into_response();
    };

    let account = match LinkedAccount::find_by_user_id(user.user_id, &state.deps.db_pool).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, "no linked identity provider account")
                .into_response();
        }
        Err(error) => {
            state
                .deps
                .reporter
                .capture_error(&error, &json!({ "user_id": user.user_id.to_string() }));
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    match reconcile(&account, &state.deps, None, None).await {
        Ok(_) => Json(json!({})).into_response(),
        Err(error) => {
            state
                .deps
                .reporter
                .capture_error(&error, &json!({ "uid": account.uid }));
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
