//! Inbound relying-party webhook for identity provider security events.

use axum::{
    extract::Extension,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::domains::identity_events::{dispatch_event, DispatchOutcome};
use crate::server::app::AxumAppState;

/// `POST /events`
///
/// The bearer token is the SET itself; the body is provider-specific and not
/// verified beyond the JWT. Response statuses tell the provider whether to
/// retry: 401 unauthenticated, 409 conflict, 202 accepted-nothing-to-retry,
/// 200 fully processed.
pub async fn events_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(raw_token) = bearer_token(&headers) else {
        return unauthorized();
    };

    let event = match state.authenticator.authenticate(raw_token).await {
        Ok(event) => event,
        Err(error) => {
            warn!(%error, "rejected relying-party event");
            return unauthorized();
        }
    };

    match dispatch_event(&event, &state.deps).await {
        Ok(DispatchOutcome::FullyProcessed) => (StatusCode::OK, "200 OK").into_response(),
        Ok(DispatchOutcome::NothingToRetry) => {
            (StatusCode::ACCEPTED, "202 Accepted").into_response()
        }
        Ok(DispatchOutcome::Conflicted) => (StatusCode::CONFLICT, "Conflict").into_response(),
        Err(error) => {
            state.deps.reporter.capture_error(
                &error,
                &json!({ "sub": event.sub, "jti": event.jti, "body": body }),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        "401 Unauthorized",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Token abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
