use crate::domains::auth::SessionTokenService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Authenticated user information from a session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Session authentication middleware
///
/// Extracts the session token from the Authorization header, verifies it, and
/// adds AuthUser to request extensions. If no token or invalid token, the
/// request continues without AuthUser (public access).
pub async fn session_auth_middleware(
    sessions: Arc<SessionTokenService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &sessions);

    if let Some(user) = auth_user {
        debug!("Authenticated user: {}", user.user_id);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid session token");
    }

    next.run(request).await
}

/// Extract and verify a session token from the request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    sessions: &SessionTokenService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = sessions.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_with_bearer() {
        let sessions = SessionTokenService::new("test_secret", "test_issuer".to_string());
        let user_id = Uuid::new_v4();
        let token = sessions.create_token(user_id).unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &sessions);
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let sessions = SessionTokenService::new("test_secret", "test_issuer".to_string());
        let user_id = Uuid::new_v4();
        let token = sessions.create_token(user_id).unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &sessions);
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[test]
    fn test_no_auth_header() {
        let sessions = SessionTokenService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &sessions).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let sessions = SessionTokenService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &sessions).is_none());
    }
}
