//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::domains::auth::SessionTokenService;
use crate::domains::identity_events::{EventAuthenticator, KeySource};
use crate::kernel::RelayDeps;
use crate::server::middleware::session_auth_middleware;
use crate::server::routes::{events_handler, health_handler, profile_refresh_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: RelayDeps,
    pub authenticator: Arc<EventAuthenticator>,
    pub sessions: Arc<SessionTokenService>,
}

/// Build the Axum application router.
///
/// `key_source` and the trait objects inside `deps` are injected so tests can
/// run the full router against fakes.
pub fn build_app(
    deps: RelayDeps,
    key_source: Arc<dyn KeySource>,
    accounts_client_id: String,
    sessions: Arc<SessionTokenService>,
) -> Router {
    let authenticator = Arc::new(EventAuthenticator::new(key_source, accounts_client_id));

    let app_state = AxumAppState {
        deps,
        authenticator,
        sessions: sessions.clone(),
    };

    Router::new()
        // Relying-party webhook (authenticates itself via the bearer SET)
        .route("/events", post(events_handler))
        // First-party API
        .route("/accounts/profile/refresh", get(profile_refresh_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            session_auth_middleware(sessions.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
