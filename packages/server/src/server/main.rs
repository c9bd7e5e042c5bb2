// Main entry point for the relay identity-events server

use std::sync::Arc;

use anyhow::{Context, Result};
use relay_core::common::SubscriptionPlans;
use relay_core::domains::auth::SessionTokenService;
use relay_core::domains::identity_events::VerifyingKeyCache;
use relay_core::kernel::{AccountsProfileClient, RelayDeps, TracingMetrics, TracingReporter};
use relay_core::server::build_app;
use relay_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relay_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting relay identity-events server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Assemble dependencies
    let deps = RelayDeps::new(
        pool,
        Arc::new(AccountsProfileClient::new(config.accounts_profile_url.clone())),
        Arc::new(TracingMetrics),
        Arc::new(TracingReporter),
        SubscriptionPlans::new(
            config.subscriptions_with_premium.clone(),
            config.subscriptions_with_phone.clone(),
        ),
    );
    let key_source = Arc::new(VerifyingKeyCache::new(&config.accounts_oauth_endpoint));
    let sessions = Arc::new(SessionTokenService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
    ));

    // Build application
    let app = build_app(deps, key_source, config.accounts_client_id.clone(), sessions);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Webhook endpoint: http://localhost:{}/events", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
