use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripdesk_api::{app, AppState, AuthConfig};
use tripdesk_booking::BookingExecutor;
use tripdesk_core::WindowLimiter;
use tripdesk_store::{DbClient, PgBookingStore, PgCredentialStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tripdesk_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Tripdesk API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let http = tripdesk_providers::http_client(Duration::from_secs(
        config.providers.http_timeout_seconds,
    ))
    .expect("Failed to build HTTP client");

    let registry = tripdesk_providers::default_registry(
        http,
        config.providers.amadeus_base_url.clone(),
        config.providers.duffel_base_url.clone(),
    );

    let limiter = Arc::new(WindowLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_seconds),
    ));

    let executor = Arc::new(BookingExecutor::new(
        registry,
        Arc::new(PgCredentialStore::new(db.pool.clone())),
        Arc::new(PgBookingStore::new(db.pool.clone())),
        limiter,
        config.providers.environment,
    ));

    let app_state = AppState {
        executor,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
