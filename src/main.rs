use care_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRoleDirectory, RoleDirectoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Initializes configuration, logging and the Postgres pool, then serves the gate.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise local-friendly defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "care_portal=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(
        "Application starting in {:?} mode (unresolved role policy: {:?})",
        config.env,
        config.unresolved_role_policy
    );

    // 3. Role directory (Postgres, read-only)
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let roles = Arc::new(PostgresRoleDirectory::new(pool)) as RoleDirectoryState;

    // 4. Router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(roles, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "HTTP server terminated");
    }
}
