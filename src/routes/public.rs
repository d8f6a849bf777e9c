use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints outside every protected namespace. The request gate never redirects them,
/// whatever the session state.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /
        .route("/", get(handlers::home))
        // GET /login?redirect=...
        // Target of every login redirect issued by the gate and the admin guard.
        .route("/login", get(handlers::login_page))
}
