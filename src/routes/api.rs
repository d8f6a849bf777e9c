use crate::{AppState, config::Env, handlers};
use axum::{Router, routing::get};

/// API Router Module
///
/// Nested under `/api`. The debug-role endpoint exposes lookup internals and is only
/// mounted in `Env::Local`.
pub fn api_routes(env: Env) -> Router<AppState> {
    let router = Router::new()
        // GET /api/check-admin
        // Client-initiated admin check: `{ "isAdmin": bool }`.
        .route("/check-admin", get(handlers::check_admin));

    match env {
        Env::Local => router.route("/debug-role", get(handlers::debug_role)),
        Env::Production => router,
    }
}
