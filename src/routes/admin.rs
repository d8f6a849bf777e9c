use crate::{AppState, auth::RequestContext, handlers, middleware::require_admin, models::RoleName};
use axum::{Router, middleware, routing::get};

/// Admin Router Module
///
/// Nested under `/admin`. Every route here sits behind `require_admin`, which runs the
/// shared admin gate and redirects to `/login` on any failure. The request gate in front
/// has already redirected requests without a session.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // GET /admin/dashboard
        .route(
            "/dashboard",
            get(|ctx: RequestContext| handlers::role_dashboard(RoleName::Admin, ctx)),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
