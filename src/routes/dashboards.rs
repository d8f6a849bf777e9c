use crate::{AppState, auth::RequestContext, classifier::DASHBOARD_ROOT, handlers, models::RoleName};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// One dashboard per non-admin role at `/<prefix>/dashboard`, plus the generic root the
/// gate dispatches from. The admin dashboard lives in the admin module behind its guard.
pub fn dashboard_routes() -> Router<AppState> {
    let router = Router::new().route(DASHBOARD_ROOT, get(handlers::dashboard_root));

    RoleName::ALL
        .into_iter()
        .filter(|role| *role != RoleName::PRIVILEGED)
        .fold(router, |router, role| {
            router.route(
                &role.dashboard_path(),
                get(move |ctx: RequestContext| handlers::role_dashboard(role, ctx)),
            )
        })
}
