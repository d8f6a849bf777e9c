use std::any::Any;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    access::authorize_admin,
    auth::RequestContext,
    classifier::{LOGIN_PATH, is_excluded},
    error::AccessError,
    policy::{Decision, evaluate, login_location},
};

/// route_gate
///
/// Global middleware run in front of every route and the fallback. Excluded paths pass
/// straight through. Otherwise the session is resolved once, the redirect policy is
/// evaluated, and on `Allow` the resolved [`RequestContext`] is stored in the request
/// extensions for downstream extractors.
pub async fn route_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    let ctx = RequestContext {
        session: state.sessions.resolve(request.headers()),
    };
    let decision = evaluate(
        &path,
        &ctx,
        state.roles.as_ref(),
        state.config.unresolved_role_policy,
    )
    .await;

    tracing::debug!(
        path = %path,
        authenticated = ctx.is_authenticated(),
        decision = ?decision,
        "Gate decision"
    );

    match decision {
        Decision::Allow => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Decision::RedirectLogin(original) => {
            Redirect::temporary(&login_location(&original)).into_response()
        }
        Decision::RedirectRoleDashboard(role) => {
            Redirect::temporary(&role.dashboard_path()).into_response()
        }
        Decision::Deny => AccessError::RoleUnresolved.into_response(),
    }
}

/// require_admin
///
/// Page-level guard for the admin area. Any failure of the admin gate (no session, no
/// role, wrong role) sends the browser to the login page.
pub async fn require_admin(
    State(state): State<AppState>,
    ctx: RequestContext,
    request: Request,
    next: Next,
) -> Response {
    match authorize_admin(&ctx, state.roles.as_ref()).await {
        Ok(_) => next.run(request).await,
        Err(e) => {
            tracing::info!(path = %request.uri().path(), reason = %e, "Admin page denied");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}

/// panic_response
///
/// Handler for `CatchPanicLayer`: the panic message is logged, never returned.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AccessError::Internal(detail).into_response()
}
