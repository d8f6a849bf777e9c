use crate::{
    AppState,
    access::authorize_admin,
    auth::RequestContext,
    classifier::DASHBOARD_ROOT,
    error::AccessError,
    models::{
        CheckAdminResponse, DashboardView, DebugRoleResponse, ErrorBody, LoginView, RoleName,
    },
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

// --- Query Structs ---

/// LoginParams
///
/// Query parameters of the login page. `redirect` is set by the request gate.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct LoginParams {
    /// Path the user originally requested.
    pub redirect: Option<String>,
}

// --- API Handlers ---

/// check_admin
///
/// [API Route] Tells a client whether the signed-in user holds the privileged role.
///
/// 200 with `isAdmin` whenever the check completes (a missing or unknown role is `false`),
/// 401 without a session.
#[utoipa::path(
    get,
    path = "/api/check-admin",
    responses(
        (status = 200, description = "Check completed", body = CheckAdminResponse),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 500, description = "Unexpected internal error", body = ErrorBody)
    )
)]
pub async fn check_admin(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<CheckAdminResponse>, AccessError> {
    let is_admin = match authorize_admin(&ctx, state.roles.as_ref()).await {
        Ok(_) => true,
        Err(AccessError::RoleUnresolved | AccessError::Forbidden { .. }) => false,
        Err(e) => return Err(e),
    };
    Ok(Json(CheckAdminResponse { is_admin }))
}

/// debug_role
///
/// [API Route, local only] Walks the role lookup step by step and reports every row and
/// error it meets. Not mounted in production.
#[utoipa::path(
    get,
    path = "/api/debug-role",
    responses(
        (status = 200, description = "Lookup trace", body = DebugRoleResponse),
        (status = 401, description = "No session", body = ErrorBody)
    )
)]
pub async fn debug_role(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<DebugRoleResponse>, AccessError> {
    let session = ctx.session().ok_or(AccessError::NoSession)?;

    let (user_role, user_role_error) = match state.roles.user_role(session.user_id).await {
        Ok(row) => (row, None),
        Err(e) => (None, Some(e.to_string())),
    };

    let (role, role_error) = match &user_role {
        Some(row) => match state.roles.role(row.role_id).await {
            Ok(role) => (role, None),
            Err(e) => (None, Some(e.to_string())),
        },
        None => (None, None),
    };

    let is_admin = role
        .as_ref()
        .is_some_and(|r| r.name == RoleName::PRIVILEGED.as_str());

    Ok(Json(DebugRoleResponse {
        user_id: session.user_id,
        email: session.email.clone(),
        user_role,
        user_role_error,
        role,
        role_error,
        is_admin,
    }))
}

// --- Page Handlers ---

/// login_page
///
/// [Public Route] The login page the gate redirects to. Echoes the return path.
#[utoipa::path(
    get,
    path = "/login",
    params(LoginParams),
    responses((status = 200, description = "Login page", body = LoginView))
)]
pub async fn login_page(Query(params): Query<LoginParams>) -> Json<LoginView> {
    Json(LoginView {
        page: "login".to_string(),
        redirect: params.redirect,
    })
}

/// role_dashboard
///
/// [Protected Route] Dashboard of a single role. The gate has already ensured a session.
pub async fn role_dashboard(role: RoleName, ctx: RequestContext) -> Json<DashboardView> {
    Json(DashboardView {
        page: "dashboard".to_string(),
        role: Some(role.as_str().to_string()),
        path: role.dashboard_path(),
        email: ctx.session().and_then(|s| s.email.clone()),
    })
}

/// dashboard_root
///
/// [Protected Route] Only reached when the gate lets a signed-in user without a routable
/// role through (`UnresolvedRolePolicy::Allow`).
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Bare dashboard", body = DashboardView),
        (status = 307, description = "Redirect to the role dashboard or to login"),
        (status = 403, description = "Role unresolved", body = ErrorBody)
    )
)]
pub async fn dashboard_root(ctx: RequestContext) -> Json<DashboardView> {
    Json(DashboardView {
        page: "dashboard".to_string(),
        role: None,
        path: DASHBOARD_ROOT.to_string(),
        email: ctx.session().and_then(|s| s.email.clone()),
    })
}

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "page": "home" }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}
