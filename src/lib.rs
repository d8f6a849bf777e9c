use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Session resolution and the request-scoped context.
pub mod auth;
// Role lookup and the admin gate.
pub mod access;
pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod repository;

// Routing segregation (Public, API, Dashboards, Admin).
pub mod routes;
use routes::{admin, api, dashboards, public};

// --- Public Re-exports ---

pub use auth::{RequestContext, Session, SessionResolver, SessionResolverState};
pub use config::AppConfig;
pub use repository::{PostgresRoleDirectory, RoleDirectory, RoleDirectoryState};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::check_admin, handlers::debug_role, handlers::login_page,
        handlers::dashboard_root
    ),
    components(
        schemas(
            models::CheckAdminResponse, models::DebugRoleResponse, models::LoginView,
            models::DashboardView, models::ErrorBody, models::Role, models::UserRole,
        )
    ),
    tags(
        (name = "care-portal", description = "Healthcare portal access gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared by every request: the role directory, the
/// session resolver and the loaded configuration. Nothing in it is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Read-only access to `user_roles` / `roles`.
    pub roles: RoleDirectoryState,
    /// Verifies provider-issued access tokens.
    pub sessions: SessionResolverState,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the state, deriving the session resolver from the configuration.
    pub fn new(roles: RoleDirectoryState, config: AppConfig) -> Self {
        let sessions = std::sync::Arc::new(SessionResolver::from_config(&config));
        Self {
            roles,
            sessions,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RoleDirectoryState {
    fn from_ref(app_state: &AppState) -> RoleDirectoryState {
        app_state.roles.clone()
    }
}

impl FromRef<AppState> for SessionResolverState {
    fn from_ref(app_state: &AppState) -> SessionResolverState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, installs the request gate in front of every route
/// (fallback included), and applies the observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/api", api::api_routes(state.config.env))
        .merge(dashboards::dashboard_routes())
        .nest("/admin", admin::admin_routes(state.clone()))
        .fallback(handlers::not_found)
        .with_state(state.clone())
        // The gate wraps the fallback too, so unknown protected paths still redirect.
        .layer(axum::middleware::from_fn_with_state(state, middleware::route_gate));

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                // Innermost: a panicking handler becomes an opaque 500.
                .layer(CatchPanicLayer::custom(middleware::panic_response)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying method, uri and the `x-request-id` set above, so every
/// log line of a request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
