use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ErrorBody;

/// AccessError
///
/// Outcomes of an authorization check that deny access. `NoSession`, `RoleUnresolved`
/// and `Forbidden` are expected and map to plain 401/403 answers (or to a redirect in the
/// page guard). `Internal` is logged server-side and surfaces as an opaque 500.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("no active session")]
    NoSession,
    /// Covers both "no row" and "query error" in `user_roles` / `roles`.
    #[error("role could not be resolved")]
    RoleUnresolved,
    #[error("role `{role}` is not privileged")]
    Forbidden { role: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::NoSession => StatusCode::UNAUTHORIZED,
            AccessError::RoleUnresolved | AccessError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AccessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AccessError::NoSession => "Unauthorized",
            AccessError::RoleUnresolved | AccessError::Forbidden { .. } => "Forbidden",
            AccessError::Internal(detail) => {
                tracing::error!(detail = %detail, "Unexpected internal error");
                "Internal server error"
            }
        };
        (
            status,
            Json(ErrorBody {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
