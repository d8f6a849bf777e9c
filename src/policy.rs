//! Redirect policy evaluated once per request, before any handler runs.

use crate::{
    access::lookup_role,
    auth::RequestContext,
    classifier::{LOGIN_PATH, classify, is_dashboard_root, is_excluded},
    config::UnresolvedRolePolicy,
    models::RoleName,
    repository::RoleDirectory,
};

/// Decision
///
/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Carries the originally requested path so login can send the user back.
    RedirectLogin(String),
    RedirectRoleDashboard(RoleName),
    /// Signed-in user at the dashboard root whose role cannot be resolved.
    Deny,
}

/// `/login?redirect=<original>` with the original path percent-encoded.
pub fn login_location(original: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, urlencoding::encode(original))
}

/// evaluate
///
/// * excluded or unprotected path: `Allow`, whatever the session;
/// * protected path without a session: `RedirectLogin`;
/// * dashboard root with a session: dispatch on the resolved role, or apply
///   `unresolved` when the role is missing or not one the portal routes;
/// * anything else: `Allow`.
pub async fn evaluate(
    path: &str,
    ctx: &RequestContext,
    directory: &dyn RoleDirectory,
    unresolved: UnresolvedRolePolicy,
) -> Decision {
    if is_excluded(path) {
        return Decision::Allow;
    }

    let Some(session) = ctx.session() else {
        return if classify(path).is_protected() {
            Decision::RedirectLogin(path.to_string())
        } else {
            Decision::Allow
        };
    };

    if !is_dashboard_root(path) {
        return Decision::Allow;
    }

    let resolution = lookup_role(directory, session.user_id).await;
    match resolution.known() {
        Some(role) => Decision::RedirectRoleDashboard(role),
        None => {
            tracing::warn!(
                user_id = %session.user_id,
                role = ?resolution.role().map(|r| r.name.as_str()),
                policy = ?unresolved,
                "Dashboard root requested without a routable role"
            );
            match unresolved {
                UnresolvedRolePolicy::Deny => Decision::Deny,
                UnresolvedRolePolicy::Allow => Decision::Allow,
            }
        }
    }
}
