//! Role lookup and the admin gate.
//!
//! Both checks are fail-closed: a missing row and a failed query are the same
//! `Unresolved` outcome, and nothing here returns an error the caller must handle
//! beyond the `AccessError` verdict.

use uuid::Uuid;

use crate::{
    auth::RequestContext,
    error::AccessError,
    models::{Role, RoleName},
    repository::RoleDirectory,
};

/// RoleResolution
///
/// Result of [`lookup_role`]. `Unresolved` deliberately hides whether the row was absent
/// or the query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleResolution {
    Resolved(Role),
    Unresolved,
}

impl RoleResolution {
    pub fn role(&self) -> Option<&Role> {
        match self {
            RoleResolution::Resolved(role) => Some(role),
            RoleResolution::Unresolved => None,
        }
    }

    /// The resolved role if its name is one the portal routes.
    pub fn known(&self) -> Option<RoleName> {
        self.role().and_then(|role| RoleName::from_name(&role.name))
    }
}

/// lookup_role
///
/// Two sequential point lookups: `user_roles` by user id, then `roles` by the returned
/// role id. Not cached and not retried.
pub async fn lookup_role(directory: &dyn RoleDirectory, user_id: Uuid) -> RoleResolution {
    let user_role = match directory.user_role(user_id).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            tracing::debug!(%user_id, "No user_roles row");
            return RoleResolution::Unresolved;
        }
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "user_roles lookup failed");
            return RoleResolution::Unresolved;
        }
    };

    match directory.role(user_role.role_id).await {
        Ok(Some(role)) => RoleResolution::Resolved(role),
        Ok(None) => {
            tracing::debug!(%user_id, role_id = user_role.role_id, "No roles row");
            RoleResolution::Unresolved
        }
        Err(e) => {
            tracing::warn!(%user_id, role_id = user_role.role_id, error = %e, "roles lookup failed");
            RoleResolution::Unresolved
        }
    }
}

/// authorize_admin
///
/// The single admin check shared by the page guard and `/api/check-admin`. Succeeds only
/// when the resolved role name equals `"Admin"` exactly.
pub async fn authorize_admin(
    ctx: &RequestContext,
    directory: &dyn RoleDirectory,
) -> Result<Role, AccessError> {
    let session = ctx.session().ok_or(AccessError::NoSession)?;

    match lookup_role(directory, session.user_id).await {
        RoleResolution::Resolved(role) if role.name == RoleName::PRIVILEGED.as_str() => Ok(role),
        RoleResolution::Resolved(role) => Err(AccessError::Forbidden { role: role.name }),
        RoleResolution::Unresolved => Err(AccessError::RoleUnresolved),
    }
}

/// is_admin
///
/// Boolean view of [`authorize_admin`]. Never fails; every denial is `false`.
pub async fn is_admin(ctx: &RequestContext, directory: &dyn RoleDirectory) -> bool {
    authorize_admin(ctx, directory).await.is_ok()
}
