use crate::models::{Role, UserRole};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// RepoError
///
/// Failure of a single directory query. Callers on the authorization path fold it into
/// "role unresolved"; only the debug-role endpoint shows its text.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// RoleDirectory Trait
///
/// Read-only access to the role tables owned by the managed backend. The gate never
/// writes through this trait.
///
/// **Send + Sync + async_trait** make `Arc<dyn RoleDirectory>` shareable across Axum's
/// task boundaries and replaceable by mocks in tests.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// The `user_roles` row for a user (0 or 1 rows).
    async fn user_role(&self, user_id: Uuid) -> Result<Option<UserRole>, RepoError>;
    /// The `roles` row for an id (0 or 1 rows).
    async fn role(&self, role_id: i32) -> Result<Option<Role>, RepoError>;
}

/// RoleDirectoryState
///
/// The concrete type used to share the directory across the application state.
pub type RoleDirectoryState = Arc<dyn RoleDirectory>;

/// PostgresRoleDirectory
///
/// `RoleDirectory` backed by the portal's Postgres database.
pub struct PostgresRoleDirectory {
    pool: PgPool,
}

impl PostgresRoleDirectory {
    /// Creates a new directory using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDirectory for PostgresRoleDirectory {
    async fn user_role(&self, user_id: Uuid) -> Result<Option<UserRole>, RepoError> {
        let row = sqlx::query_as::<_, UserRole>(
            "SELECT user_id, role_id FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn role(&self, role_id: i32) -> Result<Option<Role>, RepoError> {
        let row = sqlx::query_as::<_, Role>(
            "SELECT id, name, description FROM roles WHERE id = $1",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
