#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use care_portal::{
    AppState,
    auth::Claims,
    config::{AppConfig, Env},
    models::{Role, RoleName, UserRole},
    repository::{RepoError, RoleDirectory},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
pub const TEST_AUDIENCE: &str = "authenticated";

// --- Mock Role Directory ---

/// In-memory `RoleDirectory` with switchable failures and call counters.
#[derive(Default)]
pub struct MockRoleDirectory {
    pub user_roles: HashMap<Uuid, UserRole>,
    pub roles: HashMap<i32, Role>,
    pub fail_user_roles: bool,
    pub fail_roles: bool,
    pub user_role_calls: AtomicUsize,
    pub role_calls: AtomicUsize,
}

impl MockRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every role of the fixed table, with ids 1..=10 in table order.
    pub fn seeded() -> Self {
        RoleName::ALL
            .into_iter()
            .enumerate()
            .fold(Self::new(), |dir, (i, role)| dir.with_role(i as i32 + 1, role.as_str()))
    }

    pub fn with_role(mut self, id: i32, name: &str) -> Self {
        self.roles.insert(
            id,
            Role {
                id,
                name: name.to_string(),
                description: None,
            },
        );
        self
    }

    pub fn assign(mut self, user_id: Uuid, role_id: i32) -> Self {
        self.user_roles.insert(user_id, UserRole { user_id, role_id });
        self
    }

    pub fn failing_user_roles(mut self) -> Self {
        self.fail_user_roles = true;
        self
    }

    pub fn failing_roles(mut self) -> Self {
        self.fail_roles = true;
        self
    }

    pub fn lookups(&self) -> (usize, usize) {
        (
            self.user_role_calls.load(Ordering::SeqCst),
            self.role_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl RoleDirectory for MockRoleDirectory {
    async fn user_role(&self, user_id: Uuid) -> Result<Option<UserRole>, RepoError> {
        self.user_role_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_user_roles {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.user_roles.get(&user_id).cloned())
    }

    async fn role(&self, role_id: i32) -> Result<Option<Role>, RepoError> {
        self.role_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_roles {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.roles.get(&role_id).cloned())
    }
}

// --- Tokens ---

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Mints a provider-style HS256 access token expiring `exp_offset` seconds from now.
pub fn mint_token(user_id: Uuid, email: Option<&str>, exp_offset: i64, secret: &str, aud: &str) -> String {
    let now = now_secs();
    let claims = Claims {
        sub: user_id,
        email: email.map(str::to_string),
        aud: aud.to_string(),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
        user_metadata: serde_json::json!({ "full_name": "Test User" }),
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// A valid one-hour token signed with the test secret.
pub fn token_for(user_id: Uuid) -> String {
    mint_token(user_id, Some("staff@clinic.test"), 3600, TEST_JWT_SECRET, TEST_AUDIENCE)
}

// --- State ---

pub fn test_config(env: Env) -> AppConfig {
    AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

pub fn app_state(directory: MockRoleDirectory, config: AppConfig) -> AppState {
    AppState::new(Arc::new(directory), config)
}

// --- Router Helpers ---

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("cookie", format!("sb-access-token={}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .expect("redirect without a location header")
        .to_str()
        .unwrap()
        .to_string()
}
