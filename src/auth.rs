use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AppConfig, Env};

/// Header accepted in `Env::Local` to impersonate a user without a token.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// The payload of an access token issued by the auth provider. Only the fields the gate
/// reads are modelled; everything else in the token is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id, the key into `user_roles`.
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience (aud): provider tokens for signed-in users carry `authenticated`.
    pub aud: String,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Session
///
/// Proof of authentication decoded from a provider token. Created and destroyed by the
/// provider; the gate only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub metadata: serde_json::Value,
    /// `None` for sessions synthesised by the local bypass.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            user_id: claims.sub,
            email: claims.email,
            metadata: claims.user_metadata,
            expires_at: DateTime::<Utc>::from_timestamp(claims.exp as i64, 0),
        }
    }
}

/// SessionResolver
///
/// Turns an inbound request's headers into an optional [`Session`].
///
/// Token sources, in order:
/// 1. `Env::Local` only: the `x-user-id` header (development bypass).
/// 2. The provider's auth cookie.
/// 3. `Authorization: Bearer <token>`.
///
/// Every failure (missing, malformed, expired, bad signature, wrong audience) is `None`.
pub struct SessionResolver {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    env: Env,
}

/// SessionResolverState
///
/// Shared, immutable resolver held in the application state.
pub type SessionResolverState = Arc<SessionResolver>;

impl SessionResolver {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expired means expired: no clock-skew grace.
        validation.leeway = 0;
        validation.set_audience(&[config.jwt_audience.as_str()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cookie_name: config.auth_cookie.clone(),
            env: config.env,
        }
    }

    /// resolve
    ///
    /// Never fails: an invalid credential is indistinguishable from no credential.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        if self.env == Env::Local {
            if let Some(session) = dev_bypass(headers) {
                tracing::debug!(user_id = %session.user_id, "Session resolved via local bypass header");
                return Some(session);
            }
        }

        let token = self.token_from(headers)?;

        match decode::<Claims>(&token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(Session::from(data.claims)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                None
            }
        }
    }

    fn token_from(&self, headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(&self.cookie_name) {
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_owned());
            }
        }

        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    }
}

fn dev_bypass(headers: &HeaderMap) -> Option<Session> {
    let raw = headers.get(DEV_USER_HEADER)?.to_str().ok()?;
    let user_id = Uuid::parse_str(raw).ok()?;
    Some(Session {
        user_id,
        email: None,
        metadata: serde_json::Value::Null,
        expires_at: None,
    })
}

/// RequestContext
///
/// The explicit, request-scoped authentication context handed to every check. The gate
/// middleware stores it in the request extensions; the extractor reuses that value and
/// only resolves the session itself on routes the gate skips (e.g. `/api/*`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub session: Option<Session>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn authenticated(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
    SessionResolverState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        let resolver = SessionResolverState::from_ref(state);
        let ctx = RequestContext {
            session: resolver.resolve(&parts.headers),
        };
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
