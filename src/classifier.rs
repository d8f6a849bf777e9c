//! Route classification for the request gate.
//!
//! Pure functions over static prefix lists. A prefix matches a path that equals it or
//! continues with `/`, so `/it` covers `/it/tickets` but not `/itinerary`.

use crate::models::RoleName;

/// The generic dashboard root. Protected, but owned by no role.
pub const DASHBOARD_ROOT: &str = "/dashboard";

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";

/// Paths that never pass through the gate: API routes and static assets.
const EXCLUDED_PREFIXES: [&str; 5] = ["/api", "/_next/static", "/_next/image", "/static", "/assets"];
const FAVICON: &str = "/favicon.ico";

/// Namespace
///
/// A protected path root: either a role-owned prefix or the generic dashboard root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Role(RoleName),
    DashboardRoot,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Role(role) => role.prefix(),
            Namespace::DashboardRoot => DASHBOARD_ROOT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected(Namespace),
    Unprotected,
}

impl RouteClass {
    pub fn is_protected(self) -> bool {
        matches!(self, RouteClass::Protected(_))
    }
}

/// Every protected namespace, in match order. The prefixes are disjoint.
pub fn protected_namespaces() -> impl Iterator<Item = Namespace> {
    RoleName::ALL
        .into_iter()
        .map(Namespace::Role)
        .chain(std::iter::once(Namespace::DashboardRoot))
}

pub fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// True for paths the gate must leave alone whatever the session state.
pub fn is_excluded(path: &str) -> bool {
    path == FAVICON || EXCLUDED_PREFIXES.iter().any(|prefix| has_prefix(path, prefix))
}

/// First match by prefix over the protected namespaces.
pub fn classify(path: &str) -> RouteClass {
    protected_namespaces()
        .find(|ns| has_prefix(path, ns.prefix()))
        .map_or(RouteClass::Unprotected, RouteClass::Protected)
}

/// Exactly `/dashboard`; sub-paths and `/dashboard/` are not the root.
pub fn is_dashboard_root(path: &str) -> bool {
    path == DASHBOARD_ROOT
}
