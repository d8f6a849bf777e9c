/// Router Module Index
///
/// Organizes routing into access-segregated modules. The global request gate runs in
/// front of all of them; these modules add the route-level guards on top.

/// Routes reachable without a session (health, home, login).
pub mod public;

/// JSON API under `/api`. Skipped by the request gate; handlers resolve the session
/// themselves through the `RequestContext` extractor.
pub mod api;

/// Role dashboards and the generic `/dashboard` root. The gate requires a session.
pub mod dashboards;

/// Admin-only pages, additionally wrapped in the admin page guard.
pub mod admin;
