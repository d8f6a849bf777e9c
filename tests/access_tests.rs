mod common;

use care_portal::{
    access::{RoleResolution, authorize_admin, is_admin, lookup_role},
    auth::{RequestContext, Session},
    error::AccessError,
    models::RoleName,
};
use common::MockRoleDirectory;
use uuid::Uuid;

const USER: Uuid = Uuid::from_u128(0xA11CE);

fn signed_in(user_id: Uuid) -> RequestContext {
    RequestContext::authenticated(Session {
        user_id,
        email: Some("staff@clinic.test".to_string()),
        metadata: serde_json::Value::Null,
        expires_at: None,
    })
}

// --- Role Lookup ---

#[tokio::test]
async fn test_lookup_resolves_through_both_tables() {
    let dir = MockRoleDirectory::new().with_role(7, "Doctor").assign(USER, 7);

    let resolution = lookup_role(&dir, USER).await;

    assert_eq!(resolution.role().map(|r| r.id), Some(7));
    assert_eq!(resolution.known(), Some(RoleName::Doctor));
    assert_eq!(dir.lookups(), (1, 1));
}

#[tokio::test]
async fn test_lookup_without_user_role_row_is_unresolved() {
    let dir = MockRoleDirectory::seeded();

    assert_eq!(lookup_role(&dir, USER).await, RoleResolution::Unresolved);
    // The second query is never issued.
    assert_eq!(dir.lookups(), (1, 0));
}

#[tokio::test]
async fn test_lookup_without_role_row_is_unresolved() {
    let dir = MockRoleDirectory::new().assign(USER, 99);

    assert_eq!(lookup_role(&dir, USER).await, RoleResolution::Unresolved);
    assert_eq!(dir.lookups(), (1, 1));
}

#[tokio::test]
async fn test_lookup_errors_are_unresolved() {
    let first = MockRoleDirectory::seeded().assign(USER, 1).failing_user_roles();
    assert_eq!(lookup_role(&first, USER).await, RoleResolution::Unresolved);

    let second = MockRoleDirectory::seeded().assign(USER, 1).failing_roles();
    assert_eq!(lookup_role(&second, USER).await, RoleResolution::Unresolved);
}

#[tokio::test]
async fn test_lookup_keeps_unknown_role_names() {
    let dir = MockRoleDirectory::new().with_role(3, "Janitor").assign(USER, 3);

    let resolution = lookup_role(&dir, USER).await;

    assert_eq!(resolution.role().map(|r| r.name.as_str()), Some("Janitor"));
    assert_eq!(resolution.known(), None);
}

// --- Admin Gate ---

#[tokio::test]
async fn test_is_admin_true_only_for_exact_admin() {
    let dir = MockRoleDirectory::new().with_role(1, "Admin").assign(USER, 1);
    assert!(is_admin(&signed_in(USER), &dir).await);
}

#[tokio::test]
async fn test_is_admin_is_case_sensitive() {
    for name in ["admin", "ADMIN", "Admin ", " Admin", "Administrator"] {
        let dir = MockRoleDirectory::new().with_role(1, name).assign(USER, 1);
        assert!(!is_admin(&signed_in(USER), &dir).await, "{name:?} must not pass");
    }
}

#[tokio::test]
async fn test_is_admin_false_for_every_other_role() {
    let dir = RoleName::ALL
        .into_iter()
        .enumerate()
        .fold(MockRoleDirectory::seeded(), |dir, (i, _)| {
            dir.assign(Uuid::from_u128(i as u128 + 1), i as i32 + 1)
        });

    for (i, role) in RoleName::ALL.into_iter().enumerate() {
        let ctx = signed_in(Uuid::from_u128(i as u128 + 1));
        assert_eq!(is_admin(&ctx, &dir).await, role == RoleName::Admin, "{role}");
    }
}

#[tokio::test]
async fn test_is_admin_fails_closed() {
    let admin_dir = || MockRoleDirectory::new().with_role(1, "Admin");

    // No session.
    assert!(!is_admin(&RequestContext::anonymous(), &admin_dir().assign(USER, 1)).await);
    // Session but no user_roles row.
    assert!(!is_admin(&signed_in(USER), &admin_dir()).await);
    // user_roles row pointing at a missing role.
    assert!(!is_admin(&signed_in(USER), &admin_dir().assign(USER, 2)).await);
    // Database error at either stage.
    assert!(!is_admin(&signed_in(USER), &admin_dir().assign(USER, 1).failing_user_roles()).await);
    assert!(!is_admin(&signed_in(USER), &admin_dir().assign(USER, 1).failing_roles()).await);
}

#[tokio::test]
async fn test_authorize_admin_reports_reason() {
    let dir = MockRoleDirectory::seeded().assign(USER, 2);

    let no_session = authorize_admin(&RequestContext::anonymous(), &dir).await;
    assert!(matches!(no_session, Err(AccessError::NoSession)));
    // Anonymous requests never touch the tables.
    assert_eq!(dir.lookups(), (0, 0));

    let doctor = authorize_admin(&signed_in(USER), &dir).await;
    assert!(matches!(doctor, Err(AccessError::Forbidden { ref role }) if role == "Doctor"));

    let unknown_user = authorize_admin(&signed_in(Uuid::new_v4()), &dir).await;
    assert!(matches!(unknown_user, Err(AccessError::RoleUnresolved)));
}

#[tokio::test]
async fn test_authorize_admin_returns_role_row() {
    let dir = MockRoleDirectory::seeded().assign(USER, 1);

    let role = authorize_admin(&signed_in(USER), &dir).await.unwrap();

    assert_eq!(role.id, 1);
    assert_eq!(role.name, "Admin");
}
