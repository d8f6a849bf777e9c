use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Persisted Rows (read-only, owned by the managed backend) ---

/// UserRole
///
/// A row of `public.user_roles`. `user_id` is unique, so a user has at most one role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: i32,
}

/// Role
///
/// A row of `public.roles`. `name` is compared case-sensitively everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq, Eq)]
#[ts(export)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

// --- The Fixed Role Table ---

/// RoleName
///
/// The enumerated set of roles the portal knows how to route. Each role owns exactly one
/// protected path prefix and one dashboard under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleName {
    Admin,
    Doctor,
    Nurse,
    Patient,
    Receptionist,
    LabTechnician,
    Pharmacist,
    BillingSpecialist,
    Radiologist,
    ItSupport,
}

impl RoleName {
    pub const ALL: [RoleName; 10] = [
        RoleName::Admin,
        RoleName::Doctor,
        RoleName::Nurse,
        RoleName::Patient,
        RoleName::Receptionist,
        RoleName::LabTechnician,
        RoleName::Pharmacist,
        RoleName::BillingSpecialist,
        RoleName::Radiologist,
        RoleName::ItSupport,
    ];

    /// The only role that passes the admin gate.
    pub const PRIVILEGED: RoleName = RoleName::Admin;

    /// The exact string stored in `roles.name`.
    pub const fn as_str(self) -> &'static str {
        match self {
            RoleName::Admin => "Admin",
            RoleName::Doctor => "Doctor",
            RoleName::Nurse => "Nurse",
            RoleName::Patient => "Patient",
            RoleName::Receptionist => "Receptionist",
            RoleName::LabTechnician => "Lab Technician",
            RoleName::Pharmacist => "Pharmacist",
            RoleName::BillingSpecialist => "Billing Specialist",
            RoleName::Radiologist => "Radiologist",
            RoleName::ItSupport => "IT Support",
        }
    }

    /// The protected namespace owned by this role.
    pub const fn prefix(self) -> &'static str {
        match self {
            RoleName::Admin => "/admin",
            RoleName::Doctor => "/doctor",
            RoleName::Nurse => "/nurse",
            RoleName::Patient => "/patient",
            RoleName::Receptionist => "/receptionist",
            RoleName::LabTechnician => "/lab",
            RoleName::Pharmacist => "/pharmacy",
            RoleName::BillingSpecialist => "/billing",
            RoleName::Radiologist => "/radiology",
            RoleName::ItSupport => "/it",
        }
    }

    pub fn dashboard_path(self) -> String {
        format!("{}/dashboard", self.prefix())
    }

    /// Exact, case-sensitive match against the stored role name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Response Payloads (Output Schemas) ---

/// CheckAdminResponse
///
/// Body of `GET /api/check-admin`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminResponse {
    pub is_admin: bool,
}

/// DebugRoleResponse
///
/// Body of the local-only `GET /api/debug-role`. Deliberately reports every stage of the
/// role lookup, including raw error text.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DebugRoleResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub user_role: Option<UserRole>,
    pub user_role_error: Option<String>,
    pub role: Option<Role>,
    pub role_error: Option<String>,
    pub is_admin: bool,
}

/// LoginView
///
/// Body of `GET /login`. `redirect` echoes the path the gate sent the user away from.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginView {
    pub page: String,
    pub redirect: Option<String>,
}

/// DashboardView
///
/// Body of the role dashboards and of the generic `/dashboard` root.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardView {
    pub page: String,
    pub role: Option<String>,
    pub path: String,
    pub email: Option<String>,
}

/// ErrorBody
///
/// Uniform JSON error envelope. Never carries internal detail.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}
