use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use welfare_core::UserIdentity;
use welfare_domain::{
    DashboardTab, PermissionCategory, PermissionPartial, PermissionSet, Role, UserAccess,
};

/// Permission flags keyed by category, then by flag name.
pub type PermissionFlags = BTreeMap<String, BTreeMap<String, bool>>;

/// API representation of resolved access.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-response.ts"
)]
pub struct AccessResponse {
    pub base_role: String,
    pub permissions: PermissionFlags,
    pub tabs: Vec<String>,
}

impl AccessResponse {
    pub fn from_access(access: &UserAccess, tabs: &[DashboardTab]) -> Self {
        Self {
            base_role: access.base_role().as_str().to_owned(),
            permissions: permission_set_flags(access.permissions()),
            tabs: tabs.iter().map(|tab| tab.as_str().to_owned()).collect(),
        }
    }
}

/// API representation of the caller and their resolved access.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/current-user-access-response.ts"
)]
pub struct CurrentUserAccessResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub access: AccessResponse,
}

impl CurrentUserAccessResponse {
    pub fn new(identity: &UserIdentity, access: &UserAccess, tabs: &[DashboardTab]) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(str::to_owned),
            access: AccessResponse::from_access(access, tabs),
        }
    }
}

/// Query for a single permission check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-check-query.ts"
)]
pub struct PermissionCheckQuery {
    pub category: String,
    pub flag: String,
}

/// Outcome of a single permission check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-check-response.ts"
)]
pub struct PermissionCheckResponse {
    pub category: String,
    pub flag: String,
    pub allowed: bool,
}

/// Incoming payload for previewing a role combination.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/preview-access-request.ts"
)]
pub struct PreviewAccessRequest {
    pub base_role: String,
    #[serde(default)]
    pub enhanced_roles: Vec<String>,
}

/// API representation of one registered role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-definition-response.ts"
)]
pub struct RoleDefinitionResponse {
    pub role: String,
    pub permissions: PermissionFlags,
}

impl RoleDefinitionResponse {
    pub fn new(role: &Role, partial: &PermissionPartial) -> Self {
        Self {
            role: role.as_str().to_owned(),
            permissions: group_flags(partial.flags()),
        }
    }
}

/// API representation of the role registry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-catalog-response.ts"
)]
pub struct RoleCatalogResponse {
    pub base_roles: Vec<RoleDefinitionResponse>,
    pub enhanced_roles: Vec<RoleDefinitionResponse>,
}

fn permission_set_flags(permissions: &PermissionSet) -> PermissionFlags {
    group_flags(permissions.flags())
}

fn group_flags(flags: Vec<(PermissionCategory, &'static str, bool)>) -> PermissionFlags {
    let mut grouped = PermissionFlags::new();
    for (category, name, value) in flags {
        grouped
            .entry(category.as_str().to_owned())
            .or_default()
            .insert(name.to_owned(), value);
    }
    grouped
}
