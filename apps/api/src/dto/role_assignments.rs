use serde::{Deserialize, Serialize};
use ts_rs::TS;
use welfare_application::RoleAssignment;

/// Incoming payload replacing a subject's roles.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-roles-request.ts"
)]
pub struct AssignRolesRequest {
    pub base_role: String,
    #[serde(default)]
    pub enhanced_roles: Vec<String>,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub subject: String,
    pub base_role: String,
    pub enhanced_roles: Vec<String>,
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            subject: value.subject,
            base_role: value.base_role.as_str().to_owned(),
            enhanced_roles: value
                .enhanced_roles
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        }
    }
}
