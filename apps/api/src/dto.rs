mod access;
mod health;
mod role_assignments;

pub use access::{
    AccessResponse, CurrentUserAccessResponse, PermissionCheckQuery, PermissionCheckResponse,
    PreviewAccessRequest, RoleCatalogResponse, RoleDefinitionResponse,
};
pub use health::{HealthDependencyStatus, HealthResponse};
pub use role_assignments::{AssignRolesRequest, RoleAssignmentResponse};
