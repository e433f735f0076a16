//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod dashboard;
mod permission;
mod registry;
mod role;
mod security;

pub use access::{UserAccess, has_all_roles, has_any_role, has_permission, resolve_permissions};
pub use dashboard::{DashboardTab, visible_tabs};
pub use permission::{
    AuditPermissions, AuditPermissionsPartial, CollectorPermissions, CollectorPermissionsPartial,
    DashboardPermissions, DashboardPermissionsPartial, PaymentPermissions,
    PaymentPermissionsPartial, PermissionCategory, PermissionPartial, PermissionSet,
    SystemPermissions, SystemPermissionsPartial, UserPermissions, UserPermissionsPartial,
};
pub use registry::RoleRegistry;
pub use role::{BaseRole, EnhancedRole, Role};
pub use security::AuditAction;
