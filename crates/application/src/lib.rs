//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod role_admin_service;

pub use access_ports::{AuditEvent, AuditRepository, RoleAssignment, RoleAssignmentRepository};
pub use access_service::AccessService;
pub use role_admin_service::{AssignRolesInput, RoleAdminService};
