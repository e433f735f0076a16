mod assignments;
mod audit;

pub use assignments::{RoleAssignment, RoleAssignmentRepository};
pub use audit::{AuditEvent, AuditRepository};
