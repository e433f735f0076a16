//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_audit_repository;
mod in_memory_role_assignment_repository;
mod postgres_audit_repository;
mod postgres_role_assignment_repository;

pub use console_audit_repository::ConsoleAuditRepository;
pub use in_memory_role_assignment_repository::InMemoryRoleAssignmentRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_role_assignment_repository::PostgresRoleAssignmentRepository;
