use std::sync::Arc;

use sqlx::PgPool;
use welfare_application::{
    AccessService, AuditRepository, RoleAdminService, RoleAssignmentRepository,
};
use welfare_infrastructure::{
    ConsoleAuditRepository, InMemoryRoleAssignmentRepository, PostgresAuditRepository,
    PostgresRoleAssignmentRepository,
};

use crate::state::AppState;

pub fn build_app_state(pool: Option<PgPool>, gateway_secret: String) -> AppState {
    let (role_assignment_repository, audit_repository): (
        Arc<dyn RoleAssignmentRepository>,
        Arc<dyn AuditRepository>,
    ) = match pool.clone() {
        Some(pool) => (
            Arc::new(PostgresRoleAssignmentRepository::new(pool.clone())),
            Arc::new(PostgresAuditRepository::new(pool)),
        ),
        None => (
            Arc::new(InMemoryRoleAssignmentRepository::new()),
            Arc::new(ConsoleAuditRepository::new()),
        ),
    };

    let access_service = AccessService::new(
        role_assignment_repository.clone(),
        audit_repository.clone(),
    );
    let role_admin_service = RoleAdminService::new(
        access_service.clone(),
        role_assignment_repository,
        audit_repository,
    );

    AppState {
        access_service,
        role_admin_service,
        postgres_pool: pool,
        gateway_secret,
    }
}
