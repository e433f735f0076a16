use sqlx::PgPool;
use welfare_application::{AccessService, RoleAdminService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub role_admin_service: RoleAdminService,
    pub postgres_pool: Option<PgPool>,
    pub gateway_secret: String,
}
