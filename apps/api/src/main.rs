//! Welfare portal API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use tracing::info;
use welfare_core::AppError;

use crate::api_config::{ApiConfig, RoleStoreConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = match &config.role_store {
        RoleStoreConfig::Postgres { database_url } => {
            Some(api_services::connect_and_migrate(database_url).await?)
        }
        RoleStoreConfig::Memory => None,
    };

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = api_services::build_app_state(pool, config.gateway_secret.clone());

    if let Some(subject) = config.dev_seed_admin_subject.as_deref() {
        let assigned = app_state.role_admin_service.bootstrap_admin(subject).await?;
        if assigned {
            info!(subject = subject, "dev seed admin assigned");
        }
    }

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "welfare-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
