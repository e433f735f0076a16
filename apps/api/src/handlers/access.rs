use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};

use welfare_core::{AppError, UserIdentity};
use welfare_domain::{
    BaseRole, EnhancedRole, PermissionCategory, Role, has_permission, visible_tabs,
};

use crate::dto::{
    AccessResponse, CurrentUserAccessResponse, PermissionCheckQuery, PermissionCheckResponse,
    PreviewAccessRequest, RoleCatalogResponse, RoleDefinitionResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Json<CurrentUserAccessResponse> {
    let access = state.access_service.resolve_access(&user).await;
    let tabs = visible_tabs(Some(&access));

    Json(CurrentUserAccessResponse::new(&user, &access, &tabs))
}

pub async fn check_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<PermissionCheckQuery>,
) -> Json<PermissionCheckResponse> {
    let access = state.access_service.resolve_access(&user).await;
    let allowed = has_permission(
        Some(&access),
        query.category.as_str(),
        query.flag.as_str(),
    );

    Json(PermissionCheckResponse {
        category: query.category,
        flag: query.flag,
        allowed,
    })
}

pub async fn role_catalog_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<UserIdentity>,
) -> Json<RoleCatalogResponse> {
    let registry = state.access_service.registry();

    Json(RoleCatalogResponse {
        base_roles: registry
            .base_roles()
            .map(|(role, partial)| RoleDefinitionResponse::new(role, partial))
            .collect(),
        enhanced_roles: registry
            .enhanced_roles()
            .map(|(role, partial)| RoleDefinitionResponse::new(role, partial))
            .collect(),
    })
}

pub async fn preview_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<PreviewAccessRequest>,
) -> ApiResult<Json<AccessResponse>> {
    state
        .access_service
        .require_permission(&user, PermissionCategory::Users, "manageRoles")
        .await?;

    let base_role = Role::from(BaseRole::from_str(payload.base_role.as_str())?);
    let enhanced_roles = payload
        .enhanced_roles
        .iter()
        .map(|value| EnhancedRole::from_str(value.as_str()).map(Role::from))
        .collect::<Result<Vec<_>, AppError>>()?;

    let access = state.access_service.preview(&base_role, &enhanced_roles);
    let tabs = visible_tabs(Some(&access));

    Ok(Json(AccessResponse::from_access(&access, &tabs)))
}
