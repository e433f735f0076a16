use axum::Json;
use axum::extract::{Extension, Path, State};

use welfare_application::AssignRolesInput;
use welfare_core::UserIdentity;

use crate::dto::{AssignRolesRequest, RoleAssignmentResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .role_admin_service
        .list_role_assignments(&user)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn get_role_assignment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
) -> ApiResult<Json<RoleAssignmentResponse>> {
    let assignment = state
        .role_admin_service
        .role_assignment(&user, subject.as_str())
        .await?;

    Ok(Json(RoleAssignmentResponse::from(assignment)))
}

pub async fn assign_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
    Json(payload): Json<AssignRolesRequest>,
) -> ApiResult<Json<RoleAssignmentResponse>> {
    let assignment = state
        .role_admin_service
        .assign_roles(
            &user,
            AssignRolesInput {
                subject,
                base_role: payload.base_role,
                enhanced_roles: payload.enhanced_roles,
            },
        )
        .await?;

    Ok(Json(RoleAssignmentResponse::from(assignment)))
}
