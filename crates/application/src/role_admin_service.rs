use std::str::FromStr;
use std::sync::Arc;

use tracing::info;
use welfare_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use welfare_domain::{AuditAction, BaseRole, EnhancedRole, PermissionCategory, Role};

use crate::{AccessService, AuditEvent, AuditRepository, RoleAssignment, RoleAssignmentRepository};

/// Input payload replacing the roles of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRolesInput {
    /// Subject receiving the roles.
    pub subject: String,
    /// Base role identifier.
    pub base_role: String,
    /// Enhanced role identifiers in merge order.
    pub enhanced_roles: Vec<String>,
}

/// Application service for role assignment administration.
#[derive(Clone)]
pub struct RoleAdminService {
    access_service: AccessService,
    repository: Arc<dyn RoleAssignmentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RoleAdminService {
    /// Creates a new role administration service.
    #[must_use]
    pub fn new(
        access_service: AccessService,
        repository: Arc<dyn RoleAssignmentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            access_service,
            repository,
            audit_repository,
        }
    }

    /// Lists every recorded role assignment.
    pub async fn list_role_assignments(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.access_service
            .require_permission(actor, PermissionCategory::Users, "viewUsers")
            .await?;

        self.repository.list_assignments().await
    }

    /// Returns the recorded role assignment of one subject.
    pub async fn role_assignment(
        &self,
        actor: &UserIdentity,
        subject: &str,
    ) -> AppResult<RoleAssignment> {
        self.access_service
            .require_permission(actor, PermissionCategory::Users, "viewUsers")
            .await?;

        self.repository
            .find_assignment(subject)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no role assignment for subject '{subject}'"))
            })
    }

    /// Replaces the base and enhanced roles of a subject.
    ///
    /// Only registered identifiers are accepted here, even though resolution
    /// tolerates unknown ones. Duplicate enhanced roles are dropped, keeping
    /// the first occurrence.
    pub async fn assign_roles(
        &self,
        actor: &UserIdentity,
        input: AssignRolesInput,
    ) -> AppResult<RoleAssignment> {
        self.access_service
            .require_permission(actor, PermissionCategory::Users, "manageRoles")
            .await?;

        let subject = NonEmptyString::new(input.subject)?;
        let base_role = BaseRole::from_str(input.base_role.as_str())?;
        let mut enhanced_roles: Vec<EnhancedRole> = Vec::with_capacity(input.enhanced_roles.len());
        for value in &input.enhanced_roles {
            let role = EnhancedRole::from_str(value.as_str())?;
            if !enhanced_roles.contains(&role) {
                enhanced_roles.push(role);
            }
        }

        let assignment = RoleAssignment {
            subject: subject.into(),
            base_role: Role::from(base_role),
            enhanced_roles: enhanced_roles.into_iter().map(Role::from).collect(),
        };

        if assignment.subject == actor.subject() {
            let access = self
                .access_service
                .preview(&assignment.base_role, &assignment.enhanced_roles);
            if !access.allows(PermissionCategory::Users, "manageRoles") {
                return Err(AppError::Conflict(
                    "cannot remove role management permission from yourself".to_owned(),
                ));
            }
        }

        self.repository.save_assignment(assignment.clone()).await?;

        let enhanced_labels = assignment
            .enhanced_roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::SecurityRolesAssigned,
                resource_type: "role_assignment".to_owned(),
                resource_id: assignment.subject.clone(),
                detail: Some(format!(
                    "base_role='{}', enhanced_roles='{enhanced_labels}'",
                    assignment.base_role
                )),
            })
            .await?;

        info!(
            actor = actor.subject(),
            subject = assignment.subject.as_str(),
            base_role = %assignment.base_role,
            enhanced_roles = enhanced_labels.as_str(),
            "role assignment updated"
        );

        Ok(assignment)
    }

    /// Grants `admin` to a subject that has no assignment yet.
    ///
    /// Returns `false` when the subject already had an assignment, which is
    /// left untouched.
    pub async fn bootstrap_admin(&self, subject: &str) -> AppResult<bool> {
        let subject = NonEmptyString::new(subject)?;
        if self
            .repository
            .find_assignment(subject.as_str())
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let assignment = RoleAssignment {
            subject: subject.into(),
            base_role: Role::from(BaseRole::Admin),
            enhanced_roles: Vec::new(),
        };
        let resource_id = assignment.subject.clone();
        self.repository.save_assignment(assignment).await?;
        self.audit_repository
            .append_event(AuditEvent {
                subject: "system".to_owned(),
                action: AuditAction::SecurityRolesAssigned,
                resource_type: "role_assignment".to_owned(),
                resource_id: resource_id.clone(),
                detail: Some("bootstrap admin".to_owned()),
            })
            .await?;

        info!(subject = resource_id.as_str(), "bootstrap admin assigned");
        Ok(true)
    }
}
