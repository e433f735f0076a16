use std::sync::Arc;

use tracing::{debug, warn};
use welfare_core::{AppError, AppResult, UserIdentity};
use welfare_domain::{
    AuditAction, BaseRole, DashboardTab, PermissionCategory, Role, RoleRegistry, UserAccess,
    visible_tabs,
};

use crate::{AuditEvent, AuditRepository, RoleAssignmentRepository};

/// Application service resolving the effective access of authenticated subjects.
///
/// The role store is the only I/O involved. When it fails or has no record
/// for the subject, the subject is treated as a plain `member`.
#[derive(Clone)]
pub struct AccessService {
    repository: Arc<dyn RoleAssignmentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AccessService {
    /// Creates a new access service from the role store and audit sink.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleAssignmentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Returns the registry used for resolution.
    #[must_use]
    pub fn registry(&self) -> &'static RoleRegistry {
        RoleRegistry::standard()
    }

    /// Resolves the access of the authenticated actor.
    pub async fn resolve_access(&self, actor: &UserIdentity) -> UserAccess {
        self.resolve_subject_access(actor.subject()).await
    }

    /// Resolves the access of any subject from its stored role assignment.
    pub async fn resolve_subject_access(&self, subject: &str) -> UserAccess {
        let assignment = match self.repository.find_assignment(subject).await {
            Ok(assignment) => assignment,
            Err(error) => {
                warn!(
                    subject = subject,
                    error = %error,
                    "role lookup failed, falling back to member access"
                );
                None
            }
        };

        let Some(assignment) = assignment else {
            debug!(subject = subject, "no role assignment, using member access");
            return self.preview(&Role::from(BaseRole::Member), &[]);
        };

        let access = self.preview(&assignment.base_role, &assignment.enhanced_roles);
        debug!(
            subject = subject,
            base_role = %assignment.base_role,
            enhanced_roles = assignment.enhanced_roles.len(),
            "resolved role assignment"
        );
        access
    }

    /// Resolves an arbitrary role combination without touching the role store.
    #[must_use]
    pub fn preview(&self, base_role: &Role, enhanced_roles: &[Role]) -> UserAccess {
        self.registry().resolve(base_role, enhanced_roles)
    }

    /// Returns whether the actor currently holds the permission flag.
    pub async fn has_permission(
        &self,
        actor: &UserIdentity,
        category: PermissionCategory,
        flag: &str,
    ) -> bool {
        self.resolve_access(actor).await.allows(category, flag)
    }

    /// Ensures the actor holds the permission flag and returns the resolved access.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        category: PermissionCategory,
        flag: &str,
    ) -> AppResult<UserAccess> {
        let access = self.resolve_access(actor).await;
        if access.allows(category, flag) {
            return Ok(access);
        }

        let permission = format!("{category}.{flag}");
        let event = AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::SecurityAccessDenied,
            resource_type: "permission".to_owned(),
            resource_id: permission.clone(),
            detail: Some(format!("base_role='{}'", access.base_role())),
        };
        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(error = %error, "failed to record access denial");
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{permission}'",
            actor.subject()
        )))
    }

    /// Returns the dashboard tabs shown to the actor.
    pub async fn visible_tabs(&self, actor: &UserIdentity) -> Vec<DashboardTab> {
        let access = self.resolve_access(actor).await;
        visible_tabs(Some(&access))
    }
}

#[cfg(test)]
mod tests;
