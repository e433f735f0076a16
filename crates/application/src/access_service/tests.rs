use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use welfare_core::{AppError, AppResult, UserIdentity};
use welfare_domain::{AuditAction, DashboardTab, PermissionCategory, PermissionSet, Role};

use crate::{AuditEvent, AuditRepository, RoleAssignment, RoleAssignmentRepository};

use super::AccessService;

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct FakeRoleAssignmentRepository {
    assignments: HashMap<String, RoleAssignment>,
}

impl FakeRoleAssignmentRepository {
    fn with(assignments: Vec<RoleAssignment>) -> Self {
        Self {
            assignments: assignments
                .into_iter()
                .map(|assignment| (assignment.subject.clone(), assignment))
                .collect(),
        }
    }
}

#[async_trait]
impl RoleAssignmentRepository for FakeRoleAssignmentRepository {
    async fn find_assignment(&self, subject: &str) -> AppResult<Option<RoleAssignment>> {
        Ok(self.assignments.get(subject).cloned())
    }

    async fn list_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        Ok(self.assignments.values().cloned().collect())
    }

    async fn save_assignment(&self, _assignment: RoleAssignment) -> AppResult<()> {
        Ok(())
    }
}

struct UnavailableRoleAssignmentRepository;

#[async_trait]
impl RoleAssignmentRepository for UnavailableRoleAssignmentRepository {
    async fn find_assignment(&self, _subject: &str) -> AppResult<Option<RoleAssignment>> {
        Err(AppError::Internal("role store unavailable".to_owned()))
    }

    async fn list_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        Err(AppError::Internal("role store unavailable".to_owned()))
    }

    async fn save_assignment(&self, _assignment: RoleAssignment) -> AppResult<()> {
        Err(AppError::Internal("role store unavailable".to_owned()))
    }
}

fn assignment(subject: &str, base_role: &str, enhanced_roles: &[&str]) -> RoleAssignment {
    RoleAssignment {
        subject: subject.to_owned(),
        base_role: Role::new(base_role),
        enhanced_roles: enhanced_roles.iter().copied().map(Role::new).collect(),
    }
}

fn identity(subject: &str) -> UserIdentity {
    UserIdentity::new(subject, subject, None)
}

#[tokio::test]
async fn resolve_access_merges_stored_roles() {
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(vec![assignment(
            "grace",
            "member",
            &["audit_viewer"],
        )])),
        Arc::new(FakeAuditRepository::default()),
    );

    let access = service.resolve_access(&identity("grace")).await;
    assert_eq!(access.base_role().as_str(), "member");
    assert!(access.permissions().audit.export_audit_logs);
    assert!(!access.permissions().users.view_users);
}

#[tokio::test]
async fn missing_assignment_resolves_to_member() {
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(Vec::new())),
        Arc::new(FakeAuditRepository::default()),
    );

    let access = service.resolve_access(&identity("newcomer")).await;
    assert_eq!(access.base_role().as_str(), "member");
    assert_eq!(*access.permissions(), PermissionSet::baseline());
}

#[tokio::test]
async fn role_store_failure_resolves_to_member() {
    let service = AccessService::new(
        Arc::new(UnavailableRoleAssignmentRepository),
        Arc::new(FakeAuditRepository::default()),
    );

    let access = service.resolve_access(&identity("admin-1")).await;
    assert_eq!(access.base_role().as_str(), "member");
    assert!(!access.permissions().users.manage_roles);
}

#[tokio::test]
async fn require_permission_allows_granted_subject() {
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(vec![assignment(
            "collector-1",
            "collector",
            &[],
        )])),
        Arc::new(FakeAuditRepository::default()),
    );

    let result = service
        .require_permission(
            &identity("collector-1"),
            PermissionCategory::Payments,
            "collectPayments",
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn require_permission_denies_and_records_event() {
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(vec![assignment(
            "collector-1",
            "collector",
            &[],
        )])),
        audit_repository.clone(),
    );

    let result = service
        .require_permission(
            &identity("collector-1"),
            PermissionCategory::Payments,
            "approvePayments",
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let events = audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::SecurityAccessDenied);
    assert_eq!(events[0].resource_id, "payments.approvePayments");
}

#[tokio::test]
async fn require_permission_denies_unknown_flag() {
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(vec![assignment(
            "root", "admin", &[],
        )])),
        Arc::new(FakeAuditRepository::default()),
    );

    let result = service
        .require_permission(&identity("root"), PermissionCategory::Users, "impersonate")
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn has_permission_reflects_enhanced_roles() {
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(vec![assignment(
            "treasurer",
            "member",
            &["financial_admin"],
        )])),
        Arc::new(FakeAuditRepository::default()),
    );

    assert!(
        service
            .has_permission(
                &identity("treasurer"),
                PermissionCategory::Payments,
                "approvePayments"
            )
            .await
    );
    assert!(
        !service
            .has_permission(&identity("treasurer"), PermissionCategory::Users, "manageRoles")
            .await
    );
}

#[tokio::test]
async fn visible_tabs_follow_resolved_access() {
    let service = AccessService::new(
        Arc::new(FakeRoleAssignmentRepository::with(vec![assignment(
            "ops",
            "member",
            &["system_admin"],
        )])),
        Arc::new(FakeAuditRepository::default()),
    );

    let tabs = service.visible_tabs(&identity("ops")).await;
    assert_eq!(
        tabs,
        vec![
            DashboardTab::Overview,
            DashboardTab::AuditLogs,
            DashboardTab::SystemHealth
        ]
    );
}
