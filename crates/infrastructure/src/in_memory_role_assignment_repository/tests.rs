use welfare_application::{RoleAssignment, RoleAssignmentRepository};
use welfare_domain::Role;

use super::InMemoryRoleAssignmentRepository;

fn assignment(subject: &str, base_role: &str, enhanced_roles: &[&str]) -> RoleAssignment {
    RoleAssignment {
        subject: subject.to_owned(),
        base_role: Role::new(base_role),
        enhanced_roles: enhanced_roles.iter().copied().map(Role::new).collect(),
    }
}

#[tokio::test]
async fn save_replaces_previous_assignment() {
    let repository = InMemoryRoleAssignmentRepository::new();

    let first = repository
        .save_assignment(assignment("amina", "member", &["audit_viewer"]))
        .await;
    assert!(first.is_ok());
    let second = repository
        .save_assignment(assignment("amina", "collector", &[]))
        .await;
    assert!(second.is_ok());

    let stored = repository.find_assignment("amina").await.ok().flatten();
    assert_eq!(stored, Some(assignment("amina", "collector", &[])));
}

#[tokio::test]
async fn list_is_ordered_by_subject() {
    let repository = InMemoryRoleAssignmentRepository::new();
    for subject in ["zainab", "bello", "musa"] {
        let saved = repository
            .save_assignment(assignment(subject, "member", &[]))
            .await;
        assert!(saved.is_ok());
    }

    let subjects: Vec<String> = repository
        .list_assignments()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|assignment| assignment.subject)
        .collect();
    assert_eq!(subjects, vec!["bello", "musa", "zainab"]);
}

#[tokio::test]
async fn unknown_subject_has_no_assignment() {
    let repository = InMemoryRoleAssignmentRepository::new();
    let found = repository.find_assignment("nobody").await;
    assert!(matches!(found, Ok(None)));
}
