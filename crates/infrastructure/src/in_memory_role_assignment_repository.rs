use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use welfare_application::{RoleAssignment, RoleAssignmentRepository};
use welfare_core::AppResult;

/// In-memory role store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryRoleAssignmentRepository {
    assignments: RwLock<BTreeMap<String, RoleAssignment>>,
}

impl InMemoryRoleAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignments: RwLock::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleAssignmentRepository {
    async fn find_assignment(&self, subject: &str) -> AppResult<Option<RoleAssignment>> {
        Ok(self.assignments.read().await.get(subject).cloned())
    }

    async fn list_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        Ok(self.assignments.read().await.values().cloned().collect())
    }

    async fn save_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        self.assignments
            .write()
            .await
            .insert(assignment.subject.clone(), assignment);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
