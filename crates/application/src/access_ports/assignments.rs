use async_trait::async_trait;
use welfare_core::AppResult;
use welfare_domain::Role;

/// Roles held by one subject as recorded in the role store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Subject the roles belong to.
    pub subject: String,
    /// Single primary role.
    pub base_role: Role,
    /// Enhanced roles in merge order.
    pub enhanced_roles: Vec<Role>,
}

/// Port for the role store holding per-subject assignments.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Finds the assignment of a subject, if one was recorded.
    async fn find_assignment(&self, subject: &str) -> AppResult<Option<RoleAssignment>>;

    /// Lists every recorded assignment ordered by subject.
    async fn list_assignments(&self) -> AppResult<Vec<RoleAssignment>>;

    /// Creates or replaces the assignment of `assignment.subject`.
    async fn save_assignment(&self, assignment: RoleAssignment) -> AppResult<()>;
}
