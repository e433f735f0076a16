use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a subject's base and enhanced roles are replaced.
    SecurityRolesAssigned,
    /// Emitted when a permission check rejects a subject.
    SecurityAccessDenied,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRolesAssigned => "security.roles.assigned",
            Self::SecurityAccessDenied => "security.access.denied",
        }
    }
}
