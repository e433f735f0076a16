//! Role identifiers for the two role tiers.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use welfare_core::AppError;

/// Opaque role identifier as stored in the role store.
///
/// Unknown identifiers are representable on purpose: resolution treats them
/// as contributing no permissions instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Creates a role identifier from any string value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the base role this identifier names, if any.
    #[must_use]
    pub fn as_base(&self) -> Option<BaseRole> {
        BaseRole::from_str(self.as_str()).ok()
    }

    /// Returns the enhanced role this identifier names, if any.
    #[must_use]
    pub fn as_enhanced(&self) -> Option<EnhancedRole> {
        EnhancedRole::from_str(self.as_str()).ok()
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<BaseRole> for Role {
    fn from(value: BaseRole) -> Self {
        Self::new(value.as_str())
    }
}

impl From<EnhancedRole> for Role {
    fn from(value: EnhancedRole) -> Self {
        Self::new(value.as_str())
    }
}

/// Primary role held by exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseRole {
    /// Association member.
    Member,
    /// Collects contributions from assigned members.
    Collector,
    /// Association administrator.
    Admin,
}

impl BaseRole {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Collector => "collector",
            Self::Admin => "admin",
        }
    }

    /// Returns all base roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[BaseRole] = &[BaseRole::Member, BaseRole::Collector, BaseRole::Admin];

        ALL
    }
}

impl AsRef<str> for BaseRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for BaseRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "collector" => Ok(Self::Collector),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!(
                "unknown base role '{value}'"
            ))),
        }
    }
}

/// Auxiliary role layering narrowly scoped grants on top of the base role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancedRole {
    /// Operates system settings and maintenance.
    SystemAdmin,
    /// Oversees payments and financial reporting.
    FinancialAdmin,
    /// Manages member accounts and collector assignments.
    UserManager,
    /// Reads and exports the audit trail.
    AuditViewer,
}

impl EnhancedRole {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemAdmin => "system_admin",
            Self::FinancialAdmin => "financial_admin",
            Self::UserManager => "user_manager",
            Self::AuditViewer => "audit_viewer",
        }
    }

    /// Returns all enhanced roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[EnhancedRole] = &[
            EnhancedRole::SystemAdmin,
            EnhancedRole::FinancialAdmin,
            EnhancedRole::UserManager,
            EnhancedRole::AuditViewer,
        ];

        ALL
    }
}

impl AsRef<str> for EnhancedRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for EnhancedRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "system_admin" => Ok(Self::SystemAdmin),
            "financial_admin" => Ok(Self::FinancialAdmin),
            "user_manager" => Ok(Self::UserManager),
            "audit_viewer" => Ok(Self::AuditViewer),
            _ => Err(AppError::Validation(format!(
                "unknown enhanced role '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{BaseRole, EnhancedRole, Role};

    #[test]
    fn base_role_roundtrip_storage_value() {
        for role in BaseRole::all() {
            let restored = BaseRole::from_str(role.as_str());
            assert_eq!(restored.ok(), Some(*role));
        }
    }

    #[test]
    fn tiers_do_not_overlap() {
        for role in EnhancedRole::all() {
            assert!(Role::from(*role).as_base().is_none());
        }
        for role in BaseRole::all() {
            assert!(Role::from(*role).as_enhanced().is_none());
        }
    }

    #[test]
    fn unknown_role_stays_opaque() {
        let role = Role::new("treasurer");
        assert_eq!(role.as_str(), "treasurer");
        assert!(role.as_base().is_none());
        assert!(role.as_enhanced().is_none());
    }

    #[test]
    fn role_identifiers_are_case_sensitive() {
        assert!(Role::new("Admin").as_base().is_none());
    }
}
