use std::str::FromStr;

use serde::{Deserialize, Serialize};
use welfare_core::AppError;

use crate::access::{UserAccess, has_any_role};
use crate::permission::PermissionCategory;
use crate::role::BaseRole;

/// Top-level dashboard tabs rendered by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    /// Landing overview with personal contribution status.
    Overview,
    /// Member directory and registration.
    Members,
    /// Collector roster and assignments.
    Collectors,
    /// Payment tracking and receipts.
    Payments,
    /// Audit trail browser.
    AuditLogs,
    /// System health and storage metrics.
    SystemHealth,
}

impl DashboardTab {
    /// Returns a stable transport value for this tab.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Members => "members",
            Self::Collectors => "collectors",
            Self::Payments => "payments",
            Self::AuditLogs => "audit_logs",
            Self::SystemHealth => "system_health",
        }
    }

    /// Returns all tabs in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[DashboardTab] = &[
            DashboardTab::Overview,
            DashboardTab::Members,
            DashboardTab::Collectors,
            DashboardTab::Payments,
            DashboardTab::AuditLogs,
            DashboardTab::SystemHealth,
        ];

        ALL
    }

    /// Base roles that always see this tab.
    #[must_use]
    pub fn required_roles(&self) -> &'static [BaseRole] {
        match self {
            Self::Overview => &[BaseRole::Member, BaseRole::Collector, BaseRole::Admin],
            Self::Members | Self::Payments => &[BaseRole::Collector, BaseRole::Admin],
            Self::Collectors | Self::AuditLogs | Self::SystemHealth => &[BaseRole::Admin],
        }
    }

    /// Permission flag that opens this tab for users outside `required_roles`,
    /// typically through an enhanced role.
    #[must_use]
    pub fn fallback_permission(&self) -> (PermissionCategory, &'static str) {
        match self {
            Self::Overview => (PermissionCategory::Dashboard, "viewDashboard"),
            Self::Members => (PermissionCategory::Users, "viewUsers"),
            Self::Collectors => (PermissionCategory::Collectors, "viewCollectors"),
            Self::Payments => (PermissionCategory::Payments, "viewPayments"),
            Self::AuditLogs => (PermissionCategory::Audit, "viewAuditLogs"),
            Self::SystemHealth => (PermissionCategory::System, "viewHealth"),
        }
    }

    /// Returns whether the tab is shown for `access`.
    #[must_use]
    pub fn is_visible_to(&self, access: Option<&UserAccess>) -> bool {
        if has_any_role(access, self.required_roles()) {
            return true;
        }

        let (category, flag) = self.fallback_permission();
        access.is_some_and(|access| access.allows(category, flag))
    }
}

impl FromStr for DashboardTab {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|tab| tab.as_str() == value)
            .copied()
            .ok_or_else(|| AppError::Validation(format!("unknown dashboard tab '{value}'")))
    }
}

/// Returns the tabs shown for `access`, in display order.
#[must_use]
pub fn visible_tabs(access: Option<&UserAccess>) -> Vec<DashboardTab> {
    DashboardTab::all()
        .iter()
        .copied()
        .filter(|tab| tab.is_visible_to(access))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::access::resolve_permissions;
    use crate::role::{BaseRole, EnhancedRole, Role};

    use super::{DashboardTab, visible_tabs};

    #[test]
    fn member_sees_only_overview() {
        let access = resolve_permissions(&Role::from(BaseRole::Member), &[]);
        assert_eq!(visible_tabs(Some(&access)), vec![DashboardTab::Overview]);
    }

    #[test]
    fn collector_sees_members_and_payments() {
        let access = resolve_permissions(&Role::from(BaseRole::Collector), &[]);
        let tabs = visible_tabs(Some(&access));

        assert!(tabs.contains(&DashboardTab::Members));
        assert!(tabs.contains(&DashboardTab::Payments));
        assert!(!tabs.contains(&DashboardTab::AuditLogs));
    }

    #[test]
    fn admin_sees_every_tab() {
        let access = resolve_permissions(&Role::from(BaseRole::Admin), &[]);
        assert_eq!(visible_tabs(Some(&access)), DashboardTab::all().to_vec());
    }

    #[test]
    fn enhanced_role_opens_tab_through_permission() {
        let access = resolve_permissions(
            &Role::from(BaseRole::Member),
            &[Role::from(EnhancedRole::AuditViewer)],
        );
        assert_eq!(
            visible_tabs(Some(&access)),
            vec![DashboardTab::Overview, DashboardTab::AuditLogs]
        );
    }

    #[test]
    fn no_session_sees_nothing() {
        assert!(visible_tabs(None).is_empty());
    }

    #[test]
    fn tab_roundtrip_transport_value() {
        for tab in DashboardTab::all() {
            assert_eq!(DashboardTab::from_str(tab.as_str()).ok(), Some(*tab));
        }
        assert!(DashboardTab::from_str("receipts").is_err());
    }
}
