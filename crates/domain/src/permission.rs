//! Fixed permission schema grouped in six categories.
//!
//! Every category is a closed struct of boolean flags with a sparse
//! counterpart where each flag is optional. Flag lookups by name go through
//! generated match tables, so an unknown name resolves to `None` rather than
//! a reflective lookup.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use welfare_core::AppError;

macro_rules! permission_category {
    (
        $(#[$meta:meta])*
        $name:ident / $partial:ident {
            $( $(#[$flag_meta:meta])* $field:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$flag_meta])*
                #[serde(rename = $wire)]
                pub $field: bool,
            )+
        }

        impl $name {
            /// Wire names of every flag in declaration order.
            pub const FLAG_NAMES: &'static [&'static str] = &[$($wire),+];

            /// Returns a category with every flag set to `value`.
            #[must_use]
            pub const fn uniform(value: bool) -> Self {
                Self { $($field: value,)+ }
            }

            /// Returns the flag with the given wire name.
            #[must_use]
            pub fn flag(&self, name: &str) -> Option<bool> {
                match name {
                    $($wire => Some(self.$field),)+
                    _ => None,
                }
            }

            /// Returns every flag paired with its wire name.
            #[must_use]
            pub fn flags(&self) -> Vec<(&'static str, bool)> {
                vec![$(($wire, self.$field)),+]
            }

            /// Overwrites the flags the partial sets and leaves the rest.
            pub fn apply(&mut self, partial: &$partial) {
                $(
                    if let Some(value) = partial.$field {
                        self.$field = value;
                    }
                )+
            }
        }

        #[doc = concat!("Sparse form of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub struct $partial {
            $(
                #[serde(rename = $wire, default, skip_serializing_if = "Option::is_none")]
                #[allow(missing_docs)]
                pub $field: Option<bool>,
            )+
        }

        impl $partial {
            /// A partial without any opinion.
            pub const EMPTY: Self = Self { $($field: None,)+ };

            /// Returns a partial asserting `value` for every flag.
            #[must_use]
            pub const fn uniform(value: bool) -> Self {
                Self { $($field: Some(value),)+ }
            }

            /// Returns the flags this partial sets, paired with their wire names.
            #[must_use]
            pub fn flags(&self) -> Vec<(&'static str, bool)> {
                let mut flags = Vec::new();
                $(
                    if let Some(value) = self.$field {
                        flags.push(($wire, value));
                    }
                )+
                flags
            }
        }
    };
}

permission_category! {
    /// Member account administration.
    UserPermissions / UserPermissionsPartial {
        /// Browse the member directory.
        view_users => "viewUsers",
        /// Register and edit ordinary member accounts.
        manage_basic_users => "manageBasicUsers",
        /// Change base and enhanced role assignments.
        manage_roles => "manageRoles",
        /// Remove member accounts.
        delete_users => "deleteUsers",
    }
}

permission_category! {
    /// Collector roster and member assignment.
    CollectorPermissions / CollectorPermissionsPartial {
        /// Browse collectors.
        view_collectors => "viewCollectors",
        /// Create, edit and deactivate collectors.
        manage_collectors => "manageCollectors",
        /// Assign members to collectors.
        assign_members => "assignMembers",
    }
}

permission_category! {
    /// Contribution collection and receipts.
    PaymentPermissions / PaymentPermissionsPartial {
        /// Browse payment history.
        view_payments => "viewPayments",
        /// Record collected payments.
        collect_payments => "collectPayments",
        /// Approve recorded payments.
        approve_payments => "approvePayments",
        /// Issue payment receipts.
        generate_receipts => "generateReceipts",
        /// Export payment data.
        export_payments => "exportPayments",
    }
}

permission_category! {
    /// Portal-level access and operations.
    SystemPermissions / SystemPermissionsPartial {
        /// Sign in to the portal at all.
        access_system => "accessSystem",
        /// View system health dashboards.
        view_health => "viewHealth",
        /// Change portal settings.
        manage_settings => "manageSettings",
        /// Run integrity checks and other maintenance.
        run_maintenance => "runMaintenance",
    }
}

permission_category! {
    /// Audit trail.
    AuditPermissions / AuditPermissionsPartial {
        /// Read audit log entries.
        view_audit_logs => "viewAuditLogs",
        /// Export audit log entries.
        export_audit_logs => "exportAuditLogs",
    }
}

permission_category! {
    /// Dashboard and reporting.
    DashboardPermissions / DashboardPermissionsPartial {
        /// Open the dashboard.
        view_dashboard => "viewDashboard",
        /// See aggregate statistics.
        view_analytics => "viewAnalytics",
        /// Export dashboard reports.
        export_reports => "exportReports",
    }
}

/// Permission categories of the fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Member account administration.
    Users,
    /// Collector roster.
    Collectors,
    /// Payments and receipts.
    Payments,
    /// Portal access and operations.
    System,
    /// Audit trail.
    Audit,
    /// Dashboard and reporting.
    Dashboard,
}

impl PermissionCategory {
    /// Returns the stable wire name for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Collectors => "collectors",
            Self::Payments => "payments",
            Self::System => "system",
            Self::Audit => "audit",
            Self::Dashboard => "dashboard",
        }
    }

    /// Returns all categories in schema order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionCategory] = &[
            PermissionCategory::Users,
            PermissionCategory::Collectors,
            PermissionCategory::Payments,
            PermissionCategory::System,
            PermissionCategory::Audit,
            PermissionCategory::Dashboard,
        ];

        ALL
    }

    /// Returns the wire names of the flags in this category.
    #[must_use]
    pub fn flag_names(&self) -> &'static [&'static str] {
        match self {
            Self::Users => UserPermissions::FLAG_NAMES,
            Self::Collectors => CollectorPermissions::FLAG_NAMES,
            Self::Payments => PaymentPermissions::FLAG_NAMES,
            Self::System => SystemPermissions::FLAG_NAMES,
            Self::Audit => AuditPermissions::FLAG_NAMES,
            Self::Dashboard => DashboardPermissions::FLAG_NAMES,
        }
    }
}

impl Display for PermissionCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PermissionCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "users" => Ok(Self::Users),
            "collectors" => Ok(Self::Collectors),
            "payments" => Ok(Self::Payments),
            "system" => Ok(Self::System),
            "audit" => Ok(Self::Audit),
            "dashboard" => Ok(Self::Dashboard),
            _ => Err(AppError::Validation(format!(
                "unknown permission category '{value}'"
            ))),
        }
    }
}

/// Fully populated permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Member account administration.
    pub users: UserPermissions,
    /// Collector roster.
    pub collectors: CollectorPermissions,
    /// Payments and receipts.
    pub payments: PaymentPermissions,
    /// Portal access and operations.
    pub system: SystemPermissions,
    /// Audit trail.
    pub audit: AuditPermissions,
    /// Dashboard and reporting.
    pub dashboard: DashboardPermissions,
}

impl PermissionSet {
    /// Baseline granted to any authenticated user before role partials apply:
    /// everything denied except opening the dashboard and signing in.
    #[must_use]
    pub const fn baseline() -> Self {
        let mut permissions = Self::uniform(false);
        permissions.dashboard.view_dashboard = true;
        permissions.system.access_system = true;
        permissions
    }

    /// Returns a set with every flag of every category set to `value`.
    #[must_use]
    pub const fn uniform(value: bool) -> Self {
        Self {
            users: UserPermissions::uniform(value),
            collectors: CollectorPermissions::uniform(value),
            payments: PaymentPermissions::uniform(value),
            system: SystemPermissions::uniform(value),
            audit: AuditPermissions::uniform(value),
            dashboard: DashboardPermissions::uniform(value),
        }
    }

    /// Deep-merges a partial: present flags overwrite, absent ones are kept.
    pub fn apply(&mut self, partial: &PermissionPartial) {
        if let Some(users) = &partial.users {
            self.users.apply(users);
        }
        if let Some(collectors) = &partial.collectors {
            self.collectors.apply(collectors);
        }
        if let Some(payments) = &partial.payments {
            self.payments.apply(payments);
        }
        if let Some(system) = &partial.system {
            self.system.apply(system);
        }
        if let Some(audit) = &partial.audit {
            self.audit.apply(audit);
        }
        if let Some(dashboard) = &partial.dashboard {
            self.dashboard.apply(dashboard);
        }
    }

    /// Returns the flag named `name` in `category`, or `None` if the
    /// category has no such flag.
    #[must_use]
    pub fn flag(&self, category: PermissionCategory, name: &str) -> Option<bool> {
        match category {
            PermissionCategory::Users => self.users.flag(name),
            PermissionCategory::Collectors => self.collectors.flag(name),
            PermissionCategory::Payments => self.payments.flag(name),
            PermissionCategory::System => self.system.flag(name),
            PermissionCategory::Audit => self.audit.flag(name),
            PermissionCategory::Dashboard => self.dashboard.flag(name),
        }
    }

    /// Returns every flag of every category in schema order.
    #[must_use]
    pub fn flags(&self) -> Vec<(PermissionCategory, &'static str, bool)> {
        PermissionCategory::all()
            .iter()
            .flat_map(|category| {
                self.category_flags(*category)
                    .into_iter()
                    .map(move |(name, value)| (*category, name, value))
            })
            .collect()
    }

    fn category_flags(&self, category: PermissionCategory) -> Vec<(&'static str, bool)> {
        match category {
            PermissionCategory::Users => self.users.flags(),
            PermissionCategory::Collectors => self.collectors.flags(),
            PermissionCategory::Payments => self.payments.flags(),
            PermissionCategory::System => self.system.flags(),
            PermissionCategory::Audit => self.audit.flags(),
            PermissionCategory::Dashboard => self.dashboard.flags(),
        }
    }
}

/// Sparse permission record contributed by one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionPartial {
    /// Member account administration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<UserPermissionsPartial>,
    /// Collector roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collectors: Option<CollectorPermissionsPartial>,
    /// Payments and receipts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments: Option<PaymentPermissionsPartial>,
    /// Portal access and operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemPermissionsPartial>,
    /// Audit trail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditPermissionsPartial>,
    /// Dashboard and reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardPermissionsPartial>,
}

impl PermissionPartial {
    /// A partial without any opinion.
    pub const EMPTY: Self = Self {
        users: None,
        collectors: None,
        payments: None,
        system: None,
        audit: None,
        dashboard: None,
    };

    /// Returns a partial asserting `value` for every flag of every category.
    #[must_use]
    pub const fn uniform(value: bool) -> Self {
        Self {
            users: Some(UserPermissionsPartial::uniform(value)),
            collectors: Some(CollectorPermissionsPartial::uniform(value)),
            payments: Some(PaymentPermissionsPartial::uniform(value)),
            system: Some(SystemPermissionsPartial::uniform(value)),
            audit: Some(AuditPermissionsPartial::uniform(value)),
            dashboard: Some(DashboardPermissionsPartial::uniform(value)),
        }
    }

    /// Returns the flags this partial asserts, in schema order.
    #[must_use]
    pub fn flags(&self) -> Vec<(PermissionCategory, &'static str, bool)> {
        let categories = [
            (PermissionCategory::Users, self.users.map(|value| value.flags())),
            (
                PermissionCategory::Collectors,
                self.collectors.map(|value| value.flags()),
            ),
            (
                PermissionCategory::Payments,
                self.payments.map(|value| value.flags()),
            ),
            (PermissionCategory::System, self.system.map(|value| value.flags())),
            (PermissionCategory::Audit, self.audit.map(|value| value.flags())),
            (
                PermissionCategory::Dashboard,
                self.dashboard.map(|value| value.flags()),
            ),
        ];

        categories
            .into_iter()
            .filter_map(|(category, flags)| flags.map(|flags| (category, flags)))
            .flat_map(|(category, flags)| {
                flags
                    .into_iter()
                    .map(move |(name, value)| (category, name, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{
        AuditPermissionsPartial, PermissionCategory, PermissionPartial, PermissionSet,
        UserPermissionsPartial,
    };

    #[test]
    fn baseline_grants_only_dashboard_and_system_access() {
        let baseline = PermissionSet::baseline();
        let granted: Vec<_> = baseline
            .flags()
            .into_iter()
            .filter(|(_, _, value)| *value)
            .map(|(category, name, _)| (category, name))
            .collect();

        assert_eq!(
            granted,
            vec![
                (PermissionCategory::System, "accessSystem"),
                (PermissionCategory::Dashboard, "viewDashboard"),
            ]
        );
    }

    #[test]
    fn schema_has_twenty_one_flags() {
        let total: usize = PermissionCategory::all()
            .iter()
            .map(|category| category.flag_names().len())
            .sum();
        assert_eq!(total, 21);
        assert_eq!(PermissionSet::baseline().flags().len(), 21);
    }

    #[test]
    fn apply_leaves_unmentioned_flags_untouched() {
        let mut permissions = PermissionSet::uniform(true);
        permissions.apply(&PermissionPartial {
            users: Some(UserPermissionsPartial {
                delete_users: Some(false),
                ..UserPermissionsPartial::EMPTY
            }),
            ..PermissionPartial::EMPTY
        });

        assert!(!permissions.users.delete_users);
        assert!(permissions.users.manage_roles);
        assert!(permissions.payments.approve_payments);
    }

    #[test]
    fn unknown_flag_name_is_none() {
        let permissions = PermissionSet::uniform(true);
        assert_eq!(
            permissions.flag(PermissionCategory::Users, "manage_roles"),
            None
        );
        assert_eq!(
            permissions.flag(PermissionCategory::Users, "manageRoles"),
            Some(true)
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(PermissionCategory::from_str("receipts").is_err());
    }

    #[test]
    fn partial_serializes_only_asserted_flags() {
        let partial = PermissionPartial {
            audit: Some(AuditPermissionsPartial {
                view_audit_logs: Some(true),
                ..AuditPermissionsPartial::EMPTY
            }),
            ..PermissionPartial::EMPTY
        };

        let value = serde_json::to_value(partial).unwrap_or_default();
        assert_eq!(value, serde_json::json!({ "audit": { "viewAuditLogs": true } }));
    }

    #[test]
    fn permission_set_serializes_every_flag_as_bool() {
        let value = serde_json::to_value(PermissionSet::baseline()).unwrap_or_default();

        for category in PermissionCategory::all() {
            let object = value
                .get(category.as_str())
                .and_then(serde_json::Value::as_object)
                .cloned()
                .unwrap_or_default();
            assert_eq!(object.len(), category.flag_names().len());
            for name in category.flag_names() {
                assert!(object.get(*name).is_some_and(serde_json::Value::is_boolean));
            }
        }
    }
}
