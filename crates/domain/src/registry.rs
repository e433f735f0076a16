//! Role registry holding the permission partial of every known role.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::access::UserAccess;
use crate::permission::{
    AuditPermissionsPartial, CollectorPermissionsPartial, DashboardPermissionsPartial,
    PaymentPermissionsPartial, PermissionPartial, PermissionSet, SystemPermissionsPartial,
    UserPermissionsPartial,
};
use crate::role::{BaseRole, EnhancedRole, Role};

const MEMBER_PERMISSIONS: PermissionPartial = PermissionPartial {
    system: Some(SystemPermissionsPartial {
        access_system: Some(true),
        ..SystemPermissionsPartial::uniform(false)
    }),
    dashboard: Some(DashboardPermissionsPartial {
        view_dashboard: Some(true),
        ..DashboardPermissionsPartial::uniform(false)
    }),
    ..PermissionPartial::uniform(false)
};

const COLLECTOR_PERMISSIONS: PermissionPartial = PermissionPartial {
    users: Some(UserPermissionsPartial {
        view_users: Some(true),
        ..UserPermissionsPartial::uniform(false)
    }),
    collectors: Some(CollectorPermissionsPartial {
        view_collectors: Some(true),
        ..CollectorPermissionsPartial::uniform(false)
    }),
    payments: Some(PaymentPermissionsPartial {
        view_payments: Some(true),
        collect_payments: Some(true),
        generate_receipts: Some(true),
        ..PaymentPermissionsPartial::uniform(false)
    }),
    system: Some(SystemPermissionsPartial {
        access_system: Some(true),
        ..SystemPermissionsPartial::uniform(false)
    }),
    audit: Some(AuditPermissionsPartial::uniform(false)),
    dashboard: Some(DashboardPermissionsPartial {
        view_dashboard: Some(true),
        view_analytics: Some(true),
        export_reports: Some(false),
    }),
};

const ADMIN_PERMISSIONS: PermissionPartial = PermissionPartial::uniform(true);

const SYSTEM_ADMIN_PERMISSIONS: PermissionPartial = PermissionPartial {
    system: Some(SystemPermissionsPartial::uniform(true)),
    audit: Some(AuditPermissionsPartial {
        view_audit_logs: Some(true),
        ..AuditPermissionsPartial::EMPTY
    }),
    dashboard: Some(DashboardPermissionsPartial {
        view_analytics: Some(true),
        ..DashboardPermissionsPartial::EMPTY
    }),
    ..PermissionPartial::EMPTY
};

const FINANCIAL_ADMIN_PERMISSIONS: PermissionPartial = PermissionPartial {
    payments: Some(PaymentPermissionsPartial::uniform(true)),
    dashboard: Some(DashboardPermissionsPartial {
        view_analytics: Some(true),
        export_reports: Some(true),
        ..DashboardPermissionsPartial::EMPTY
    }),
    ..PermissionPartial::EMPTY
};

const USER_MANAGER_PERMISSIONS: PermissionPartial = PermissionPartial {
    users: Some(UserPermissionsPartial {
        view_users: Some(true),
        manage_basic_users: Some(true),
        ..UserPermissionsPartial::EMPTY
    }),
    collectors: Some(CollectorPermissionsPartial::uniform(true)),
    ..PermissionPartial::EMPTY
};

const AUDIT_VIEWER_PERMISSIONS: PermissionPartial = PermissionPartial {
    audit: Some(AuditPermissionsPartial::uniform(true)),
    ..PermissionPartial::EMPTY
};

static STANDARD_REGISTRY: LazyLock<RoleRegistry> = LazyLock::new(RoleRegistry::build_standard);

/// Immutable lookup tables mapping role identifiers to permission partials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleRegistry {
    base: BTreeMap<Role, PermissionPartial>,
    enhanced: BTreeMap<Role, PermissionPartial>,
}

impl RoleRegistry {
    /// Creates a registry from explicit base and enhanced tables.
    #[must_use]
    pub fn new(
        base: impl IntoIterator<Item = (Role, PermissionPartial)>,
        enhanced: impl IntoIterator<Item = (Role, PermissionPartial)>,
    ) -> Self {
        Self {
            base: base.into_iter().collect(),
            enhanced: enhanced.into_iter().collect(),
        }
    }

    /// Returns the process-wide registry carrying the association's rules.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_REGISTRY
    }

    fn build_standard() -> Self {
        let base = BaseRole::all()
            .iter()
            .map(|role| (Role::from(*role), base_role_permissions(*role)));
        let enhanced = EnhancedRole::all()
            .iter()
            .map(|role| (Role::from(*role), enhanced_role_permissions(*role)));

        Self::new(base, enhanced)
    }

    /// Returns the partial of a base role, if the role is registered.
    #[must_use]
    pub fn base(&self, role: &Role) -> Option<&PermissionPartial> {
        self.base.get(role)
    }

    /// Returns the partial of an enhanced role, if the role is registered.
    #[must_use]
    pub fn enhanced(&self, role: &Role) -> Option<&PermissionPartial> {
        self.enhanced.get(role)
    }

    /// Iterates over registered base roles.
    pub fn base_roles(&self) -> impl Iterator<Item = (&Role, &PermissionPartial)> {
        self.base.iter()
    }

    /// Iterates over registered enhanced roles.
    pub fn enhanced_roles(&self) -> impl Iterator<Item = (&Role, &PermissionPartial)> {
        self.enhanced.iter()
    }

    /// Resolves the effective access of a user.
    ///
    /// Starts from [`PermissionSet::baseline`], merges the base role partial
    /// and then each enhanced role partial in the order given. The caller owns
    /// that order; when two enhanced roles set the same flag the later one
    /// wins. Unregistered roles contribute nothing.
    #[must_use]
    pub fn resolve(&self, base_role: &Role, enhanced_roles: &[Role]) -> UserAccess {
        let mut permissions = PermissionSet::baseline();

        if let Some(partial) = self.base(base_role) {
            permissions.apply(partial);
        }

        for partial in enhanced_roles.iter().filter_map(|role| self.enhanced(role)) {
            permissions.apply(partial);
        }

        UserAccess::new(base_role.clone(), permissions)
    }
}

fn base_role_permissions(role: BaseRole) -> PermissionPartial {
    match role {
        BaseRole::Member => MEMBER_PERMISSIONS,
        BaseRole::Collector => COLLECTOR_PERMISSIONS,
        BaseRole::Admin => ADMIN_PERMISSIONS,
    }
}

fn enhanced_role_permissions(role: EnhancedRole) -> PermissionPartial {
    match role {
        EnhancedRole::SystemAdmin => SYSTEM_ADMIN_PERMISSIONS,
        EnhancedRole::FinancialAdmin => FINANCIAL_ADMIN_PERMISSIONS,
        EnhancedRole::UserManager => USER_MANAGER_PERMISSIONS,
        EnhancedRole::AuditViewer => AUDIT_VIEWER_PERMISSIONS,
    }
}
