//! Resolved user access and the gate predicates evaluated over it.
//!
//! Every predicate takes `Option<&UserAccess>`: `None` stands for "no
//! session" and denies everything.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::permission::{PermissionCategory, PermissionSet};
use crate::registry::RoleRegistry;
use crate::role::Role;

/// Effective access of one user: the base role and the merged permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccess {
    base_role: Role,
    permissions: PermissionSet,
}

impl UserAccess {
    /// Wraps an already merged permission set.
    #[must_use]
    pub fn new(base_role: Role, permissions: PermissionSet) -> Self {
        Self {
            base_role,
            permissions,
        }
    }

    /// Returns the base role the access was resolved from.
    #[must_use]
    pub fn base_role(&self) -> &Role {
        &self.base_role
    }

    /// Returns the merged permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether a typed category flag is granted.
    #[must_use]
    pub fn allows(&self, category: PermissionCategory, flag: &str) -> bool {
        self.permissions.flag(category, flag).unwrap_or(false)
    }
}

/// Resolves access against the standard registry.
#[must_use]
pub fn resolve_permissions(base_role: &Role, enhanced_roles: &[Role]) -> UserAccess {
    RoleRegistry::standard().resolve(base_role, enhanced_roles)
}

/// Returns whether `flag` in `category` is granted.
///
/// Denies when there is no access or when either name is not part of the
/// permission schema.
#[must_use]
pub fn has_permission(access: Option<&UserAccess>, category: &str, flag: &str) -> bool {
    let Some(access) = access else {
        return false;
    };
    let Ok(category) = PermissionCategory::from_str(category) else {
        return false;
    };

    access.allows(category, flag)
}

/// Returns whether the base role is one of `roles`.
#[must_use]
pub fn has_any_role<R: AsRef<str>>(access: Option<&UserAccess>, roles: &[R]) -> bool {
    access.is_some_and(|access| {
        roles
            .iter()
            .any(|role| role.as_ref() == access.base_role().as_str())
    })
}

/// Returns whether the base role equals every role in `roles`.
///
/// A user holds a single base role, so this only passes for a list naming one
/// distinct role (or an empty list).
#[must_use]
pub fn has_all_roles<R: AsRef<str>>(access: Option<&UserAccess>, roles: &[R]) -> bool {
    access.is_some_and(|access| {
        roles
            .iter()
            .all(|role| role.as_ref() == access.base_role().as_str())
    })
}
