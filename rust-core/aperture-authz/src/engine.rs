// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! Permission evaluation engine.
//!
//! Answers authorization questions for a [`Role`] without reference to any
//! actor or session. Every operation is a total, pure function of its
//! arguments and the borrowed [`PermissionMatrix`], which makes results safe
//! to cache and trivial to test.
//!
//! # Resolution order
//!
//! [`Evaluator::has_permission`] resolves a request in three tiers:
//!
//! 1. **Bypass**: `super_admin` is granted everything without consulting the
//!    table. This is the only hard-coded rule. New resources are covered for
//!    the top role automatically.
//! 2. **Direct**: the permission is literally in the role's grant set.
//! 3. **Via manage**: the role holds `resource::manage` for the requested
//!    resource.
//!
//! Anything else is denied. Tier 3 only works from what the table lists, so
//! other roles do not pick up a new resource until their rows mention it.

use std::collections::BTreeSet;
use std::fmt;

use aperture_model::{Action, Permission, PermissionMatrix, Resource, Role};
use serde::{Deserialize, Serialize};

use crate::hierarchy;

/// Why a permission was or was not granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Unconditional `super_admin` grant.
    Bypass,
    /// Literal entry in the role's grant set.
    Direct,
    /// Covered by `resource::manage`.
    ViaManage,
    Denied,
}

impl Grant {
    pub fn is_granted(self) -> bool {
        !matches!(self, Grant::Denied)
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::Bypass => write!(f, "super_admin bypass"),
            Grant::Direct => write!(f, "direct grant"),
            Grant::ViaManage => write!(f, "implied by manage"),
            Grant::Denied => write!(f, "denied"),
        }
    }
}

/// Evaluates requests against a borrowed permission matrix.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'m> {
    matrix: &'m PermissionMatrix,
}

impl Evaluator<'static> {
    /// Evaluator over the shared built-in studio table.
    pub fn studio() -> Self {
        Self::new(PermissionMatrix::shared())
    }
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::studio()
    }
}

impl<'m> Evaluator<'m> {
    pub fn new(matrix: &'m PermissionMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &'m PermissionMatrix {
        self.matrix
    }

    /// Resolve `permission` for `role` and report which tier decided it.
    pub fn explain(&self, role: Role, permission: Permission) -> Grant {
        if role == Role::SuperAdmin {
            return Grant::Bypass;
        }
        let row = self.matrix.permissions_for_role(role);
        if row.contains(&permission) {
            Grant::Direct
        } else if row.contains(&permission.manage_sibling()) {
            Grant::ViaManage
        } else {
            Grant::Denied
        }
    }

    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.explain(role, permission).is_granted()
    }

    /// `true` if the page is ungated (fail-open) or its gate is granted.
    pub fn can_access_page(&self, role: Role, page: &str) -> bool {
        match self.matrix.gating_permission(page) {
            None => true,
            Some(gate) => self.has_permission(role, gate),
        }
    }

    pub fn can_perform_action(&self, role: Role, resource: Resource, action: Action) -> bool {
        self.has_permission(role, Permission::new(resource, action))
    }

    /// Short-circuits on the first grant. Empty input yields `false`.
    pub fn has_any_permission<I>(&self, role: Role, permissions: I) -> bool
    where
        I: IntoIterator<Item = Permission>,
    {
        permissions.into_iter().any(|p| self.has_permission(role, p))
    }

    /// Short-circuits on the first denial. Empty input yields `true`.
    pub fn has_all_permissions<I>(&self, role: Role, permissions: I) -> bool
    where
        I: IntoIterator<Item = Permission>,
    {
        permissions.into_iter().all(|p| self.has_permission(role, p))
    }

    pub fn can_manage_role(&self, acting: Role, target: Role) -> bool {
        hierarchy::can_manage_role(acting, target)
    }

    /// Needs both `users::edit` and management rights over `target`.
    pub fn can_edit_user(&self, acting: Role, target: Role) -> bool {
        self.has_permission(acting, Permission::new(Resource::Users, Action::Edit))
            && self.can_manage_role(acting, target)
    }

    /// Needs both `users::delete` and management rights over `target`.
    pub fn can_delete_user(&self, acting: Role, target: Role) -> bool {
        self.has_permission(acting, Permission::new(Resource::Users, Action::Delete))
            && self.can_manage_role(acting, target)
    }

    /// Actions `role` may perform on `resource`.
    pub fn allowed_actions(&self, role: Role, resource: Resource) -> BTreeSet<Action> {
        Action::ALL
            .into_iter()
            .filter(|&a| self.can_perform_action(role, resource, a))
            .collect()
    }

    /// Resources on which `role` holds `view`.
    pub fn accessible_resources(&self, role: Role) -> BTreeSet<Resource> {
        Resource::ALL
            .into_iter()
            .filter(|&r| self.can_perform_action(role, r, Action::View))
            .collect()
    }

    /// Every permission that evaluates to granted for `role`.
    pub fn effective_permissions(&self, role: Role) -> BTreeSet<Permission> {
        Permission::all()
            .filter(|&p| self.has_permission(role, p))
            .collect()
    }
}
