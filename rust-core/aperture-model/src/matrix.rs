// SPDX-License-Identifier: PMPL-1.0-or-later
//! Role → permission grant tables.
//!
//! The literal rows below are what each role holds *directly*. They are not
//! the whole story for `super_admin`: the evaluation engine grants that role
//! everything without looking here, so its row is informational and
//! intentionally does not mention every resource (see `audit`).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::action::Action::{Create, Delete, Edit, Manage, View};
use crate::page;
use crate::permission::{perm, Permission};
use crate::resource::Resource::{self, *};
use crate::role::Role;

const SUPER_ADMIN_GRANTS: &[Permission] = &[
    perm(Dashboard, Manage),
    perm(Appointments, Manage),
    perm(Contracts, Manage),
    perm(Pricing, Manage),
    perm(Customers, Manage),
    perm(Staff, Manage),
    perm(Accounting, Manage),
    perm(Reports, Manage),
    perm(Settings, Manage),
    perm(Users, Manage),
    perm(Roles, Manage),
];

const ADMIN_GRANTS: &[Permission] = &[
    perm(Dashboard, View),
    perm(Appointments, Manage),
    perm(Contracts, Manage),
    perm(Pricing, Manage),
    perm(Customers, Manage),
    perm(Staff, Manage),
    perm(Accounting, Manage),
    perm(Reports, View),
    perm(Settings, View),
    perm(Settings, Edit),
    perm(Users, View),
    perm(Users, Create),
    perm(Users, Edit),
    perm(Users, Delete),
    perm(Roles, View),
];

const MANAGER_GRANTS: &[Permission] = &[
    perm(Dashboard, View),
    perm(Appointments, Manage),
    perm(Contracts, View),
    perm(Contracts, Create),
    perm(Contracts, Edit),
    perm(Pricing, View),
    perm(Pricing, Edit),
    perm(Customers, Manage),
    perm(Staff, View),
    perm(Staff, Edit),
    perm(Accounting, View),
    perm(Reports, View),
    perm(Users, View),
];

const EMPLOYEE_GRANTS: &[Permission] = &[
    perm(Dashboard, View),
    perm(Appointments, View),
    perm(Appointments, Create),
    perm(Appointments, Edit),
    perm(Contracts, View),
    perm(Pricing, View),
    perm(Customers, View),
    perm(Customers, Create),
    perm(Customers, Edit),
    perm(Staff, View),
];

const GUEST_GRANTS: &[Permission] = &[
    perm(Dashboard, View),
    perm(Appointments, View),
    perm(Pricing, View),
];

/// Literal grant row of the built-in studio table.
pub fn studio_grants(role: Role) -> &'static [Permission] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_GRANTS,
        Role::Admin => ADMIN_GRANTS,
        Role::Manager => MANAGER_GRANTS,
        Role::Employee => EMPLOYEE_GRANTS,
        Role::Guest => GUEST_GRANTS,
    }
}

static EMPTY: BTreeSet<Permission> = BTreeSet::new();

static STUDIO: LazyLock<PermissionMatrix> = LazyLock::new(PermissionMatrix::studio);

/// Immutable role → grant-set table.
///
/// Built once and then only read, so a single instance can be shared across
/// threads without synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl PermissionMatrix {
    /// A matrix with no grants at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in studio table.
    pub fn studio() -> Self {
        Role::ALL
            .into_iter()
            .fold(Self::builder(), |b, role| {
                b.grant(role, studio_grants(role).iter().copied())
            })
            .build()
    }

    /// Process-wide shared instance of [`PermissionMatrix::studio`].
    pub fn shared() -> &'static PermissionMatrix {
        &STUDIO
    }

    pub fn builder() -> MatrixBuilder {
        MatrixBuilder::default()
    }

    /// The role's direct grant set. Never fails; a role without a row has an
    /// empty set.
    pub fn permissions_for_role(&self, role: Role) -> &BTreeSet<Permission> {
        self.grants.get(&role).unwrap_or(&EMPTY)
    }

    /// Returns `true` if `permission` is literally listed for `role`.
    pub fn grants_directly(&self, role: Role, permission: Permission) -> bool {
        self.permissions_for_role(role).contains(&permission)
    }

    pub fn level_of(&self, role: Role) -> u8 {
        role.level()
    }

    /// Gate for a page identifier; `None` means the page is ungated.
    pub fn gating_permission(&self, page: &str) -> Option<Permission> {
        page::gating_permission(page)
    }

    /// Resources mentioned anywhere in the table, for any role.
    pub fn mentioned_resources(&self) -> BTreeSet<Resource> {
        self.grants
            .values()
            .flat_map(|set| set.iter().map(|p| p.resource))
            .collect()
    }
}

/// Assembles a [`PermissionMatrix`]. The finished matrix is immutable.
#[derive(Debug, Default)]
pub struct MatrixBuilder {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl MatrixBuilder {
    /// Add `permissions` to `role`'s row.
    #[must_use]
    pub fn grant(mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.grants.entry(role).or_default().extend(permissions);
        self
    }

    pub fn build(self) -> PermissionMatrix {
        PermissionMatrix {
            grants: self.grants,
        }
    }
}
