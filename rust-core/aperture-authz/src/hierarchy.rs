// SPDX-License-Identifier: PMPL-1.0-or-later
//! Who may manage whom.
//!
//! Management rights are an explicit allow-list per acting role. They are
//! not computed from [`Role::level`]: renumbering levels must never change
//! who can edit whom.

use aperture_model::Role;

const SUPER_ADMIN_MANAGES: &[Role] = &Role::ALL;
const ADMIN_MANAGES: &[Role] = &[Role::Manager, Role::Employee, Role::Guest];
const MANAGER_MANAGES: &[Role] = &[Role::Employee, Role::Guest];
const NOBODY: &[Role] = &[];

/// Roles that `acting` may manage (assign, edit, remove).
pub fn manageable_roles(acting: Role) -> &'static [Role] {
    match acting {
        Role::SuperAdmin => SUPER_ADMIN_MANAGES,
        Role::Admin => ADMIN_MANAGES,
        Role::Manager => MANAGER_MANAGES,
        Role::Employee | Role::Guest => NOBODY,
    }
}

pub fn can_manage_role(acting: Role, target: Role) -> bool {
    manageable_roles(acting).contains(&target)
}
