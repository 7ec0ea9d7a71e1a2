// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! Aperture Model
//!
//! The closed permission vocabulary of the studio suite and its static
//! tables:
//!
//! - [`Resource`], [`Action`] and [`Role`] are exhaustive enums, so an invalid
//!   value cannot be constructed.
//! - [`Permission`] is a `(Resource, Action)` pair with the canonical string
//!   form `"<resource>::<action>"`.
//! - [`PermissionMatrix`] holds each role's direct grant set.
//! - [`Page`] and [`gating_permission`] map route identifiers to the
//!   permission that gates them.
//!
//! Nothing here decides access. That is the job of the evaluation engine in
//! `aperture-authz`, which layers the super-admin bypass and the
//! manage-implies-all rule on top of these tables.

pub mod action;
pub mod error;
pub mod matrix;
pub mod page;
pub mod permission;
pub mod resource;
pub mod role;

pub use action::Action;
pub use error::{ModelError, ModelResult};
pub use matrix::{studio_grants, MatrixBuilder, PermissionMatrix};
pub use page::{gating_permission, Page};
pub use permission::Permission;
pub use resource::Resource;
pub use role::Role;

/// The role's direct grant set in the built-in studio table.
pub fn permissions_for_role(role: Role) -> &'static std::collections::BTreeSet<Permission> {
    PermissionMatrix::shared().permissions_for_role(role)
}

/// The role's hierarchy level.
pub fn level_of(role: Role) -> u8 {
    role.level()
}
