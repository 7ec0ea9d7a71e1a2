// SPDX-License-Identifier: PMPL-1.0-or-later
//! Aperture Authz
//!
//! Authorization for the studio suite, on top of the static tables in
//! `aperture-model`:
//!
//! - [`Evaluator`]: pure, role-based grant resolution (super-admin bypass,
//!   direct grant, manage-implies-all) plus page and user-management checks.
//! - [`hierarchy`]: the explicit "who may manage whom" allow-lists.
//! - [`Session`]: the current actor binding; every query fails closed when
//!   nobody is signed in.
//! - [`AuditLog`]: bounded trail of guarded decisions and role assignments.
//! - [`AccessConfig`]: audit settings from JSON and the environment.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod session;

pub use audit::{AccessDecision, AuditEntry, AuditLog};
pub use config::{AccessConfig, AuditConfig};
pub use engine::{Evaluator, Grant};
pub use error::{AuthzError, AuthzResult, ConfigError, SessionError};
pub use hierarchy::{can_manage_role, manageable_roles};
pub use session::{Actor, RoleChange, Session};
