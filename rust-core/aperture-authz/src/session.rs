// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! Identity/session binding.
//!
//! A [`Session`] holds the current actor (or none, before login) and answers
//! every access question by handing the actor's role to the
//! [`Evaluator`]. Sessions are ordinary values: a server creates one per
//! connection or request, never a process-wide one, so distinct actors
//! cannot observe each other's bindings.
//!
//! # Lifecycle
//!
//! ```text
//!   none ──login──▶ bound(role) ──update_role──▶ bound(role')
//!    ▲                  │
//!    └─────logout───────┘
//! ```
//!
//! Any other transition is rejected with [`SessionError`] and leaves the
//! session unchanged.
//!
//! # Defaults
//!
//! With no actor bound, every query returns `false` (or an empty set),
//! including page queries for pages that have no gate. The fail-open page
//! default only applies to signed-in actors.
//!
//! # Example
//!
//! ```
//! use aperture_authz::{Actor, Session};
//! use aperture_model::Role;
//!
//! let mut session = Session::new();
//! assert!(!session.can_access_page("pricing"));
//!
//! session.login(Actor::new("anna", Role::Guest)).unwrap();
//! assert!(session.can_access_page("pricing"));
//! assert!(session.is_guest());
//! assert!(!session.is_employee());
//! ```

use std::collections::BTreeSet;
use std::fmt;

use aperture_model::{Action, Permission, PermissionMatrix, Resource, Role};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audit::{AccessDecision, AuditEntry, AuditLog};
use crate::config::AccessConfig;
use crate::engine::Evaluator;
use crate::error::{AuthzError, AuthzResult, SessionError};

/// An authenticated actor as supplied by the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.role)
    }
}

/// A role-update event from the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub actor_id: String,
    pub role: Role,
}

/// The current actor binding plus the evaluator it is checked against.
#[derive(Debug, Clone)]
pub struct Session<'m> {
    actor: Option<Actor>,
    evaluator: Evaluator<'m>,
    audit: Option<AuditLog>,
    record_grants: bool,
}

impl Session<'static> {
    /// An unbound session over the built-in studio table, without auditing.
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::studio())
    }

    /// An unbound session over the studio table, audited as `config` says.
    pub fn from_config(config: &AccessConfig) -> Self {
        let session = Self::new();
        match config.audit_log() {
            Some(log) => session.with_audit(log, config.audit.record_grants),
            None => session,
        }
    }
}

impl Default for Session<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'m> Session<'m> {
    pub fn with_matrix(matrix: &'m PermissionMatrix) -> Self {
        Self::with_evaluator(Evaluator::new(matrix))
    }

    pub fn with_evaluator(evaluator: Evaluator<'m>) -> Self {
        Self {
            actor: None,
            evaluator,
            audit: None,
            record_grants: false,
        }
    }

    /// Attach an audit log. Denials are always recorded; grants only when
    /// `record_grants` is set.
    #[must_use]
    pub fn with_audit(mut self, log: AuditLog, record_grants: bool) -> Self {
        self.audit = Some(log);
        self.record_grants = record_grants;
        self
    }

    pub fn audit_log(&self) -> Option<&AuditLog> {
        self.audit.as_ref()
    }

    pub fn evaluator(&self) -> Evaluator<'m> {
        self.evaluator
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Bind `actor`. Fails if another actor is already bound.
    pub fn login(&mut self, actor: Actor) -> Result<(), SessionError> {
        if let Some(current) = &self.actor {
            return Err(SessionError::AlreadyBound {
                actor: current.id.clone(),
            });
        }
        info!(actor = %actor.id, role = %actor.role, "session bound");
        self.actor = Some(actor);
        Ok(())
    }

    /// Rebind the current actor to `role`, returning the previous role.
    pub fn update_role(&mut self, role: Role) -> Result<Role, SessionError> {
        let actor = self.actor.as_mut().ok_or(SessionError::NotBound)?;
        let previous = std::mem::replace(&mut actor.role, role);
        info!(actor = %actor.id, from = %previous, to = %role, "session role updated");
        Ok(previous)
    }

    /// Unbind and return the actor.
    pub fn logout(&mut self) -> Result<Actor, SessionError> {
        let actor = self.actor.take().ok_or(SessionError::NotBound)?;
        info!(actor = %actor.id, "session ended");
        Ok(actor)
    }

    /// Apply a directory event if it concerns the bound actor. Returns
    /// whether the binding changed.
    pub fn apply_role_change(&mut self, change: &RoleChange) -> bool {
        match &self.actor {
            Some(actor) if actor.id == change.actor_id && actor.role != change.role => {
                self.update_role(change.role).is_ok()
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Identity view
    // -----------------------------------------------------------------------

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.actor.as_ref().map(|a| a.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_some()
    }

    pub fn is_super_admin(&self) -> bool {
        self.current_role() == Some(Role::SuperAdmin)
    }

    /// Admin or above.
    pub fn is_admin(&self) -> bool {
        self.current_role() == Some(Role::Admin) || self.is_super_admin()
    }

    /// Manager or above.
    pub fn is_manager(&self) -> bool {
        self.current_role() == Some(Role::Manager) || self.is_admin()
    }

    /// Employee or above.
    pub fn is_employee(&self) -> bool {
        self.current_role() == Some(Role::Employee) || self.is_manager()
    }

    /// Exactly guest; nothing ranks below it.
    pub fn is_guest(&self) -> bool {
        self.current_role() == Some(Role::Guest)
    }

    // -----------------------------------------------------------------------
    // Queries (fail-closed without an actor)
    // -----------------------------------------------------------------------

    fn with_role(&self, query: impl FnOnce(Role) -> bool) -> bool {
        self.current_role().is_some_and(query)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.with_role(|r| self.evaluator.has_permission(r, permission))
    }

    pub fn has_any_permission<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = Permission>,
    {
        self.with_role(|r| self.evaluator.has_any_permission(r, permissions))
    }

    pub fn has_all_permissions<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = Permission>,
    {
        self.with_role(|r| self.evaluator.has_all_permissions(r, permissions))
    }

    pub fn can_access_page(&self, page: &str) -> bool {
        self.with_role(|r| self.evaluator.can_access_page(r, page))
    }

    pub fn can_perform_action(&self, resource: Resource, action: Action) -> bool {
        self.with_role(|r| self.evaluator.can_perform_action(r, resource, action))
    }

    pub fn can_manage_role(&self, target: Role) -> bool {
        self.with_role(|r| self.evaluator.can_manage_role(r, target))
    }

    pub fn can_edit_user(&self, target: Role) -> bool {
        self.with_role(|r| self.evaluator.can_edit_user(r, target))
    }

    pub fn can_delete_user(&self, target: Role) -> bool {
        self.with_role(|r| self.evaluator.can_delete_user(r, target))
    }

    /// Actions the current actor may perform on `resource`.
    pub fn allowed_actions(&self, resource: Resource) -> BTreeSet<Action> {
        self.current_role()
            .map(|r| self.evaluator.allowed_actions(r, resource))
            .unwrap_or_default()
    }

    /// Resources the current actor may view.
    pub fn accessible_resources(&self) -> BTreeSet<Resource> {
        self.current_role()
            .map(|r| self.evaluator.accessible_resources(r))
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    fn record(&self, subject: &str, granted: bool, reason: impl Into<String>) {
        let Some(log) = &self.audit else {
            return;
        };
        if granted && !self.record_grants {
            return;
        }
        let actor = self.actor.as_ref();
        let entry = AuditEntry::new(
            actor.map(|a| a.id.as_str()),
            actor.map(|a| a.role),
            subject,
            AccessDecision::from(granted),
        )
        .with_reason(reason);
        log.record(entry);
    }

    fn require_role(&self, subject: &str) -> AuthzResult<Role> {
        match self.current_role() {
            Some(role) => Ok(role),
            None => {
                warn!(subject = %subject, "access DENIED: not signed in");
                self.record(subject, false, "not signed in");
                Err(AuthzError::Unauthenticated)
            }
        }
    }

    /// Like [`has_permission`](Self::has_permission) but reports why a
    /// request was refused.
    pub fn require_permission(&self, permission: Permission) -> AuthzResult<()> {
        let subject = permission.to_string();
        let role = self.require_role(&subject)?;
        let grant = self.evaluator.explain(role, permission);
        if grant.is_granted() {
            debug!(role = %role, permission = %permission, via = %grant, "access ALLOWED");
            self.record(&subject, true, grant.to_string());
            Ok(())
        } else {
            warn!(role = %role, permission = %permission, "access DENIED");
            self.record(&subject, false, "no grant");
            Err(AuthzError::MissingPermission { role, permission })
        }
    }

    pub fn require_action(&self, resource: Resource, action: Action) -> AuthzResult<()> {
        self.require_permission(Permission::new(resource, action))
    }

    /// Guard for opening a page. Ungated pages pass for any signed-in actor.
    pub fn require_page(&self, page: &str) -> AuthzResult<()> {
        let role = self.require_role(page)?;
        let Some(gate) = self.evaluator.matrix().gating_permission(page) else {
            debug!(role = %role, page = %page, "page ungated, access ALLOWED");
            self.record(page, true, "ungated page");
            return Ok(());
        };
        if self.evaluator.has_permission(role, gate) {
            debug!(role = %role, page = %page, permission = %gate, "page access ALLOWED");
            self.record(page, true, format!("holds {gate}"));
            Ok(())
        } else {
            warn!(role = %role, page = %page, permission = %gate, "page access DENIED");
            self.record(page, false, format!("requires {gate}"));
            Err(AuthzError::PageDenied {
                role,
                page: page.to_string(),
                permission: gate,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------------

    /// Move the actor bound to `target` to `role`, acting as this session.
    ///
    /// Requires that this session may edit users holding the target's
    /// current role *and* may manage `role` itself, so nobody can promote a
    /// user past what they could manage. On success the target session is
    /// rebound and the matching directory event is returned.
    pub fn assign_role(&self, target: &mut Session<'_>, role: Role) -> AuthzResult<RoleChange> {
        let subject = format!("role:{role}");
        let acting = self.require_role(&subject)?;
        let target_actor = target.actor().ok_or(SessionError::NotBound)?;
        let (target_id, target_role) = (target_actor.id.clone(), target_actor.role);

        if !self.evaluator.can_edit_user(acting, target_role) {
            warn!(acting = %acting, target = %target_id, target_role = %target_role, "role assignment DENIED: cannot edit user");
            self.record(&subject, false, format!("cannot edit {target_role} user {target_id}"));
            return Err(AuthzError::CannotEditUser {
                acting,
                target: target_role,
            });
        }
        if !self.evaluator.can_manage_role(acting, role) {
            warn!(acting = %acting, target = %target_id, role = %role, "role assignment DENIED: cannot assign role");
            self.record(&subject, false, format!("cannot assign {role}"));
            return Err(AuthzError::CannotAssignRole { acting, role });
        }

        target.update_role(role)?;
        self.record(&subject, true, format!("{target_id}: {target_role} -> {role}"));
        Ok(RoleChange {
            actor_id: target_id,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> Permission {
        text.parse().unwrap()
    }

    fn bound(id: &str, role: Role) -> Session<'static> {
        let mut session = Session::new();
        session.login(Actor::new(id, role)).unwrap();
        session
    }

    #[test]
    fn test_unbound_session_denies_everything() {
        let session = Session::new();
        assert_eq!(session.current_role(), None);
        assert!(!session.has_permission(p("dashboard::view")));
        assert!(!session.can_access_page("dashboard"));
        assert!(!session.can_access_page("nonexistent-page-xyz"));
        assert!(!session.can_perform_action(Resource::Pricing, Action::View));
        assert!(!session.has_all_permissions(Vec::<Permission>::new()));
        assert!(!session.can_manage_role(Role::Guest));
        assert!(!session.can_edit_user(Role::Guest));
        assert!(!session.can_delete_user(Role::Guest));
        assert!(session.allowed_actions(Resource::Dashboard).is_empty());
        assert!(session.accessible_resources().is_empty());
    }

    #[test]
    fn test_predicates_are_cumulative_except_guest() {
        let expect = [
            // role, super, admin, manager, employee, guest
            (Role::SuperAdmin, [true, true, true, true, false]),
            (Role::Admin, [false, true, true, true, false]),
            (Role::Manager, [false, false, true, true, false]),
            (Role::Employee, [false, false, false, true, false]),
            (Role::Guest, [false, false, false, false, true]),
        ];
        for (role, flags) in expect {
            let s = bound("x", role);
            let got = [
                s.is_super_admin(),
                s.is_admin(),
                s.is_manager(),
                s.is_employee(),
                s.is_guest(),
            ];
            assert_eq!(got, flags, "{role}");
        }

        let none = Session::new();
        assert!(!none.is_super_admin() && !none.is_employee() && !none.is_guest());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut session = Session::new();
        assert_eq!(session.update_role(Role::Admin), Err(SessionError::NotBound));
        assert!(matches!(session.logout(), Err(SessionError::NotBound)));

        session.login(Actor::new("bea", Role::Employee)).unwrap();
        assert_eq!(
            session.login(Actor::new("carl", Role::Admin)),
            Err(SessionError::AlreadyBound {
                actor: "bea".to_string()
            })
        );
        assert_eq!(session.actor().map(|a| a.id.as_str()), Some("bea"));

        assert_eq!(session.update_role(Role::Manager), Ok(Role::Employee));
        assert_eq!(session.current_role(), Some(Role::Manager));

        let actor = session.logout().unwrap();
        assert_eq!(actor, Actor::new("bea", Role::Manager));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_queries_follow_current_role() {
        let mut session = bound("dan", Role::Guest);
        assert!(session.can_access_page("pricing"));
        assert!(!session.can_access_page("contracts"));
        assert!(session.can_access_page("nonexistent-page-xyz"));

        session.update_role(Role::Employee).unwrap();
        assert!(session.can_access_page("contracts"));
        assert_eq!(
            session.allowed_actions(Resource::Customers),
            BTreeSet::from([Action::View, Action::Create, Action::Edit])
        );
    }

    #[test]
    fn test_apply_role_change_targets_bound_actor_only() {
        let mut session = bound("eve", Role::Employee);
        let other = RoleChange {
            actor_id: "frank".to_string(),
            role: Role::Admin,
        };
        assert!(!session.apply_role_change(&other));
        assert_eq!(session.current_role(), Some(Role::Employee));

        let mine = RoleChange {
            actor_id: "eve".to_string(),
            role: Role::Manager,
        };
        assert!(session.apply_role_change(&mine));
        assert!(!session.apply_role_change(&mine));
        assert_eq!(session.current_role(), Some(Role::Manager));

        let mut empty = Session::new();
        assert!(!empty.apply_role_change(&mine));
    }

    #[test]
    fn test_require_permission_reports_missing_grant() {
        let session = bound("gus", Role::Manager);
        assert!(session.require_permission(p("accounting::view")).is_ok());
        assert_eq!(
            session.require_permission(p("accounting::edit")),
            Err(AuthzError::MissingPermission {
                role: Role::Manager,
                permission: p("accounting::edit"),
            })
        );
        assert_eq!(
            Session::new().require_action(Resource::Dashboard, Action::View),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn test_require_page() {
        let session = bound("hal", Role::Employee);
        assert!(session.require_page("appointments").is_ok());
        assert!(session.require_page("nonexistent-page-xyz").is_ok());
        assert_eq!(
            session.require_page("accounting"),
            Err(AuthzError::PageDenied {
                role: Role::Employee,
                page: "accounting".to_string(),
                permission: p("accounting::view"),
            })
        );
        assert_eq!(
            Session::new().require_page("nonexistent-page-xyz"),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn test_guards_write_audit_trail() {
        let log = AuditLog::new(100);
        let mut session = Session::new().with_audit(log.clone(), false);
        let _ = session.require_page("dashboard");
        session.login(Actor::new("ivy", Role::Guest)).unwrap();
        let _ = session.require_page("pricing");
        let _ = session.require_permission(p("contracts::view"));

        let entries = log.entries();
        assert_eq!(entries.len(), 2, "grants are not recorded by default");
        assert_eq!(entries[0].actor_id, None);
        assert_eq!(entries[0].subject, "dashboard");
        assert_eq!(entries[1].actor_id.as_deref(), Some("ivy"));
        assert_eq!(entries[1].subject, "contracts::view");
        assert!(entries.iter().all(|e| e.decision == AccessDecision::Denied));
        assert_eq!(entries[0].reason.as_deref(), Some("not signed in"));
        assert_eq!(entries[1].reason.as_deref(), Some("no grant"));
    }

    #[test]
    fn test_record_grants_from_config() {
        let mut config = AccessConfig::default();
        config.audit.record_grants = true;
        let mut session = Session::from_config(&config);
        session.login(Actor::new("jo", Role::Admin)).unwrap();
        session.require_permission(p("contracts::delete")).unwrap();

        let entries = session.audit_log().unwrap().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].decision, AccessDecision::Allowed);
        assert_eq!(entries[0].reason.as_deref(), Some("implied by manage"));
    }

    #[test]
    fn test_assign_role_rules() {
        let admin = bound("kim", Role::Admin);
        let manager = bound("lou", Role::Manager);
        let mut employee = bound("max", Role::Employee);

        // Manager can manage employees but holds no users::edit.
        assert_eq!(
            manager.assign_role(&mut employee, Role::Guest),
            Err(AuthzError::CannotEditUser {
                acting: Role::Manager,
                target: Role::Employee
            })
        );

        // Admin cannot hand out a role at or above its own.
        assert_eq!(
            admin.assign_role(&mut employee, Role::Admin),
            Err(AuthzError::CannotAssignRole {
                acting: Role::Admin,
                role: Role::Admin
            })
        );
        assert_eq!(employee.current_role(), Some(Role::Employee));

        let change = admin.assign_role(&mut employee, Role::Manager).unwrap();
        assert_eq!(
            change,
            RoleChange {
                actor_id: "max".to_string(),
                role: Role::Manager
            }
        );
        assert!(employee.is_manager());
    }

    #[test]
    fn test_assign_role_needs_bound_sessions() {
        let admin = bound("ned", Role::Admin);
        let mut nobody = Session::new();
        assert_eq!(
            admin.assign_role(&mut nobody, Role::Guest),
            Err(AuthzError::Session(SessionError::NotBound))
        );
        let mut guest = bound("oli", Role::Guest);
        assert_eq!(
            Session::new().assign_role(&mut guest, Role::Employee),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn test_sessions_are_isolated() {
        let a = bound("pam", Role::SuperAdmin);
        let b = bound("quinn", Role::Guest);
        assert!(a.has_permission(p("audit::view")));
        assert!(!b.has_permission(p("audit::view")));
    }

    #[test]
    fn test_custom_matrix_session() {
        let matrix = PermissionMatrix::builder()
            .grant(Role::Guest, [p("reports::manage")])
            .build();
        let mut session = Session::with_matrix(&matrix);
        session.login(Actor::new("rae", Role::Guest)).unwrap();
        assert!(session.has_permission(p("reports::delete")));
        assert!(!session.has_permission(p("dashboard::view")));
    }
}
