// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Reports produced by the `aperture` subcommands.
//!
//! Every report is a plain serializable struct so the same data can be
//! printed as a `comfy-table` or as pretty JSON.

use std::collections::{BTreeMap, BTreeSet};

use aperture_authz::{AccessDecision, AuditEntry, Evaluator, Grant};
use aperture_model::{Action, Page, Permission, Resource, Role};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;

/// Anything that can be shown as a table.
pub trait Render {
    fn table(&self) -> Table;
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h)));
    table
}

fn decision_cell(decision: AccessDecision) -> Cell {
    let text = match decision {
        AccessDecision::Allowed => decision.to_string().green().bold(),
        AccessDecision::Denied => decision.to_string().red().bold(),
    };
    Cell::new(text)
}

fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

/// Compact cell text for a set of actions on one resource.
fn actions_cell(actions: &BTreeSet<Action>) -> String {
    if actions.len() == Action::ALL.len() {
        "manage".to_string()
    } else {
        join(actions)
    }
}

// ---------------------------------------------------------------------------
// matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MatrixRow {
    pub resource: Resource,
    pub label: &'static str,
    pub actions: BTreeMap<Role, BTreeSet<Action>>,
}

/// Effective actions for every (resource, role) pair.
#[derive(Debug, Serialize)]
pub struct MatrixReport {
    pub rows: Vec<MatrixRow>,
}

impl MatrixReport {
    pub fn build(engine: &Evaluator<'_>) -> Self {
        let rows = Resource::ALL
            .into_iter()
            .map(|resource| MatrixRow {
                resource,
                label: resource.label(),
                actions: Role::ALL
                    .into_iter()
                    .map(|role| (role, engine.allowed_actions(role, resource)))
                    .collect(),
            })
            .collect();
        Self { rows }
    }
}

impl Render for MatrixReport {
    fn table(&self) -> Table {
        let mut header = vec!["resource"];
        header.extend(Role::ALL.iter().map(|r| r.as_str()));
        let mut table = new_table(&header);
        for row in &self.rows {
            let mut cells = vec![Cell::new(row.resource)];
            cells.extend(Role::ALL.iter().map(|role| {
                Cell::new(row.actions.get(role).map(actions_cell).unwrap_or_default())
            }));
            table.add_row(cells);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub role: Role,
    pub permission: Permission,
    pub decision: AccessDecision,
    pub grant: Grant,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audit: Vec<AuditEntry>,
}

impl CheckReport {
    pub fn build(engine: &Evaluator<'_>, role: Role, permission: Permission) -> Self {
        let grant = engine.explain(role, permission);
        Self {
            role,
            permission,
            decision: grant.is_granted().into(),
            grant,
            audit: Vec::new(),
        }
    }
}

impl Render for CheckReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["role", "permission", "decision", "reason"]);
        table.add_row(vec![
            Cell::new(self.role),
            Cell::new(self.permission),
            decision_cell(self.decision),
            Cell::new(self.grant),
        ]);
        table
    }
}

// ---------------------------------------------------------------------------
// page
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PageReport {
    pub role: Role,
    pub page: String,
    /// `None` for identifiers that are not known pages.
    pub gate: Option<Permission>,
    pub decision: AccessDecision,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audit: Vec<AuditEntry>,
}

impl PageReport {
    pub fn build(engine: &Evaluator<'_>, role: Role, page: &str) -> Self {
        Self {
            role,
            page: page.to_string(),
            gate: engine.matrix().gating_permission(page),
            decision: engine.can_access_page(role, page).into(),
            audit: Vec::new(),
        }
    }
}

impl Render for PageReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["role", "page", "gate", "decision"]);
        table.add_row(vec![
            Cell::new(self.role),
            Cell::new(&self.page),
            Cell::new(
                self.gate
                    .map(|g| g.to_string())
                    .unwrap_or_else(|| "(ungated)".to_string()),
            ),
            decision_cell(self.decision),
        ]);
        table
    }
}

// ---------------------------------------------------------------------------
// manage
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ManageReport {
    pub acting: Role,
    pub target: Role,
    pub can_manage_role: bool,
    pub can_edit_user: bool,
    pub can_delete_user: bool,
}

impl ManageReport {
    pub fn build(engine: &Evaluator<'_>, acting: Role, target: Role) -> Self {
        Self {
            acting,
            target,
            can_manage_role: engine.can_manage_role(acting, target),
            can_edit_user: engine.can_edit_user(acting, target),
            can_delete_user: engine.can_delete_user(acting, target),
        }
    }
}

impl Render for ManageReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["acting", "target", "check", "decision"]);
        for (check, allowed) in [
            ("manage role", self.can_manage_role),
            ("edit user", self.can_edit_user),
            ("delete user", self.can_delete_user),
        ] {
            table.add_row(vec![
                Cell::new(self.acting),
                Cell::new(self.target),
                Cell::new(check),
                decision_cell(allowed.into()),
            ]);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// actions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ActionsReport {
    pub role: Role,
    pub resource: Resource,
    pub actions: BTreeSet<Action>,
}

impl ActionsReport {
    pub fn build(engine: &Evaluator<'_>, role: Role, resource: Resource) -> Self {
        Self {
            role,
            resource,
            actions: engine.allowed_actions(role, resource),
        }
    }
}

impl Render for ActionsReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["role", "resource", "allowed actions"]);
        table.add_row(vec![
            Cell::new(self.role),
            Cell::new(self.resource),
            Cell::new(join(&self.actions)),
        ]);
        table
    }
}

// ---------------------------------------------------------------------------
// pages / roles
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PageGate {
    pub page: Page,
    pub gate: Permission,
    pub roles: Vec<Role>,
}

/// Every known page, its gate and the roles that may open it.
#[derive(Debug, Serialize)]
pub struct PagesReport {
    pub pages: Vec<PageGate>,
}

impl PagesReport {
    pub fn build(engine: &Evaluator<'_>) -> Self {
        let pages = Page::ALL
            .into_iter()
            .map(|page| PageGate {
                page,
                gate: page.gate(),
                roles: Role::ALL
                    .into_iter()
                    .filter(|&r| engine.can_access_page(r, page.id()))
                    .collect(),
            })
            .collect();
        Self { pages }
    }
}

impl Render for PagesReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["page", "gate", "roles"]);
        for entry in &self.pages {
            table.add_row(vec![
                Cell::new(entry.page),
                Cell::new(entry.gate),
                Cell::new(join(&entry.roles)),
            ]);
        }
        table
    }
}

#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub role: Role,
    pub level: u8,
    pub label: &'static str,
    pub manages: Vec<Role>,
    pub direct_grants: usize,
}

#[derive(Debug, Serialize)]
pub struct RolesReport {
    pub roles: Vec<RoleInfo>,
}

impl RolesReport {
    pub fn build(engine: &Evaluator<'_>) -> Self {
        let roles = Role::ALL
            .into_iter()
            .map(|role| RoleInfo {
                role,
                level: engine.matrix().level_of(role),
                label: role.label(),
                manages: aperture_authz::manageable_roles(role).to_vec(),
                direct_grants: engine.matrix().permissions_for_role(role).len(),
            })
            .collect();
        Self { roles }
    }
}

impl Render for RolesReport {
    fn table(&self) -> Table {
        let mut table = new_table(&["role", "level", "label", "manages", "direct grants"]);
        for info in &self.roles {
            table.add_row(vec![
                Cell::new(info.role),
                Cell::new(info.level),
                Cell::new(info.label),
                Cell::new(join(&info.manages)),
                Cell::new(info.direct_grants),
            ]);
        }
        table
    }
}
