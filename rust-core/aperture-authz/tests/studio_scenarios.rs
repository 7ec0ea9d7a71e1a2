// SPDX-License-Identifier: PMPL-1.0-or-later
//! Scenario tests against the built-in studio table

use std::collections::BTreeSet;

use aperture_authz::{AccessConfig, AccessDecision, Actor, Evaluator, Session};
use aperture_model::{Action, Page, Permission, PermissionMatrix, Resource, Role};

fn p(text: &str) -> Permission {
    text.parse().unwrap()
}

#[test]
fn test_dashboard_is_visible_to_every_role() {
    let engine = Evaluator::studio();
    for role in Role::ALL {
        assert!(engine.has_permission(role, p("dashboard::view")), "{role}");
        assert!(engine.can_access_page(role, Page::Dashboard.id()), "{role}");
    }
}

#[test]
fn test_super_admin_holds_every_valid_permission() {
    let engine = Evaluator::studio();
    for permission in Permission::all() {
        assert!(engine.has_permission(Role::SuperAdmin, permission), "{permission}");
    }
}

#[test]
fn test_manage_rows_imply_crud_for_studio_table() {
    let engine = Evaluator::studio();
    let matrix = PermissionMatrix::shared();
    for role in Role::ALL {
        for resource in Resource::ALL {
            if matrix.grants_directly(role, Permission::new(resource, Action::Manage)) {
                for action in [Action::View, Action::Create, Action::Edit, Action::Delete] {
                    assert!(
                        engine.can_perform_action(role, resource, action),
                        "{role} {resource}::{action}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_role_management_allow_list() {
    let engine = Evaluator::studio();
    assert!(!engine.can_manage_role(Role::Admin, Role::SuperAdmin));
    assert!(engine.can_manage_role(Role::Admin, Role::Manager));
    assert!(!engine.can_manage_role(Role::Employee, Role::Guest));
}

#[test]
fn test_unmapped_page_open_but_logged_out_closed() {
    let engine = Evaluator::studio();
    for role in Role::ALL {
        assert!(engine.can_access_page(role, "nonexistent-page-xyz"));
    }
    let logged_out = Session::new();
    assert!(!logged_out.has_permission(p("dashboard::view")));
    assert!(!logged_out.can_access_page("nonexistent-page-xyz"));
}

#[test]
fn test_manager_cannot_edit_accounting() {
    assert!(!Evaluator::studio().has_permission(Role::Manager, p("accounting::edit")));
}

#[test]
fn test_guest_can_open_pricing() {
    assert!(Evaluator::studio().can_access_page(Role::Guest, "pricing"));
}

#[test]
fn test_manager_cannot_edit_employee_account() {
    let engine = Evaluator::studio();
    assert!(engine.can_manage_role(Role::Manager, Role::Employee));
    assert!(!engine.can_edit_user(Role::Manager, Role::Employee));
}

#[test]
fn test_page_visibility_per_role() {
    let engine = Evaluator::studio();
    let visible = |role: Role| -> BTreeSet<Page> {
        Page::ALL
            .into_iter()
            .filter(|page| engine.can_access_page(role, page.id()))
            .collect()
    };

    assert_eq!(
        visible(Role::Guest),
        BTreeSet::from([Page::Dashboard, Page::Appointments, Page::Pricing])
    );
    assert!(!visible(Role::Employee).contains(&Page::Accounting));
    assert!(visible(Role::Manager).contains(&Page::Accounting));
    assert!(visible(Role::Admin).contains(&Page::Roles));
    assert!(!visible(Role::Admin).contains(&Page::AuditLog));
    assert_eq!(visible(Role::SuperAdmin).len(), Page::ALL.len());
}

#[test]
fn test_front_desk_day() {
    // An employee signs in, books a shoot, is refused the ledger, gets
    // promoted by an admin mid-session and can then open accounting.
    let config = AccessConfig::default();
    let mut desk = Session::from_config(&config);
    desk.login(Actor::new("front-desk", Role::Employee)).unwrap();

    assert!(desk.require_action(Resource::Appointments, Action::Create).is_ok());
    assert!(desk.require_page("accounting").is_err());
    assert!(!desk.can_perform_action(Resource::Appointments, Action::Delete));

    let mut admin = Session::new();
    admin.login(Actor::new("owner", Role::Admin)).unwrap();
    let change = admin.assign_role(&mut desk, Role::Manager).unwrap();
    assert_eq!(change.actor_id, "front-desk");

    assert!(desk.require_page("accounting").is_ok());
    assert!(desk.can_perform_action(Resource::Appointments, Action::Delete));

    let denied = desk
        .audit_log()
        .map(|log| log.filter(AccessDecision::Denied))
        .unwrap_or_default();
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].subject, "accounting");
    assert_eq!(denied[0].role, Some(Role::Employee));
}

#[test]
fn test_sessions_on_separate_threads() {
    let roles = Role::ALL;
    let handles: Vec<_> = roles
        .into_iter()
        .map(|role| {
            std::thread::spawn(move || {
                let mut session = Session::new();
                session.login(Actor::new(role.as_str(), role)).unwrap();
                (role, session.accessible_resources())
            })
        })
        .collect();

    for handle in handles {
        let (role, resources) = handle.join().unwrap();
        assert_eq!(resources, Evaluator::studio().accessible_resources(role));
    }
}
