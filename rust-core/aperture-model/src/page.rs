// SPDX-License-Identifier: PMPL-1.0-or-later
//! Known application pages and the permission gating each of them.
//!
//! Page identifiers arrive from the routing shell as opaque strings. An
//! identifier that names a [`Page`] is gated by that page's permission; any
//! other identifier has no gate and is accessible to every signed-in actor.
//!
//! [`Page::gate`] is an exhaustive `match` returning a [`Permission`] (not an
//! `Option`), so a new page variant does not compile until it is given a
//! gate. Unknown identifiers stay open at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ModelError;
use crate::permission::{perm, Permission};
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Appointments,
    Contracts,
    Pricing,
    Customers,
    Staff,
    Accounting,
    Reports,
    Settings,
    Users,
    Roles,
    AuditLog,
}

impl Page {
    pub const ALL: [Page; 12] = [
        Page::Dashboard,
        Page::Appointments,
        Page::Contracts,
        Page::Pricing,
        Page::Customers,
        Page::Staff,
        Page::Accounting,
        Page::Reports,
        Page::Settings,
        Page::Users,
        Page::Roles,
        Page::AuditLog,
    ];

    /// Route identifier as used by the layout shell.
    pub fn id(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Appointments => "appointments",
            Page::Contracts => "contracts",
            Page::Pricing => "pricing",
            Page::Customers => "customers",
            Page::Staff => "staff",
            Page::Accounting => "accounting",
            Page::Reports => "reports",
            Page::Settings => "settings",
            Page::Users => "users",
            Page::Roles => "roles",
            Page::AuditLog => "audit-log",
        }
    }

    /// The single permission required to open this page.
    pub const fn gate(self) -> Permission {
        match self {
            Page::Dashboard => perm(Resource::Dashboard, Action::View),
            Page::Appointments => perm(Resource::Appointments, Action::View),
            Page::Contracts => perm(Resource::Contracts, Action::View),
            Page::Pricing => perm(Resource::Pricing, Action::View),
            Page::Customers => perm(Resource::Customers, Action::View),
            Page::Staff => perm(Resource::Staff, Action::View),
            Page::Accounting => perm(Resource::Accounting, Action::View),
            Page::Reports => perm(Resource::Reports, Action::View),
            Page::Settings => perm(Resource::Settings, Action::View),
            Page::Users => perm(Resource::Users, Action::View),
            Page::Roles => perm(Resource::Roles, Action::View),
            Page::AuditLog => perm(Resource::Audit, Action::View),
        }
    }

    /// Look up a page by its route identifier. Exact match only.
    pub fn from_id(id: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Page {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::from_id(s).ok_or_else(|| ModelError::UnknownPage(s.to_string()))
    }
}

/// The permission gating the page with identifier `page`, or `None` if the
/// identifier is not a known page.
pub fn gating_permission(page: &str) -> Option<Permission> {
    Page::from_id(page).map(Page::gate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_page_ids_are_unique() {
        let ids: HashSet<&str> = Page::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(ids.len(), Page::ALL.len());
    }

    #[test]
    fn test_every_page_is_gated_by_a_view_permission() {
        for page in Page::ALL {
            assert_eq!(page.gate().action, Action::View, "{page}");
            assert_eq!(gating_permission(page.id()), Some(page.gate()));
        }
    }

    #[test]
    fn test_unknown_page_has_no_gate() {
        assert_eq!(gating_permission("nonexistent-page-xyz"), None);
        assert_eq!(gating_permission(""), None);
        // Lookup is exact; the router hands over canonical ids.
        assert_eq!(gating_permission("Pricing"), None);
    }

    #[test]
    fn test_pricing_page_gate() {
        assert_eq!(
            gating_permission("pricing"),
            Some(Permission::new(Resource::Pricing, Action::View))
        );
    }

    #[test]
    fn test_page_serde_matches_id() {
        for page in Page::ALL {
            let json = serde_json::to_string(&page).unwrap();
            assert_eq!(json, format!("\"{}\"", page.id()));
        }
    }
}
