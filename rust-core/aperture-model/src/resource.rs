// SPDX-License-Identifier: PMPL-1.0-or-later
//! Protected functional areas of the studio suite.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A named functional area guarded by the permission matrix.
///
/// The set is fixed at build time. Adding a variant here is the only way to
/// introduce a new resource, and the compiler then points at every table
/// that has to decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
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
    Audit,
}

impl Resource {
    /// All resources in canonical order.
    pub const ALL: [Resource; 12] = [
        Resource::Dashboard,
        Resource::Appointments,
        Resource::Contracts,
        Resource::Pricing,
        Resource::Customers,
        Resource::Staff,
        Resource::Accounting,
        Resource::Reports,
        Resource::Settings,
        Resource::Users,
        Resource::Roles,
        Resource::Audit,
    ];

    /// Stable identifier used in canonical permission strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Appointments => "appointments",
            Resource::Contracts => "contracts",
            Resource::Pricing => "pricing",
            Resource::Customers => "customers",
            Resource::Staff => "staff",
            Resource::Accounting => "accounting",
            Resource::Reports => "reports",
            Resource::Settings => "settings",
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Audit => "audit",
        }
    }

    /// Human label shown in navigation and permission editors.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Dashboard => "Dashboard",
            Resource::Appointments => "Appointments",
            Resource::Contracts => "Contracts",
            Resource::Pricing => "Pricing",
            Resource::Customers => "Customers",
            Resource::Staff => "Staff",
            Resource::Accounting => "Accounting",
            Resource::Reports => "Reports",
            Resource::Settings => "Settings",
            Resource::Users => "User Accounts",
            Resource::Roles => "Roles & Permissions",
            Resource::Audit => "Audit Trail",
        }
    }

    /// One-line description of what the area covers.
    pub fn description(self) -> &'static str {
        match self {
            Resource::Dashboard => "Studio overview, today's shoots and key figures",
            Resource::Appointments => "Consultations, shoots and delivery bookings",
            Resource::Contracts => "Client contracts, signatures and amendments",
            Resource::Pricing => "Packages, add-ons and price lists",
            Resource::Customers => "Couples, leads and follow-up history",
            Resource::Staff => "Photographers, assistants and schedules",
            Resource::Accounting => "Invoices, deposits and payment records",
            Resource::Reports => "Revenue and booking reports",
            Resource::Settings => "Studio-wide configuration",
            Resource::Users => "Login accounts and their roles",
            Resource::Roles => "Role definitions and grant tables",
            Resource::Audit => "Record of access decisions and role changes",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownResource(s.to_string()))
    }
}
