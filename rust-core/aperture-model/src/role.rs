// SPDX-License-Identifier: PMPL-1.0-or-later
//! Staff roles and their hierarchy levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A named actor classification.
///
/// Roles are totally ordered by [`Role::level`]: no two roles share a level.
/// The derived `Ord` is declaration order and is only used for stable
/// iteration in sets and tables, never for hierarchy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Employee,
    Guest,
}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Employee,
        Role::Guest,
    ];

    /// Hierarchy level: `super_admin` = 5 down to `guest` = 1.
    pub const fn level(self) -> u8 {
        match self {
            Role::SuperAdmin => 5,
            Role::Admin => 4,
            Role::Manager => 3,
            Role::Employee => 2,
            Role::Guest => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::Guest => "guest",
        }
    }

    /// Human label shown in user lists and role pickers.
    pub fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Administrator",
            Role::Admin => "Administrator",
            Role::Manager => "Studio Manager",
            Role::Employee => "Employee",
            Role::Guest => "Guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    /// Accepts the snake_case identifier; `-` is tolerated in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            "guest" => Ok(Role::Guest),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}
