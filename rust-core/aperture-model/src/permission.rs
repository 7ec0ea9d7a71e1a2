// SPDX-License-Identifier: PMPL-1.0-or-later
//! The atomic grant unit: a (resource, action) pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ModelError;
use crate::resource::Resource;

/// Separator between resource and action in the canonical string form.
pub const SEPARATOR: &str = "::";

/// A (resource, action) pair.
///
/// Serialized canonically as `"<resource>::<action>"`, e.g. `"contracts::edit"`.
/// Uniqueness is by the pair, so two permissions compare equal exactly when
/// both halves match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// The `resource::manage` permission for the same resource.
    pub const fn manage_sibling(self) -> Self {
        Self::new(self.resource, Action::Manage)
    }

    /// Every syntactically valid permission, resource-major.
    pub fn all() -> impl Iterator<Item = Permission> {
        Resource::ALL
            .into_iter()
            .flat_map(|r| Action::ALL.into_iter().map(move |a| Permission::new(r, a)))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.resource, SEPARATOR, self.action)
    }
}

impl FromStr for Permission {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = s
            .trim()
            .split_once(SEPARATOR)
            .ok_or_else(|| ModelError::MalformedPermission(s.to_string()))?;
        if action.contains(SEPARATOR) {
            return Err(ModelError::MalformedPermission(s.to_string()));
        }
        Ok(Self::new(resource.parse()?, action.parse()?))
    }
}

impl TryFrom<String> for Permission {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

/// Shorthand used by the grant tables.
pub(crate) const fn perm(resource: Resource, action: Action) -> Permission {
    Permission::new(resource, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form() {
        let p = Permission::new(Resource::Users, Action::Edit);
        assert_eq!(p.to_string(), "users::edit");
    }

    #[test]
    fn test_parse_canonical_form() {
        let p: Permission = "accounting::manage".parse().unwrap();
        assert_eq!(p, Permission::new(Resource::Accounting, Action::Manage));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(
            "users.edit".parse::<Permission>(),
            Err(ModelError::MalformedPermission(_))
        ));
        assert!(matches!(
            "users::edit::extra".parse::<Permission>(),
            Err(ModelError::MalformedPermission(_))
        ));
        assert!(matches!(
            "gallery::view".parse::<Permission>(),
            Err(ModelError::UnknownResource(_))
        ));
        assert!(matches!(
            "users::approve".parse::<Permission>(),
            Err(ModelError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_manage_sibling() {
        let p = Permission::new(Resource::Contracts, Action::Delete);
        assert_eq!(
            p.manage_sibling(),
            Permission::new(Resource::Contracts, Action::Manage)
        );
    }

    #[test]
    fn test_all_is_complete_and_unique() {
        let all: std::collections::BTreeSet<_> = Permission::all().collect();
        assert_eq!(all.len(), Resource::ALL.len() * Action::ALL.len());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let p = Permission::new(Resource::Staff, Action::View);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"staff::view\"");
        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Permission>("\"staff-view\"").is_err());
    }
}
