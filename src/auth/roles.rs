// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - registers offices and candidates, files petitions, may modify
///   any party
/// - `Voter` - registers parties, modifies its own, casts votes
///
/// Roles are derived from the `is_admin` column on every privileged request;
/// they are never read from the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Regular registered user
    #[default]
    Voter,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (Role::Voter, Role::Voter) => true,
            _ => false,
        }
    }

    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::Voter
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Voter => write!(f, "voter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Voter));
    }

    #[test]
    fn voter_only_has_voter_privilege() {
        assert!(!Role::Voter.has_privilege(Role::Admin));
        assert!(Role::Voter.has_privilege(Role::Voter));
    }

    #[test]
    fn default_role_is_voter() {
        assert_eq!(Role::default(), Role::Voter);
        assert_eq!(Role::from_admin_flag(true).to_string(), "admin");
    }
}
