use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::{RoleProfile, profile};

/// Portal role used for RBAC.
///
/// Closed set: every route, menu and registration field set is keyed by one
/// of these four variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Visitor,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Visitor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Visitor => "visitor",
        }
    }

    /// Position in [`Role::ALL`]; used to index the static role tables.
    pub const fn index(self) -> usize {
        match self {
            Role::Admin => 0,
            Role::Teacher => 1,
            Role::Student => 2,
            Role::Visitor => 3,
        }
    }

    /// Human-facing label (French, as shown in the portal).
    pub fn label(&self) -> &'static str {
        self.profile().label
    }

    pub fn profile(&self) -> &'static RoleProfile {
        profile(*self)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
