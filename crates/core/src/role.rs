//! Roles and allowed-role sets

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Role of an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    Doctor,
    Patient,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Doctor, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Doctor => "Doctor",
            Self::Patient => "Patient",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Case-sensitive: only the exact variant name is accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::unknown_role(s))
    }
}

/// Set of roles permitted on a guarded route
///
/// An empty set means the same thing as no set at all: any authenticated
/// identity passes. [`AllowedRoles::permits`] makes that explicit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedRoles(BTreeSet<Role>);

impl AllowedRoles {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Parse a list of role names, rejecting anything that is not an exact role name
    pub fn parse<S: AsRef<str>>(names: &[S]) -> CoreResult<Self> {
        names
            .iter()
            .map(|name| name.as_ref().parse::<Role>())
            .collect::<CoreResult<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Whether `role` may render content restricted to this set
    pub fn permits(&self, role: Role) -> bool {
        // empty == unrestricted
        self.is_empty() || self.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for AllowedRoles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Display for AllowedRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|role| role.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
