//! Route access table

use crate::error::{CoreError, CoreResult};
use crate::guard::{AccessGuard, GuardDecision};
use crate::role::{AllowedRoles, Role};
use crate::session::SessionState;

/// How a path is protected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// Requires an identity; `None` admits every role
    Guarded(Option<AllowedRoles>),
}

/// A declared route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub path: String,
    pub access: RouteAccess,
}

impl RouteRule {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            access: RouteAccess::Public,
        }
    }

    pub fn authenticated(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            access: RouteAccess::Guarded(None),
        }
    }

    pub fn restricted(path: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            path: path.into(),
            access: RouteAccess::Guarded(Some(AllowedRoles::new(roles))),
        }
    }

    /// Whether this rule covers `path`, exactly or as a parent segment
    fn covers(&self, path: &str) -> bool {
        if self.path == "/" {
            return path == "/";
        }
        match path.strip_prefix(self.path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Access rules for every declared path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            rules: vec![
                RouteRule::public("/"),
                RouteRule::public("/auth/login"),
                RouteRule::public("/auth/register"),
                RouteRule::restricted("/Administrator", [Role::Administrator]),
                RouteRule::restricted("/Doctor", [Role::Doctor]),
                RouteRule::restricted("/Patient", [Role::Patient]),
                RouteRule::authenticated("/profile"),
            ],
        }
    }
}

impl RouteTable {
    /// Build a table, rejecting relative or duplicate paths
    pub fn new(rules: Vec<RouteRule>) -> CoreResult<Self> {
        for (i, rule) in rules.iter().enumerate() {
            if !rule.path.starts_with('/') {
                return Err(CoreError::invalid_config(format!(
                    "route path must start with '/', got {:?}",
                    rule.path
                )));
            }
            if rules[..i].iter().any(|other| other.path == rule.path) {
                return Err(CoreError::invalid_config(format!(
                    "route {:?} is declared twice",
                    rule.path
                )));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Access rule for a path; the longest covering declaration wins and
    /// undeclared paths are public
    pub fn access_for(&self, path: &str) -> RouteAccess {
        let path = normalize(path);
        self.rules
            .iter()
            .filter(|rule| rule.covers(path))
            .max_by_key(|rule| rule.path.len())
            .map_or(RouteAccess::Public, |rule| rule.access.clone())
    }

    /// Allowed roles of a guarded path, `None` for public or any-role paths
    pub fn allowed_roles_for(&self, path: &str) -> Option<AllowedRoles> {
        match self.access_for(path) {
            RouteAccess::Guarded(allowed) => allowed,
            RouteAccess::Public => None,
        }
    }

    pub fn evaluate(&self, guard: &AccessGuard, state: &SessionState, path: &str) -> GuardDecision {
        match self.access_for(path) {
            RouteAccess::Public => GuardDecision::Render,
            RouteAccess::Guarded(allowed) => guard.decide(state, allowed.as_ref(), path),
        }
    }
}

/// Strip query, fragment and trailing slash
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
