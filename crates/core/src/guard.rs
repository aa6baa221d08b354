//! Access guard for protected routes
//!
//! [`AccessGuard::decide`] is a pure function of the session state, the
//! route's allowed roles and the requested path. It is re-evaluated on every
//! navigation and on every session change; it holds no state of its own.

use crate::error::{CoreError, CoreResult};
use crate::role::{AllowedRoles, Role};
use crate::session::{SessionProvider, SessionState};
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// Default login route
pub const LOGIN_PATH: &str = "/auth/login";

/// Where a redirect sends the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Path the user attempted, so login can return there afterwards
    pub origin: Option<String>,
}

/// Outcome of evaluating a guarded route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Identity not resolved yet; show a transient waiting view
    Suspend,
    Render,
    /// Replace the current location, leaving no history entry for the attempt
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect(redirect) => Some(&redirect.to),
            _ => None,
        }
    }
}

/// One navigation attempt against a guarded route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuardRequest {
    pub requested_path: String,
    pub allowed_roles: Option<AllowedRoles>,
}

impl RouteGuardRequest {
    pub fn new(requested_path: impl Into<String>, allowed_roles: Option<AllowedRoles>) -> Self {
        Self {
            requested_path: requested_path.into(),
            allowed_roles,
        }
    }
}

/// Home path of each role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHomeTable {
    homes: BTreeMap<Role, String>,
}

impl Default for RoleHomeTable {
    fn default() -> Self {
        Self {
            homes: Role::ALL
                .into_iter()
                .map(|role| (role, format!("/{role}")))
                .collect(),
        }
    }
}

impl RoleHomeTable {
    /// Build a table, requiring an absolute home path for every role
    pub fn from_entries(entries: impl IntoIterator<Item = (Role, String)>) -> CoreResult<Self> {
        let homes: BTreeMap<Role, String> = entries.into_iter().collect();

        let missing: Vec<&str> = Role::ALL
            .iter()
            .filter(|role| !homes.contains_key(role))
            .map(Role::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::invalid_config(format!(
                "role_homes has no entry for: {}",
                missing.join(", ")
            )));
        }

        if let Some((role, path)) = homes.iter().find(|(_, path)| !path.starts_with('/')) {
            return Err(CoreError::invalid_config(format!(
                "home path for {role} must start with '/', got {path:?}"
            )));
        }

        Ok(Self { homes })
    }

    pub fn home_path(&self, role: Role) -> Option<&str> {
        self.homes.get(&role).map(String::as_str)
    }
}

/// Decides whether guarded content renders, waits, or redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    homes: RoleHomeTable,
    login_path: String,
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self::new(RoleHomeTable::default(), LOGIN_PATH)
    }
}

impl AccessGuard {
    pub fn new(homes: RoleHomeTable, login_path: impl Into<String>) -> Self {
        Self {
            homes,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Home path of `role`, or the login path when the role has none
    pub fn home_for(&self, role: Role) -> &str {
        self.homes.home_path(role).unwrap_or(&self.login_path)
    }

    /// Evaluate one navigation attempt
    ///
    /// `origin_path` is only carried along on login redirects; it never
    /// influences which branch is taken.
    pub fn decide(
        &self,
        state: &SessionState,
        allowed_roles: Option<&AllowedRoles>,
        origin_path: &str,
    ) -> GuardDecision {
        if state.loading {
            return GuardDecision::Suspend;
        }

        let Some(identity) = &state.identity else {
            trace!(origin = origin_path, "No identity, redirecting to login");
            return self.to_login(origin_path);
        };

        let permitted = allowed_roles.is_none_or(|allowed| allowed.permits(identity.role));
        if permitted {
            return GuardDecision::Render;
        }

        match self.homes.home_path(identity.role) {
            Some(home) => {
                trace!(
                    role = %identity.role,
                    origin = origin_path,
                    home,
                    "Role not allowed, redirecting to role home"
                );
                GuardDecision::Redirect(Redirect {
                    to: home.to_string(),
                    origin: None,
                })
            }
            None => {
                warn!(role = %identity.role, "Role has no home path, redirecting to login");
                self.to_login(origin_path)
            }
        }
    }

    /// Evaluate a request object
    pub fn evaluate(&self, state: &SessionState, request: &RouteGuardRequest) -> GuardDecision {
        self.decide(state, request.allowed_roles.as_ref(), &request.requested_path)
    }

    /// Evaluate against whatever a provider currently holds
    pub fn decide_with<P: SessionProvider + ?Sized>(
        &self,
        provider: &P,
        allowed_roles: Option<&AllowedRoles>,
        origin_path: &str,
    ) -> GuardDecision {
        self.decide(&provider.state(), allowed_roles, origin_path)
    }

    fn to_login(&self, origin_path: &str) -> GuardDecision {
        GuardDecision::Redirect(Redirect {
            to: self.login_path.clone(),
            origin: Some(origin_path.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::session::MockSessionProvider;

    fn signed_in(role: Role) -> SessionState {
        SessionState::resolved(Some(Identity::new("u1", "u@example.com", role)))
    }

    #[test]
    fn test_default_homes() {
        let table = RoleHomeTable::default();
        assert_eq!(table.home_path(Role::Administrator), Some("/Administrator"));
        assert_eq!(table.home_path(Role::Doctor), Some("/Doctor"));
        assert_eq!(table.home_path(Role::Patient), Some("/Patient"));
    }

    #[test]
    fn test_incomplete_home_table_is_rejected() {
        let err = RoleHomeTable::from_entries([
            (Role::Administrator, "/Administrator".to_string()),
            (Role::Doctor, "/Doctor".to_string()),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
        assert!(err.to_string().contains("Patient"));
    }

    #[test]
    fn test_relative_home_path_is_rejected() {
        let result = RoleHomeTable::from_entries([
            (Role::Administrator, "/Administrator".to_string()),
            (Role::Doctor, "Doctor".to_string()),
            (Role::Patient, "/Patient".to_string()),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unmapped_role_falls_back_to_login() {
        // Only reachable with a table that bypassed validation
        let guard = AccessGuard::new(
            RoleHomeTable {
                homes: BTreeMap::from([(Role::Administrator, "/Administrator".to_string())]),
            },
            LOGIN_PATH,
        );
        let allowed = AllowedRoles::new([Role::Administrator]);

        let decision = guard.decide(&signed_in(Role::Doctor), Some(&allowed), "/Administrator");
        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                to: LOGIN_PATH.to_string(),
                origin: Some("/Administrator".to_string()),
            })
        );
        assert_eq!(guard.home_for(Role::Patient), LOGIN_PATH);
    }

    #[test]
    fn test_role_redirect_carries_no_origin() {
        let guard = AccessGuard::default();
        let allowed = AllowedRoles::new([Role::Doctor]);
        let decision = guard.decide(&signed_in(Role::Patient), Some(&allowed), "/Doctor");
        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                to: "/Patient".to_string(),
                origin: None,
            })
        );
    }

    #[test]
    fn test_custom_login_path() {
        let guard = AccessGuard::new(RoleHomeTable::default(), "/signin");
        let decision = guard.decide(&SessionState::resolved(None), None, "/profile");
        assert_eq!(decision.redirect_path(), Some("/signin"));
    }

    #[test]
    fn test_decide_with_only_reads_provider() {
        let mut provider = MockSessionProvider::new();
        provider
            .expect_state()
            .times(1)
            .returning(|| signed_in(Role::Administrator));
        provider.expect_set_identity().never();
        provider.expect_clear_identity().never();

        let guard = AccessGuard::default();
        let allowed = AllowedRoles::new([Role::Administrator]);
        assert_eq!(
            guard.decide_with(&provider, Some(&allowed), "/Administrator"),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_evaluate_request() {
        let guard = AccessGuard::default();
        let request = RouteGuardRequest::new("/Doctor", Some(AllowedRoles::new([Role::Doctor])));
        assert_eq!(guard.evaluate(&signed_in(Role::Doctor), &request), GuardDecision::Render);
        assert_eq!(
            guard.evaluate(&signed_in(Role::Administrator), &request).redirect_path(),
            Some("/Administrator")
        );
    }
}
