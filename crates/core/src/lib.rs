//! MediBook client core: roles, sessions, and route access decisions

pub mod config;
pub mod error;
pub mod guard;
pub mod identity;
pub mod role;
pub mod routes;
pub mod session;

pub use config::{AccessPolicy, AppConfig, SessionConfig};
pub use error::{CoreError, CoreResult};
pub use guard::{AccessGuard, GuardDecision, Redirect, RoleHomeTable, RouteGuardRequest};
pub use identity::Identity;
pub use role::{AllowedRoles, Role};
pub use routes::{RouteAccess, RouteRule, RouteTable};
pub use session::{
    SessionAction, SessionProvider, SessionState, SessionStore, StoredSession, Subscription,
};
