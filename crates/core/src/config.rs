//! Client configuration
//!
//! The defaults are embedded from `config/default.toml`; deployments can
//! layer a TOML override on top. Everything that feeds the access guard is
//! validated when the configuration is loaded, so a bad role name or an
//! incomplete home table stops the application at startup.

use crate::error::{CoreError, CoreResult};
use crate::guard::{AccessGuard, RoleHomeTable};
use crate::role::{AllowedRoles, Role};
use crate::routes::{RouteAccess, RouteRule, RouteTable};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Embedded default configuration
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the REST API, absolute or relative to the page origin
    pub api_base_url: String,

    /// Where unauthenticated users are sent
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Log level filter (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub session: SessionConfig,

    /// Home path of every role
    pub role_homes: Vec<RoleHomeEntry>,

    /// Access rule of every declared route
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Session persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// sessionStorage key holding the serialized session
    pub storage_key: String,

    /// How often a live session is checked for expiry
    pub validation_interval_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "medibook.session".to_string(),
            validation_interval_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleHomeEntry {
    pub role: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,

    #[serde(default)]
    pub public: bool,

    /// Omitted or empty: any authenticated identity
    #[serde(default)]
    pub allowed_roles: Option<Vec<String>>,
}

/// Validated access pieces built from an [`AppConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub guard: AccessGuard,
    pub routes: RouteTable,
}

fn default_login_path() -> String {
    crate::guard::LOGIN_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load the embedded defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults fail to parse or validate
    pub fn load() -> CoreResult<Self> {
        Self::build(&[DEFAULT_CONFIG])
    }

    /// Load the embedded defaults with a TOML override layered on top
    ///
    /// Scalars in the override replace the defaults. `role_homes` entries
    /// are merged by role and `routes` entries by path, so an override only
    /// needs to list what it changes.
    ///
    /// # Errors
    ///
    /// Returns an error if either source fails to parse or the result is invalid
    pub fn load_with_overrides(overrides: &str) -> CoreResult<Self> {
        let defaults = Self::assemble(&[DEFAULT_CONFIG])?;
        let mut config = Self::assemble(&[DEFAULT_CONFIG, overrides])?;

        config.role_homes = merge_by_key(defaults.role_homes, config.role_homes, |entry| {
            entry.role.clone()
        });
        config.routes = merge_by_key(defaults.routes, config.routes, |entry| entry.path.clone());

        config.access_policy()?;
        Ok(config)
    }

    /// Load a standalone TOML document, without the embedded defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails to parse or validate
    pub fn from_toml(source: &str) -> CoreResult<Self> {
        Self::build(&[source])
    }

    fn build(sources: &[&str]) -> CoreResult<Self> {
        let config = Self::assemble(sources)?;
        config.access_policy()?;
        Ok(config)
    }

    /// Layer the sources without validating; arrays are replaced wholesale
    fn assemble(sources: &[&str]) -> CoreResult<Self> {
        let settings = sources
            .iter()
            .fold(Config::builder(), |builder, source| {
                builder.add_source(File::from_str(source, FileFormat::Toml))
            })
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Build the access guard and route table
    ///
    /// # Errors
    ///
    /// Returns an error on unknown role names, an incomplete home table,
    /// or malformed routes
    pub fn access_policy(&self) -> CoreResult<AccessPolicy> {
        if !self.login_path.starts_with('/') {
            return Err(CoreError::invalid_config(format!(
                "login_path must start with '/', got {:?}",
                self.login_path
            )));
        }

        let mut homes = Vec::with_capacity(self.role_homes.len());
        for entry in &self.role_homes {
            let role: Role = entry.role.parse()?;
            if homes.iter().any(|(existing, _)| *existing == role) {
                return Err(CoreError::invalid_config(format!(
                    "role_homes lists {role} more than once"
                )));
            }
            homes.push((role, entry.path.clone()));
        }
        let homes = RoleHomeTable::from_entries(homes)?;

        let rules = self
            .routes
            .iter()
            .map(RouteEntry::to_rule)
            .collect::<CoreResult<Vec<_>>>()?;

        let policy = AccessPolicy {
            guard: AccessGuard::new(homes, self.login_path.clone()),
            routes: RouteTable::new(rules)?,
        };
        policy.check_coverage()?;
        Ok(policy)
    }
}

impl AccessPolicy {
    /// The login page must be a declared public route, and every role home
    /// must be guarded and admit its own role. Anything else either leaves a
    /// dashboard open to anonymous users or loops between redirects.
    fn check_coverage(&self) -> CoreResult<()> {
        let login_path = self.guard.login_path();
        let login_declared = self
            .routes
            .rules()
            .iter()
            .any(|rule| rule.path == login_path && rule.access == RouteAccess::Public);
        if !login_declared {
            return Err(CoreError::invalid_config(format!(
                "login path {login_path:?} must be declared as a public route"
            )));
        }

        for role in Role::ALL {
            let home = self.guard.home_for(role);
            match self.routes.access_for(home) {
                RouteAccess::Guarded(allowed) => {
                    if allowed.is_some_and(|allowed| !allowed.permits(role)) {
                        return Err(CoreError::invalid_config(format!(
                            "home path {home:?} of {role} does not admit {role}"
                        )));
                    }
                }
                RouteAccess::Public => {
                    return Err(CoreError::invalid_config(format!(
                        "home path {home:?} of {role} is not a guarded route"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Replace entries of `base` that share a key with an override, append the rest
fn merge_by_key<T, K: PartialEq>(
    base: Vec<T>,
    overrides: Vec<T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut merged = base;
    for entry in overrides {
        let entry_key = key(&entry);
        match merged.iter_mut().find(|existing| key(&**existing) == entry_key) {
            Some(existing) => *existing = entry,
            None => merged.push(entry),
        }
    }
    merged
}

impl RouteEntry {
    fn to_rule(&self) -> CoreResult<RouteRule> {
        let access = match (&self.allowed_roles, self.public) {
            (Some(_), true) => {
                return Err(CoreError::invalid_config(format!(
                    "route {:?} is public but lists allowed_roles",
                    self.path
                )));
            }
            (None, true) => RouteAccess::Public,
            (None, false) => RouteAccess::Guarded(None),
            (Some(names), false) => {
                let allowed = AllowedRoles::parse(names).map_err(|e| {
                    CoreError::invalid_config(format!("route {:?}: {e}", self.path))
                })?;
                RouteAccess::Guarded(Some(allowed))
            }
        };

        Ok(RouteRule {
            path: self.path.clone(),
            access,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        api_base_url = "https://api.example.org"

        [[role_homes]]
        role = "Administrator"
        path = "/admin"

        [[role_homes]]
        role = "Doctor"
        path = "/doctor"

        [[role_homes]]
        role = "Patient"
        path = "/patient"

        [[routes]]
        path = "/auth/login"
        public = true

        [[routes]]
        path = "/admin"
        allowed_roles = ["Administrator"]

        [[routes]]
        path = "/doctor"
        allowed_roles = ["Doctor"]

        [[routes]]
        path = "/patient"
        allowed_roles = ["Patient"]
    "#;

    #[test]
    fn test_embedded_defaults_match_built_in_tables() {
        let config = AppConfig::load().unwrap();
        let policy = config.access_policy().unwrap();

        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(policy.guard, AccessGuard::default());
        assert_eq!(policy.routes, RouteTable::default());
    }

    #[test]
    fn test_overrides_replace_scalars() {
        let config = AppConfig::load_with_overrides(
            r#"
            api_base_url = "https://api.medibook.example"
            log_level = "debug"

            [session]
            storage_key = "medibook.session"
            validation_interval_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.medibook.example");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.session.validation_interval_ms, 5000);
        assert_eq!(config.login_path, "/auth/login");
    }

    #[test]
    fn test_standalone_document_uses_serde_defaults() {
        let config = AppConfig::from_toml(MINIMAL).unwrap();
        let policy = config.access_policy().unwrap();

        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.routes.len(), 4);
        assert_eq!(policy.guard.home_for(Role::Doctor), "/doctor");
    }

    #[test]
    fn test_incomplete_role_homes_fail() {
        let source = r#"
            api_base_url = "/api"

            [[role_homes]]
            role = "Administrator"
            path = "/Administrator"
        "#;
        let err = AppConfig::from_toml(source).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_misspelled_role_fails() {
        let source = format!(
            "{MINIMAL}\n[[routes]]\npath = \"/Doctor\"\nallowed_roles = [\"doctor\"]\n"
        );
        let err = AppConfig::from_toml(&source).unwrap_err();
        assert!(err.to_string().contains("/Doctor"));
    }

    #[test]
    fn test_public_route_with_roles_fails() {
        let source = format!(
            "{MINIMAL}\n[[routes]]\npath = \"/\"\npublic = true\nallowed_roles = [\"Doctor\"]\n"
        );
        assert!(AppConfig::from_toml(&source).is_err());
    }

    #[test]
    fn test_empty_allowed_roles_is_any_identity() {
        let source = format!("{MINIMAL}\n[[routes]]\npath = \"/profile\"\nallowed_roles = []\n");
        let policy = AppConfig::from_toml(&source)
            .unwrap()
            .access_policy()
            .unwrap();
        assert_eq!(
            policy.routes.access_for("/profile"),
            RouteAccess::Guarded(Some(AllowedRoles::default()))
        );
    }

    #[test]
    fn test_duplicate_role_home_fails() {
        let source = format!("{MINIMAL}\n[[role_homes]]\nrole = \"Doctor\"\npath = \"/d2\"\n");
        assert!(AppConfig::from_toml(&source).is_err());
    }

    #[test]
    fn test_one_route_override_keeps_default_guards() {
        let config = AppConfig::load_with_overrides("[[routes]]\npath = \"/secret\"\n").unwrap();
        let policy = config.access_policy().unwrap();

        assert_eq!(config.routes.len(), RouteTable::default().rules().len() + 1);
        assert_eq!(policy.routes.access_for("/secret"), RouteAccess::Guarded(None));
        for role in Role::ALL {
            let home = format!("/{role}");
            assert_eq!(
                policy.routes.access_for(&home),
                RouteAccess::Guarded(Some(AllowedRoles::new([role])))
            );
        }
        assert_eq!(policy.routes.access_for("/auth/login"), RouteAccess::Public);
    }

    #[test]
    fn test_override_replaces_route_by_path() {
        let config = AppConfig::load_with_overrides(
            "[[routes]]\npath = \"/Doctor\"\nallowed_roles = [\"Doctor\", \"Administrator\"]\n",
        )
        .unwrap();
        let policy = config.access_policy().unwrap();

        assert_eq!(config.routes.len(), RouteTable::default().rules().len());
        assert_eq!(
            policy.routes.allowed_roles_for("/Doctor"),
            Some(AllowedRoles::new([Role::Doctor, Role::Administrator]))
        );
    }

    #[test]
    fn test_one_role_home_override_merges_by_role() {
        let config = AppConfig::load_with_overrides(
            r#"
            [[role_homes]]
            role = "Doctor"
            path = "/profile"
            "#,
        )
        .unwrap();
        let policy = config.access_policy().unwrap();

        assert_eq!(policy.guard.home_for(Role::Doctor), "/profile");
        assert_eq!(policy.guard.home_for(Role::Patient), "/Patient");
    }

    #[test]
    fn test_override_cannot_open_a_role_home() {
        let err = AppConfig::load_with_overrides("[[routes]]\npath = \"/Doctor\"\npublic = true\n")
            .unwrap_err();
        assert!(err.to_string().contains("/Doctor"));
    }

    #[test]
    fn test_routes_are_required_for_homes_and_login() {
        let no_routes = &MINIMAL[..MINIMAL.find("[[routes]]").unwrap()];
        let err = AppConfig::from_toml(no_routes).unwrap_err();
        assert!(err.to_string().contains("login path"));

        let login_only = format!("{no_routes}\n[[routes]]\npath = \"/auth/login\"\npublic = true\n");
        let err = AppConfig::from_toml(&login_only).unwrap_err();
        assert!(err.to_string().contains("/admin"));
    }

    #[test]
    fn test_home_must_admit_its_role() {
        let source = MINIMAL.replace(
            "allowed_roles = [\"Patient\"]",
            "allowed_roles = [\"Doctor\"]",
        );
        let err = AppConfig::from_toml(&source).unwrap_err();
        assert!(err.to_string().contains("does not admit Patient"));
    }
}
