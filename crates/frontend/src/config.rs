//! Frontend configuration

use crate::router::check_policy;
use medibook_core::{AccessPolicy, AppConfig, CoreResult};
use std::rc::Rc;
use yew::prelude::*;

/// Authentication constants that are not deployment settings
pub struct AuthConfig;

impl AuthConfig {
    /// Query parameter carrying the originally requested path to the login page
    pub const RETURN_TO_PARAM: &'static str = "from";

    /// Minimum password length accepted by the registration form
    pub const MIN_PASSWORD_LEN: usize = 8;
}

/// Loaded configuration shared through context
#[derive(Clone, Debug, PartialEq)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub policy: Rc<AccessPolicy>,
}

impl AppContext {
    /// Validate the access policy against the pages the router knows
    ///
    /// # Errors
    ///
    /// Returns an error if the login path or a role home is not a routable page
    pub fn new(config: AppConfig, policy: AccessPolicy) -> CoreResult<Self> {
        check_policy(&policy)?;
        Ok(Self {
            config: Rc::new(config),
            policy: Rc::new(policy),
        })
    }
}

/// Hook to use the loaded configuration
#[hook]
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>()
        .expect("AppContext not found. Make sure to wrap your component with App")
}
