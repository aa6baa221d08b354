//! Route guard for protected pages

use crate::auth::use_auth;
use crate::components::Spinner;
use crate::config::{use_app_context, AuthConfig};
use crate::router::Target;
use medibook_core::{AllowedRoles, GuardDecision, Redirect};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProtectedRouteProps {
    /// Roles admitted; `None` or empty admits any signed-in user
    #[prop_or_default]
    pub allowed_roles: Option<AllowedRoles>,
    pub children: Children,
}

/// Renders its children only when the session passes the access guard
#[function_component(ProtectedRoute)]
pub fn protected_route(props: &ProtectedRouteProps) -> Html {
    let auth = use_auth();
    let app = use_app_context();
    let location = use_location();

    // Keep the query so login can return to exactly what was requested
    let origin = location.map_or_else(
        || "/".to_string(),
        |l| format!("{}{}", l.path(), l.query_str()),
    );
    let decision = app
        .policy
        .guard
        .decide(&auth.session, props.allowed_roles.as_ref(), &origin);

    match decision {
        GuardDecision::Suspend => html! {
            <Spinner label="Checking your session..." full_screen=true />
        },
        GuardDecision::Render => html! { <>{ props.children.clone() }</> },
        GuardDecision::Redirect(redirect) => html! { <RedirectTo {redirect} /> },
    }
}

#[derive(Properties, PartialEq)]
pub struct RedirectToProps {
    pub redirect: Redirect,
}

/// Replaces the current location, so the denied attempt leaves no history entry
#[function_component(RedirectTo)]
pub fn redirect_to(props: &RedirectToProps) -> Html {
    let navigator = use_navigator();

    use_effect_with(props.redirect.clone(), move |redirect| {
        let Some(navigator) = navigator else {
            tracing::warn!("RedirectTo rendered outside a router");
            return;
        };

        let Target { route, mut query } = Target::parse(&redirect.to);
        tracing::debug!(to = %redirect.to, origin = ?redirect.origin, "Redirecting");

        if let Some(origin) = &redirect.origin {
            query.push((AuthConfig::RETURN_TO_PARAM.to_string(), origin.clone()));
        }
        if query.is_empty() {
            navigator.replace(&route);
        } else if let Err(e) = navigator.replace_with_query(&route, &query) {
            tracing::warn!("Failed to attach query to redirect: {e}");
            navigator.replace(&route);
        }
    });

    html! {}
}
