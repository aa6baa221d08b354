//! Route table of the application

use crate::auth::ProtectedRoute;
use crate::config::use_app_context;
use crate::pages::{Dashboard, HomePage, LoginPage, NotFoundPage, ProfilePage, RegisterPage};
use medibook_core::{AccessPolicy, CoreError, CoreResult, Role, RouteAccess};
use reqwest::Url;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/auth/login")]
    Login,
    #[at("/auth/register")]
    Register,
    #[at("/Administrator")]
    Administrator,
    #[at("/Doctor")]
    Doctor,
    #[at("/Patient")]
    Patient,
    #[at("/profile")]
    Profile,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// A local path split into the route it names and its decoded query
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub route: Route,
    pub query: Vec<(String, String)>,
}

impl Target {
    pub fn parse(path: &str) -> Self {
        let url = Url::parse("http://localhost").and_then(|base| base.join(path));
        match url {
            Ok(url) => Self {
                route: Route::recognize(url.path()).unwrap_or(Route::NotFound),
                query: url.query_pairs().into_owned().collect(),
            },
            Err(_) => Self {
                route: Route::NotFound,
                query: Vec::new(),
            },
        }
    }
}

/// Reject a policy whose login path or role homes have no page to land on
pub fn check_policy(policy: &AccessPolicy) -> CoreResult<()> {
    let guard = &policy.guard;
    let paths = std::iter::once(guard.login_path())
        .chain(Role::ALL.into_iter().map(|role| guard.home_for(role)));

    for path in paths {
        if matches!(Route::recognize(path), None | Some(Route::NotFound)) {
            return Err(CoreError::invalid_config(format!(
                "{path:?} is not a page of this application"
            )));
        }
    }
    Ok(())
}

pub fn switch(route: Route) -> Html {
    html! { <RouteView {route} /> }
}

#[derive(Properties, PartialEq)]
struct RouteViewProps {
    route: Route,
}

/// Page for a route, wrapped in the guard its access rule asks for
#[function_component(RouteView)]
fn route_view(props: &RouteViewProps) -> Html {
    let app = use_app_context();

    let page = match &props.route {
        Route::Home => html! { <HomePage /> },
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::Administrator => html! { <Dashboard role={Role::Administrator} /> },
        Route::Doctor => html! { <Dashboard role={Role::Doctor} /> },
        Route::Patient => html! { <Dashboard role={Role::Patient} /> },
        Route::Profile => html! { <ProfilePage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    };

    match app.policy.routes.access_for(&props.route.to_path()) {
        RouteAccess::Public => page,
        RouteAccess::Guarded(allowed_roles) => html! {
            <ProtectedRoute {allowed_roles}>{page}</ProtectedRoute>
        },
    }
}
