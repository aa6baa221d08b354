//! Top navigation bar

use crate::auth::{use_auth, AuthAction};
use crate::config::use_app_context;
use crate::router::Route;
use medibook_core::Role;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(Header)]
pub fn header() -> Html {
    let auth = use_auth();
    let app = use_app_context();
    let navigator = use_navigator();

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |_: MouseEvent| {
            auth.dispatch(AuthAction::Logout);
            if let Some(navigator) = &navigator {
                navigator.replace(&Route::Login);
            }
        })
    };

    let account = match auth.identity() {
        Some(identity) => {
            let home = Route::recognize(app.policy.guard.home_for(identity.role))
                .unwrap_or(Route::Home);
            html! {
                <div class="flex items-center gap-4">
                    <Link<Route> to={home} classes="text-sm text-gray-700 hover:text-teal-700">
                        {dashboard_label(identity.role)}
                    </Link<Route>>
                    <Link<Route> to={Route::Profile} classes="text-sm text-gray-700 hover:text-teal-700">
                        {identity.display_name()}
                    </Link<Route>>
                    <button
                        onclick={on_logout}
                        class="px-4 py-2 text-sm font-medium text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-lg transition-colors"
                    >
                        {"Logout"}
                    </button>
                </div>
            }
        }
        None => html! {
            <div class="flex items-center gap-4">
                <Link<Route> to={Route::Login} classes="text-sm text-gray-700 hover:text-teal-700">{"Sign in"}</Link<Route>>
                <Link<Route> to={Route::Register} classes="text-sm font-medium text-teal-700">{"Create account"}</Link<Route>>
            </div>
        },
    };

    html! {
        <header class="flex items-center justify-between p-4 bg-white shadow-sm">
            <Link<Route> to={Route::Home} classes="text-2xl font-bold text-teal-700">{"MediBook"}</Link<Route>>
            {account}
        </header>
    }
}

fn dashboard_label(role: Role) -> &'static str {
    match role {
        Role::Administrator => "Administration",
        Role::Doctor => "My schedule",
        Role::Patient => "My appointments",
    }
}
