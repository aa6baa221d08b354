//! Sign-in screen

use crate::auth::{use_auth, AuthAction, RedirectTo};
use crate::client::ClientError;
use crate::config::{use_app_context, AuthConfig};
use crate::forms::{return_path, LoginForm};
use crate::router::Route;
use crate::services::AuthApiService;
use medibook_core::Redirect;
use std::collections::HashMap;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let auth = use_auth();
    let app = use_app_context();
    let location = use_location();
    let form = use_state(LoginForm::default);
    let error = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);

    let from = location
        .and_then(|l| l.query::<HashMap<String, String>>().ok())
        .and_then(|mut query| query.remove(AuthConfig::RETURN_TO_PARAM));

    // Signed in (including right after submitting): continue to the requested page
    if let Some(identity) = auth.identity() {
        let guard = &app.policy.guard;
        let to = return_path(from.as_deref(), guard.login_path(), guard.home_for(identity.role));
        let redirect = Redirect {
            to: to.to_string(),
            origin: None,
        };
        return html! { <RedirectTo {redirect} /> };
    }

    let on_email = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(LoginForm {
                email: input.value(),
                ..(*form).clone()
            });
        })
    };

    let on_password = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(LoginForm {
                password: input.value(),
                ..(*form).clone()
            });
        })
    };

    let on_submit = {
        let form = form.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let auth = auth.clone();
        let api_base_url = app.config.api_base_url.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(message) = form.validate() {
                error.set(Some(message));
                return;
            }

            error.set(None);
            submitting.set(true);

            let LoginForm { email, password } = (*form).clone();
            let service = AuthApiService::new(&api_base_url);
            let auth = auth.clone();
            let error = error.clone();
            let submitting = submitting.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match service.login(email.trim().to_string(), password).await {
                    Ok(response) => auth.dispatch(AuthAction::Login(response.into())),
                    Err(e) => error.set(Some(login_error_message(&e))),
                }
                submitting.set(false);
            });
        })
    };

    // Error from the session itself (e.g. expiry) unless the form has its own
    let shown_error = (*error).clone().or_else(|| auth.error.clone());

    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center px-4">
            <div class="max-w-md w-full bg-white rounded-2xl shadow p-8">
                <h1 class="text-2xl font-bold text-gray-900 mb-6">{"Sign in to MediBook"}</h1>

                if let Some(message) = shown_error {
                    <div class="mb-4 p-3 bg-red-50 text-red-700 rounded text-sm">{message}</div>
                }

                <form onsubmit={on_submit} class="space-y-4">
                    <input
                        type="email"
                        placeholder="Email"
                        value={form.email.clone()}
                        oninput={on_email}
                        class="w-full px-4 py-2 border border-gray-300 rounded-lg"
                    />
                    <input
                        type="password"
                        placeholder="Password"
                        value={form.password.clone()}
                        oninput={on_password}
                        class="w-full px-4 py-2 border border-gray-300 rounded-lg"
                    />
                    <button
                        type="submit"
                        disabled={*submitting}
                        class="w-full bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white font-medium py-3 rounded-lg"
                    >
                        if *submitting { {"Signing in..."} } else { {"Sign in"} }
                    </button>
                </form>

                <p class="mt-6 text-sm text-gray-600">
                    {"New patient? "}
                    <Link<Route> to={Route::Register} classes="text-teal-700 font-medium">{"Create an account"}</Link<Route>>
                </p>
            </div>
        </div>
    }
}

fn login_error_message(error: &ClientError) -> String {
    if error.is_auth_expired() {
        "Invalid email or password".to_string()
    } else {
        tracing::warn!("Login request failed: {error}");
        "Could not reach the server. Please try again.".to_string()
    }
}
