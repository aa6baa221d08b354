//! Patient self-registration

use crate::client::ClientError;
use crate::config::use_app_context;
use crate::forms::RegisterForm;
use crate::router::Route;
use crate::services::AuthApiService;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    fn set(self, form: &mut RegisterForm, value: String) {
        match self {
            Self::FirstName => form.first_name = value,
            Self::LastName => form.last_name = value,
            Self::Email => form.email = value,
            Self::Password => form.password = value,
            Self::ConfirmPassword => form.confirm_password = value,
        }
    }
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let app = use_app_context();
    let form = use_state(RegisterForm::default);
    let error = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);
    let registered = use_state(|| false);

    let on_input = {
        let form = form.clone();
        Callback::from(move |(field, e): (Field, InputEvent)| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            field.set(&mut next, input.value());
            form.set(next);
        })
    };

    let on_submit = {
        let form = form.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let registered = registered.clone();
        let api_base_url = app.config.api_base_url.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match form.to_request() {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            error.set(None);
            submitting.set(true);

            let service = AuthApiService::new(&api_base_url);
            let error = error.clone();
            let submitting = submitting.clone();
            let registered = registered.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match service.register(&request).await {
                    Ok(()) => registered.set(true),
                    Err(ClientError::BadRequest(message)) => error.set(Some(message)),
                    Err(e) => {
                        tracing::warn!("Registration failed: {e}");
                        error.set(Some("Registration failed. Please try again.".to_string()));
                    }
                }
                submitting.set(false);
            });
        })
    };

    if *registered {
        return html! {
            <div class="min-h-screen bg-gray-50 flex items-center justify-center px-4">
                <div class="max-w-md w-full bg-white rounded-2xl shadow p-8 text-center">
                    <h1 class="text-2xl font-bold text-gray-900 mb-4">{"Account created"}</h1>
                    <Link<Route> to={Route::Login} classes="text-teal-700 font-medium">{"Continue to sign in"}</Link<Route>>
                </div>
            </div>
        };
    }

    let input = |field: Field, kind: &'static str, placeholder: &'static str, value: &str| {
        let on_input = on_input.clone();
        html! {
            <input
                type={kind}
                placeholder={placeholder}
                value={value.to_string()}
                oninput={Callback::from(move |e: InputEvent| on_input.emit((field, e)))}
                class="w-full px-4 py-2 border border-gray-300 rounded-lg"
            />
        }
    };

    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center px-4">
            <div class="max-w-md w-full bg-white rounded-2xl shadow p-8">
                <h1 class="text-2xl font-bold text-gray-900 mb-6">{"Create a patient account"}</h1>

                if let Some(message) = (*error).clone() {
                    <div class="mb-4 p-3 bg-red-50 text-red-700 rounded text-sm">{message}</div>
                }

                <form onsubmit={on_submit} class="space-y-4">
                    <div class="grid grid-cols-2 gap-4">
                        {input(Field::FirstName, "text", "First name", &form.first_name)}
                        {input(Field::LastName, "text", "Last name", &form.last_name)}
                    </div>
                    {input(Field::Email, "email", "Email", &form.email)}
                    {input(Field::Password, "password", "Password", &form.password)}
                    {input(Field::ConfirmPassword, "password", "Confirm password", &form.confirm_password)}
                    <button
                        type="submit"
                        disabled={*submitting}
                        class="w-full bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white font-medium py-3 rounded-lg"
                    >
                        if *submitting { {"Creating account..."} } else { {"Create account"} }
                    </button>
                </form>
            </div>
        </div>
    }
}
