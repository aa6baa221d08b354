//! Signed-in user's profile

use crate::auth::use_identity;
use yew::prelude::*;

#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let Some(identity) = use_identity() else {
        return html! {};
    };

    let row = |label: &'static str, value: String| {
        html! {
            <div class="flex justify-between py-3 border-b border-gray-100">
                <span class="text-sm text-gray-500">{label}</span>
                <span class="text-sm font-medium text-gray-900">{value}</span>
            </div>
        }
    };

    html! {
        <div class="max-w-xl mx-auto p-6">
            <div class="bg-white rounded-lg shadow p-6">
                <h1 class="text-xl font-semibold text-gray-900 mb-4">{identity.display_name()}</h1>
                {row("Email", identity.email.clone())}
                {row("First name", identity.first_name.clone())}
                {row("Last name", identity.last_name.clone())}
                {row("Role", identity.role.to_string())}
            </div>
        </div>
    }
}
