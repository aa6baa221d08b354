use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(HomePage)]
pub fn home_page() -> Html {
    html! {
        <div class="max-w-3xl mx-auto px-6 py-20 text-center">
            <h1 class="text-4xl font-bold text-gray-900 mb-4">{"Book your next appointment"}</h1>
            <p class="text-lg text-gray-600 mb-8">
                {"See available doctors, pick a time that suits you, and manage your visits in one place."}
            </p>
            <div class="flex justify-center gap-4">
                <Link<Route> to={Route::Login} classes="px-6 py-3 bg-teal-600 text-white rounded-lg">{"Sign in"}</Link<Route>>
                <Link<Route> to={Route::Register} classes="px-6 py-3 bg-white border border-teal-600 text-teal-700 rounded-lg">{"Register"}</Link<Route>>
            </div>
        </div>
    }
}

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="max-w-3xl mx-auto px-6 py-20 text-center">
            <h1 class="text-3xl font-bold text-gray-900 mb-4">{"Page not found"}</h1>
            <Link<Route> to={Route::Home} classes="text-teal-700 font-medium">{"Back to home"}</Link<Route>>
        </div>
    }
}
