use crate::auth::AuthProvider;
use crate::components::Header;
use crate::config::AppContext;
use crate::router::{switch, Route};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub context: AppContext,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<AppContext> context={props.context.clone()}>
            <AuthProvider>
                <BrowserRouter>
                    <div class="min-h-screen flex flex-col bg-gray-50">
                        <Header />
                        <main class="flex-1">
                            <Switch<Route> render={switch} />
                        </main>
                    </div>
                </BrowserRouter>
            </AuthProvider>
        </ContextProvider<AppContext>>
    }
}

#[derive(Properties, PartialEq)]
pub struct StartupErrorProps {
    pub message: String,
}

/// Shown instead of the app when the configuration is unusable
#[function_component(StartupError)]
pub fn startup_error(props: &StartupErrorProps) -> Html {
    html! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 px-4">
            <div class="max-w-lg w-full p-6 bg-red-50 text-red-700 rounded-lg">
                <h1 class="text-xl font-bold mb-2">{"MediBook failed to start"}</h1>
                <p class="text-sm font-mono">{&props.message}</p>
            </div>
        </div>
    }
}
