use medibook_core::{AppConfig, CoreResult};
use medibook_frontend::{logging, App, AppContext, AppProps, StartupError, StartupErrorProps};

fn load_context() -> CoreResult<AppContext> {
    let config = AppConfig::load()?;
    let policy = config.access_policy()?;
    AppContext::new(config, policy)
}

fn main() {
    match load_context() {
        Ok(context) => {
            logging::init(&context.config.log_level);
            tracing::info!(api = %context.config.api_base_url, "Starting MediBook");
            yew::Renderer::<App>::with_props(AppProps { context }).render();
        }
        Err(e) => {
            logging::init("info");
            tracing::error!("Invalid configuration: {e}");
            yew::Renderer::<StartupError>::with_props(StartupErrorProps {
                message: e.to_string(),
            })
            .render();
        }
    }
}
