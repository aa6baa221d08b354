//! MediBook web client

pub mod app;
pub mod auth;
pub mod client;
pub mod components;
pub mod config;
pub mod forms;
pub mod logging;
pub mod pages;
pub mod router;
pub mod services;

pub use app::{App, AppProps, StartupError, StartupErrorProps};
pub use config::AppContext;
