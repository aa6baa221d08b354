pub mod auth;

pub use auth::{AuthApiService, LoginResponse, RegisterRequest};
