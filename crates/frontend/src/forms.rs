//! Client-side form state and validation

use crate::config::AuthConfig;
use crate::services::RegisterRequest;

/// Login form fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

/// Patient registration form fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("First and last name are required".to_string());
        }
        validate_email(&self.email)?;
        if self.password.chars().count() < AuthConfig::MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters",
                AuthConfig::MIN_PASSWORD_LEN
            ));
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        Ok(())
    }

    /// Validated request body, with names and email trimmed
    pub fn to_request(&self) -> Result<RegisterRequest, String> {
        self.validate()?;
        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("Enter a valid email address".to_string()),
    }
}

/// Where to send a user after login: the page they were bounced from, if
/// it is a local path other than the login page itself
pub fn return_path<'a>(from: Option<&'a str>, login_path: &str, home: &'a str) -> &'a str {
    match from {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && path.split(['?', '#']).next() != Some(login_path) =>
        {
            path
        }
        _ => home,
    }
}
