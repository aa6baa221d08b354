//! Authentication API service

use crate::client::{ApiClient, ClientError};
use medibook_core::{Identity, StoredSession};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl From<LoginResponse> for StoredSession {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            identity: response.user,
            expires_at: response.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Authentication API service
#[derive(Clone)]
pub struct AuthApiService {
    client: ApiClient,
}

impl AuthApiService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: ApiClient::new(base_url),
        }
    }

    /// Exchange credentials for a session
    pub async fn login(&self, email: String, password: String) -> Result<LoginResponse, ClientError> {
        let request = self
            .client
            .request(reqwest::Method::POST, "/auth/login")
            .json(&LoginRequest { email, password });
        self.client.execute(request).await
    }

    /// Create a patient account
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let request = self
            .client
            .request(reqwest::Method::POST, "/auth/register")
            .json(request);
        self.client.execute_empty(request).await
    }

    /// Fetch the identity behind `token`
    pub async fn current_identity(&self, token: &str) -> Result<Identity, ClientError> {
        let client = self.client.clone().with_token(token);
        let request = client.request(reqwest::Method::GET, "/auth/me");
        client.execute(request).await
    }
}
