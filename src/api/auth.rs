// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

//! Client for the auth API (`/api/fortress_auth`)

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ConsoleConfig;
use crate::errors::ApiError;
use crate::session::Session;
use crate::types::MessageResponse;

#[derive(Debug, Clone, Deserialize)]
struct TokenPairResponse {
    access: Option<String>,
    refresh: Option<String>,
}

pub struct AuthClient {
    http: reqwest::Client,
    base: String,
}

impl AuthClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("FortressConsole/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Connection {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base: config.auth_base(),
        })
    }

    /// Exchange credentials for a JWT pair
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let body: TokenPairResponse = self
            .post(
                "/login/",
                &serde_json::json!({ "username": username, "password": password }),
            )
            .await?;

        let access = body
            .access
            .ok_or_else(|| ApiError::InvalidResponse("Missing access token in response".to_string()))?;

        Ok(Session::new(access, body.refresh))
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post(
            "/register/",
            &serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post(
            "/reset-password/",
            &serde_json::json!({ "username": username, "new_password": new_password }),
        )
        .await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base, path);
        debug!("[Auth] POST {}", url);

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        debug!("[Auth] {} {}", status.as_u16(), url);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::server(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
