// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP client for a Resend-compatible transactional email API.

use super::{EmailProvider, OutboundEmail, ProviderError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    name: Option<String>,
}

/// `POST {base_url}/emails` with a bearer credential.
#[derive(Debug, Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ResendClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("portfolio-contact/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }
}

impl EmailProvider for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<String, ProviderError> {
        debug!(endpoint = %self.endpoint, to = %email.to, "Submitting email to provider");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: SendResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
            return Ok(body.id);
        }

        let reason = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorResponse {
                name: Some(name), ..
            }) => name,
            _ => format!("Failed to send email (HTTP {})", status.as_u16()),
        };

        Err(ProviderError::Rejected(reason))
    }
}
