// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Delivery of contact submissions as transactional email.
//!
//! A missing provider credential is not a failure: the submission is logged
//! and reported as [`DeliveryResult::Unconfigured`] so the site keeps working
//! in development.

pub mod resend;
pub mod template;

use crate::config::EmailConfig;
use crate::validator::ContactSubmission;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;
use tracing::{error, info, warn};

pub use resend::ResendClient;

/// Correlation header forwarded to the provider.
pub const ENTITY_REF_HEADER: &str = "X-Entity-Ref-ID";

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Sent { message_id: String },
    Unconfigured,
    Failed { reason: String },
}

/// Errors reported by an email provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Rejected(String),

    #[error("Email provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Request body accepted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: String,
    pub headers: BTreeMap<String, String>,
}

/// A transactional email API.
pub trait EmailProvider: Send + Sync + 'static {
    /// Submit one email; returns the provider-assigned id.
    fn send(
        &self,
        email: &OutboundEmail,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// Composes and dispatches contact emails. One attempt per submission.
pub struct Mailer<P> {
    provider: Option<P>,
    from: Option<String>,
    to: Option<String>,
    site_name: String,
}

impl Mailer<ResendClient> {
    /// Build a mailer backed by the HTTP provider. Without an API key the
    /// mailer runs unconfigured.
    pub fn from_config(config: &EmailConfig, site_name: &str) -> Result<Self, ProviderError> {
        let provider = config
            .api_key
            .as_deref()
            .map(|key| ResendClient::new(&config.api_base_url, key))
            .transpose()?;

        Ok(Self::new(provider, config.from.clone(), config.to.clone(), site_name))
    }
}

impl<P: EmailProvider> Mailer<P> {
    pub fn new(
        provider: Option<P>,
        from: Option<String>,
        to: Option<String>,
        site_name: &str,
    ) -> Self {
        Self {
            provider,
            from,
            to,
            site_name: site_name.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Send a validated, genuine and sanitized submission.
    pub async fn send(&self, submission: &ContactSubmission) -> DeliveryResult {
        let Some(provider) = &self.provider else {
            warn!("Email service not configured, submission not sent");
            info!(
                name = %submission.name,
                email = %submission.email,
                subject = %submission.subject,
                "Contact submission (not sent)"
            );
            return DeliveryResult::Unconfigured;
        };

        let (Some(from), Some(to)) = (&self.from, &self.to) else {
            error!("EMAIL_FROM or EMAIL_TO not configured");
            return DeliveryResult::Failed {
                reason: "addresses not configured".to_string(),
            };
        };

        let email = self.compose(submission, from, to);

        match provider.send(&email).await {
            Ok(message_id) => DeliveryResult::Sent { message_id },
            Err(err) => {
                error!(error = %err, "Email provider rejected contact email");
                DeliveryResult::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Send a fixed sample submission to check the provider setup.
    pub async fn send_test_email(&self) -> DeliveryResult {
        self.send(&ContactSubmission {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            subject: "Test Email from Portfolio".to_string(),
            message: "This is a test email to verify the email configuration is working correctly."
                .to_string(),
            honeypot: String::new(),
        })
        .await
    }

    fn compose(&self, submission: &ContactSubmission, from: &str, to: &str) -> OutboundEmail {
        let now = chrono::Utc::now();
        let headers = BTreeMap::from([(
            ENTITY_REF_HEADER.to_string(),
            format!("contact-{}", now.timestamp_millis()),
        )]);

        OutboundEmail {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Portfolio Contact: {}", submission.subject),
            html: template::html(submission, &self.site_name, now),
            text: template::text(submission, &self.site_name, now),
            reply_to: submission.email.clone(),
            headers,
        }
    }
}
