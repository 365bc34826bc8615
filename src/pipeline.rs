// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission pipeline.
//!
//! Steps run strictly in order, and each one can end the request:
//!
//! 1. rate check (429)
//! 2. body reading and parsing (500)
//! 3. honeypot check (fake 200, nothing is sent, other fields ignored)
//! 4. field validation (400 with per-field details)
//! 5. sanitizing
//! 6. delivery (200, 200 marked development, or 500)
//!
//! Every path ends in a [`SubmissionOutcome`]; nothing is propagated to the
//! transport as an error.

use crate::delivery::{DeliveryResult, EmailProvider};
use crate::handlers::AppState;
use crate::sanitizer::sanitize_submission;
use crate::validator::{self, FieldError};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! You will receive a response soon.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";
pub const DELIVERY_FAILED_MESSAGE: &str =
    "Failed to send message. Please try again or email directly.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to send message. Please try again later.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Terminal state of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Delivered { message_id: String },
    /// Provider unconfigured; accepted without sending.
    Development,
    /// Honeypot filled; answered exactly like a delivery.
    Trapped,
    RateLimited,
    Malformed,
    Invalid(Vec<FieldError>),
    DeliveryFailed,
}

impl SubmissionOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "delivered",
            Self::Development => "development",
            Self::Trapped => "honeypot",
            Self::RateLimited => "rate_limited",
            Self::Malformed => "malformed",
            Self::Invalid(_) => "invalid",
            Self::DeliveryFailed => "delivery_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Delivered { .. } | Self::Development | Self::Trapped => StatusCode::OK,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Malformed | Self::DeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every 200 response.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development: Option<bool>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: &'static str) -> Self {
        Self { error, details: None }
    }
}

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Delivered { .. } | Self::Trapped => success(status, None),
            Self::Development => success(status, Some(true)),
            Self::RateLimited => {
                (status, Json(ErrorResponse::new(RATE_LIMITED_MESSAGE))).into_response()
            }
            Self::Invalid(details) => (
                status,
                Json(ErrorResponse {
                    error: INVALID_INPUT_MESSAGE,
                    details: Some(details),
                }),
            )
                .into_response(),
            Self::Malformed => {
                (status, Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE))).into_response()
            }
            Self::DeliveryFailed => {
                (status, Json(ErrorResponse::new(DELIVERY_FAILED_MESSAGE))).into_response()
            }
        }
    }
}

fn success(status: StatusCode, development: Option<bool>) -> Response {
    (
        status,
        Json(SuccessResponse {
            success: true,
            message: SUCCESS_MESSAGE,
            development,
        }),
    )
        .into_response()
}

/// Run one submission through the pipeline.
#[instrument(skip_all, fields(client = %client_key))]
pub async fn process<P: EmailProvider>(
    state: &AppState<P>,
    client_key: &str,
    body: Result<Bytes, BytesRejection>,
) -> SubmissionOutcome {
    let outcome = run(state, client_key, body).await;
    state.metrics.record(outcome.label());
    outcome
}

async fn run<P: EmailProvider>(
    state: &AppState<P>,
    client_key: &str,
    body: Result<Bytes, BytesRejection>,
) -> SubmissionOutcome {
    if !state.limiter.check_rate_limit(client_key).await {
        info!("Contact submission rate limited");
        return SubmissionOutcome::RateLimited;
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            error!(error = %rejection, "Failed to read contact submission body");
            return SubmissionOutcome::Malformed;
        }
    };

    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(err) => {
            error!(error = %err, "Failed to parse contact submission body");
            return SubmissionOutcome::Malformed;
        }
    };

    if validator::honeypot_filled(&raw) {
        let email = raw.get("email").and_then(Value::as_str).unwrap_or_default();
        warn!(security = true, email, "Honeypot triggered");
        return SubmissionOutcome::Trapped;
    }

    let submission = match validator::validate(&raw) {
        Ok(submission) => submission,
        Err(details) => {
            debug!(?details, "Contact submission rejected");
            return SubmissionOutcome::Invalid(details);
        }
    };

    let submission = sanitize_submission(submission);

    match state.mailer.send(&submission).await {
        DeliveryResult::Sent { message_id } => {
            info!(%message_id, "Contact email sent");
            SubmissionOutcome::Delivered { message_id }
        }
        DeliveryResult::Unconfigured => {
            warn!("Contact submission accepted without delivery; email provider not configured");
            SubmissionOutcome::Development
        }
        DeliveryResult::Failed { reason } => {
            error!(%reason, "Contact email delivery failed");
            SubmissionOutcome::DeliveryFailed
        }
    }
}
