// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the contact service.
//!
//! Provides a scriptable email provider, an in-process router builder and
//! utilities for simulating abusive senders.

#![allow(dead_code)]

pub mod attacks;
pub mod generators;
pub mod metrics;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
    Router,
};
use portfolio_contact::{
    config::{Config, RateLimitConfig},
    handlers::{app, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    Mailer,
};
use providers::ScriptedProvider;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

pub type TestState = Arc<AppState<ScriptedProvider>>;

/// Build the router around an optional provider.
pub fn build_app(
    provider: Option<ScriptedProvider>,
    rate_limit: RateLimitConfig,
) -> (Router, TestState) {
    let config = Config {
        rate_limit: rate_limit.clone(),
        ..Default::default()
    };

    let state = Arc::new(AppState {
        limiter: RateLimiter::new(rate_limit),
        mailer: Mailer::new(
            provider,
            Some("noreply@portfolio.example".to_string()),
            Some("owner@portfolio.example".to_string()),
            "Portfolio",
        ),
        metrics: Metrics::new().expect("metrics registry"),
        config,
    });

    (app(state.clone()), state)
}

/// A request to send through the router.
pub struct Submission {
    pub body: String,
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub peer: Option<SocketAddr>,
}

impl Submission {
    pub fn json(body: &Value) -> Self {
        Self::raw(body.to_string())
    }

    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            forwarded_for: None,
            real_ip: None,
            peer: None,
        }
    }

    pub fn from_ip(mut self, ip: &str) -> Self {
        self.forwarded_for = Some(ip.to_string());
        self
    }

    pub fn real_ip(mut self, ip: &str) -> Self {
        self.real_ip = Some(ip.to_string());
        self
    }

    pub fn peer(mut self, addr: SocketAddr) -> Self {
        self.peer = Some(addr);
        self
    }

    fn into_request(self) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/contact")
            .header("content-type", "application/json");
        if let Some(ip) = &self.forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        if let Some(ip) = &self.real_ip {
            builder = builder.header("x-real-ip", ip);
        }

        let mut request = builder.body(Body::from(self.body)).unwrap();
        if let Some(addr) = self.peer {
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }
}

/// Send a submission and decode the JSON response.
pub async fn submit(app: &Router, submission: Submission) -> (StatusCode, Value) {
    send(app, submission.into_request()).await
}

/// Send any request and decode the JSON response (Null for empty bodies).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
