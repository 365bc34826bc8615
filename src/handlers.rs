// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact service.

use crate::config::Config;
use crate::delivery::{EmailProvider, Mailer};
use crate::limiter::{client_key, RateLimiter};
use crate::metrics::Metrics;
use crate::pipeline::{
    self, ErrorResponse, SubmissionOutcome, INTERNAL_ERROR_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, DefaultBodyLimit, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// A valid form with every field at its maximum and every character sent as
/// a `\uXXXX\uXXXX` surrogate pair stays around 125 KiB.
pub const BODY_LIMIT: usize = 256 * 1024;

/// Shared application state.
pub struct AppState<P> {
    pub limiter: RateLimiter,
    pub mailer: Mailer<P>,
    pub metrics: Metrics,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn app<P: EmailProvider>(state: Arc<AppState<P>>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route(
            "/api/contact",
            post(submit_contact::<P>).get(method_not_allowed),
        );

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics::<P>));
    }

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "portfolio-contact",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/contact`
///
/// A body that cannot be buffered is handed on as an error so the rate
/// check still runs first.
pub async fn submit_contact<P: EmailProvider>(
    State(state): State<Arc<AppState<P>>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> SubmissionOutcome {
    let key = client_key(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.config.rate_limit.trust_proxy_headers,
    );

    pipeline::process::<P>(&state, &key, body).await
}

/// `GET /api/contact`
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new(METHOD_NOT_ALLOWED_MESSAGE)),
    )
        .into_response()
}

/// Prometheus scrape endpoint.
pub async fn metrics<P: EmailProvider>(State(state): State<Arc<AppState<P>>>) -> Response {
    state
        .metrics
        .set_tracked_keys(state.limiter.tracked_keys().await);

    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}
