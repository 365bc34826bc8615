// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Service
//!
//! Serves `POST /api/contact` for the portfolio site.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables, with an optional
//! `.env` file read first:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `APP_ENV` / `NODE_ENV`: development, test or production
//! - `SITE_URL`, `SITE_NAME`: public identity used in outbound mail
//! - `RESEND_API_KEY`, `EMAIL_FROM`, `EMAIL_TO`: email delivery
//! - `RATE_LIMIT_MAX_REQUESTS`: Requests per window per client (default: 3)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 3600)
//! - `TRUST_PROXY_HEADERS`: Key clients by `x-forwarded-for` / `x-real-ip`
//!   (default: true; only safe behind a reverse proxy)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_contact::{
    config::Config,
    delivery::{Mailer, ResendClient},
    handlers::{app, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        environment = ?config.environment,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        trust_proxy_headers = config.rate_limit.trust_proxy_headers,
        "Starting portfolio contact service"
    );

    let mailer = Mailer::<ResendClient>::from_config(&config.email, config.site_name())?;
    if !mailer.is_configured() {
        warn!("Email service not configured. Set RESEND_API_KEY to send emails.");
    }

    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        mailer,
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(cleanup_state.config.rate_limit.cleanup_interval());
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup().await;
            cleanup_state
                .metrics
                .set_tracked_keys(cleanup_state.limiter.tracked_keys().await);
        }
    });

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
