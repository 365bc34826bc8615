// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact submissions.
//!
//! Each client key gets a counter that resets when its window expires.
//! A client can therefore send up to twice the threshold across a window
//! boundary; this is accepted.
//!
//! The limiter is process-local and forgets everything on restart.

use crate::config::RateLimitConfig;
use axum::http::HeaderMap;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Key shared by every client that sends no identifying header.
pub const ANONYMOUS_KEY: &str = "anonymous";

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Counter for one client key.
#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_time: Instant,
}

impl WindowRecord {
    fn expired(&self, now: Instant) -> bool {
        now > self.reset_time
    }
}

/// Thread-safe fixed-window rate limiter.
///
/// The whole read-modify-write of a check runs under one write guard, so two
/// concurrent requests from the same client can never both observe an
/// expired window.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    records: Arc<RwLock<HashMap<String, WindowRecord>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Count a request against `key`.
    pub async fn check(&self, key: &str) -> RateLimitResult {
        let now = Instant::now();
        let window = self.config.window_duration();
        let max = self.config.max_requests;

        let mut records = self.records.write().await;

        match records.get_mut(key) {
            Some(record) if !record.expired(now) => {
                let reset_in = record.reset_time.saturating_duration_since(now);
                if record.count >= max {
                    debug!(key, count = record.count, ?reset_in, "Client rate limit exceeded");
                    return RateLimitResult::Limited {
                        retry_after: reset_in,
                    };
                }

                record.count += 1;
                RateLimitResult::Allowed {
                    remaining: max - record.count,
                    reset_in,
                }
            }
            _ => {
                records.insert(
                    key.to_string(),
                    WindowRecord {
                        count: 1,
                        reset_time: now + window,
                    },
                );
                debug!(key, "Opened new rate limit window");
                RateLimitResult::Allowed {
                    remaining: max.saturating_sub(1),
                    reset_in: window,
                }
            }
        }
    }

    /// Boolean form of [`RateLimiter::check`].
    pub async fn check_rate_limit(&self, key: &str) -> bool {
        self.check(key).await.is_allowed()
    }

    /// Drop records whose window has expired.
    ///
    /// An expired record and a missing one behave the same on the next
    /// check, so this only bounds memory.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.expired(now));
        let removed = before - records.len();
        if removed > 0 {
            debug!(removed, remaining = records.len(), "Swept expired rate limit records");
        }
        removed
    }

    /// Number of client keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Derive the rate limit key for a request.
///
/// With `trust_proxy_headers` the first non-empty of `x-forwarded-for` and
/// `x-real-ip` is used verbatim. These headers are client-controlled unless a
/// reverse proxy overwrites them, so the flag must only be set behind one.
/// Without it the peer address is used. Either way, `anonymous` is the
/// fallback.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> String {
    if trust_proxy_headers {
        let from_header = [FORWARDED_FOR, REAL_IP].iter().find_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        });

        return from_header.unwrap_or(ANONYMOUS_KEY).to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS_KEY.to_string())
}
