// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact submission service.
//!
//! Everything is optional outside production so the service runs with no
//! credentials at all; production refuses to start with gaps.

use lettre::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound for window and sweep lengths: one year.
const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Configuration errors raised at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            other => Err(format!("expected development, test or production, got {other:?}")),
        }
    }
}

/// Configuration for the contact service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Public identity of the site, used in outbound mail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: Option<String>,
    pub name: Option<String>,
}

/// Fixed-window limits applied per client key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window (default: 3)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of expired records (default: 60)
    #[serde(default = "default_cleanup_secs")]
    pub cleanup_interval_secs: u64,

    /// Derive the client key from `x-forwarded-for` / `x-real-ip`.
    /// Only safe behind a proxy that overwrites these headers.
    #[serde(default = "default_true")]
    pub trust_proxy_headers: bool,
}

/// Email provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    3600
}

fn default_cleanup_secs() -> u64 {
    60
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            environment: Environment::default(),
            site: SiteConfig::default(),
            rate_limit: RateLimitConfig::default(),
            email: EmailConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: default_cleanup_secs(),
            trust_proxy_headers: default_true(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from: None,
            to: None,
            api_base_url: default_api_base_url(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = match get("APP_ENV").or_else(|| get("NODE_ENV")) {
            Some(v) => v
                .parse::<Environment>()
                .map_err(|reason| ConfigError::Invalid { var: "APP_ENV", reason })?,
            None => Environment::default(),
        };

        let defaults = RateLimitConfig::default();
        let config = Config {
            bind_addr: get("BIND_ADDR").unwrap_or_else(default_bind_addr),
            environment,
            site: SiteConfig {
                url: get("SITE_URL"),
                name: get("SITE_NAME"),
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_var(&get, "RATE_LIMIT_MAX_REQUESTS")?
                    .unwrap_or(defaults.max_requests),
                window_secs: parse_var(&get, "RATE_LIMIT_WINDOW_SECS")?
                    .unwrap_or(defaults.window_secs),
                cleanup_interval_secs: parse_var(&get, "RATE_LIMIT_CLEANUP_SECS")?
                    .unwrap_or(defaults.cleanup_interval_secs),
                trust_proxy_headers: parse_var(&get, "TRUST_PROXY_HEADERS")?
                    .unwrap_or(defaults.trust_proxy_headers),
            },
            email: EmailConfig {
                api_key: get("RESEND_API_KEY").or_else(|| get("EMAIL_API_KEY")),
                from: get("EMAIL_FROM"),
                to: get("EMAIL_TO"),
                api_base_url: get("EMAIL_API_BASE_URL").unwrap_or_else(default_api_base_url),
            },
            metrics: MetricsConfig {
                enabled: parse_var(&get, "METRICS_ENABLED")?.unwrap_or(true),
                path: get("METRICS_PATH").unwrap_or_else(default_metrics_path),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value formats, and in production the presence of every
    /// setting the contact pipeline needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(site_url) = &self.site.url {
            Url::parse(site_url).map_err(|e| ConfigError::Invalid {
                var: "SITE_URL",
                reason: e.to_string(),
            })?;
        }

        for (var, value) in [("EMAIL_FROM", &self.email.from), ("EMAIL_TO", &self.email.to)] {
            if let Some(address) = value {
                if address.parse::<Address>().is_err() {
                    return Err(ConfigError::Invalid {
                        var,
                        reason: format!("{address:?} is not a valid email address"),
                    });
                }
            }
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid {
                var: "RATE_LIMIT_MAX_REQUESTS",
                reason: "must be at least 1".to_string(),
            });
        }

        for (var, secs) in [
            ("RATE_LIMIT_WINDOW_SECS", self.rate_limit.window_secs),
            ("RATE_LIMIT_CLEANUP_SECS", self.rate_limit.cleanup_interval_secs),
        ] {
            if !(1..=MAX_INTERVAL_SECS).contains(&secs) {
                return Err(ConfigError::Invalid {
                    var,
                    reason: format!("must be between 1 and {MAX_INTERVAL_SECS} seconds"),
                });
            }
        }

        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::Invalid {
                var: "METRICS_PATH",
                reason: "must start with '/'".to_string(),
            });
        }

        if self.environment == Environment::Production {
            let missing: Vec<&'static str> = [
                ("SITE_URL", self.site.url.is_none()),
                ("SITE_NAME", self.site.name.is_none()),
                ("RESEND_API_KEY", self.email.api_key.is_none()),
                ("EMAIL_FROM", self.email.from.is_none()),
                ("EMAIL_TO", self.email.to.is_none()),
            ]
            .into_iter()
            .filter_map(|(var, absent)| absent.then_some(var))
            .collect();

            if !missing.is_empty() {
                return Err(ConfigError::Missing(missing));
            }
        }

        Ok(())
    }

    pub fn site_name(&self) -> &str {
        self.site.name.as_deref().unwrap_or("Portfolio")
    }
}

fn parse_var<T, G>(get: &G, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(var)
        .map(|v| {
            v.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            })
        })
        .transpose()
}
