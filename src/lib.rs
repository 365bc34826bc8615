// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Service
//!
//! Accepts contact form submissions for the portfolio site and forwards
//! them as email:
//!
//! - Fixed-window rate limiting per client key (3 per hour default)
//! - Field validation with per-field error reporting
//! - Honeypot bot trap answered with a fake success
//! - HTML escaping of free-text fields
//! - Delivery through a transactional email API, degrading to a logged
//!   no-op when no credential is configured

pub mod config;
pub mod delivery;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod pipeline;
pub mod sanitizer;
pub mod validator;

pub use config::Config;
pub use delivery::{DeliveryResult, EmailProvider, Mailer};
pub use limiter::{RateLimitResult, RateLimiter};
pub use pipeline::SubmissionOutcome;
pub use validator::{ContactSubmission, FieldError};
