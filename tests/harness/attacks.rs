// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

/// How the sender identifies itself to the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// One `x-forwarded-for` value per simulated client.
    ForwardedFor,
    /// No identifying headers at all.
    Anonymous,
    /// A fresh spoofed `x-forwarded-for` on every request.
    RotatingSpoof,
}

/// What the sender puts in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Valid,
    Honeypot,
    Invalid,
    Malformed,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    pub total_requests: usize,
    pub unique_clients: usize,
    pub identity: Identity,
    pub payload: Payload,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_clients: 1,
            identity: Identity::ForwardedFor,
            payload: Payload::Valid,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the form.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            ..Default::default()
        }
    }

    /// Many clients, a few requests each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Bots filling every field including the hidden one.
    pub fn honeypot_bots() -> Self {
        Self {
            total_requests: 60,
            unique_clients: 30,
            payload: Payload::Honeypot,
            ..Default::default()
        }
    }

    /// Garbage bodies from one client.
    pub fn malformed_flood() -> Self {
        Self {
            total_requests: 50,
            payload: Payload::Malformed,
            ..Default::default()
        }
    }

    /// Invalid forms from one client.
    pub fn invalid_flood() -> Self {
        Self {
            total_requests: 50,
            payload: Payload::Invalid,
            ..Default::default()
        }
    }

    /// Clients sending no proxy headers.
    pub fn anonymous_senders() -> Self {
        Self {
            total_requests: 20,
            unique_clients: 20,
            identity: Identity::Anonymous,
            ..Default::default()
        }
    }

    /// A client forging a new address per request.
    pub fn spoofed_rotation() -> Self {
        Self {
            total_requests: 50,
            identity: Identity::RotatingSpoof,
            ..Default::default()
        }
    }

    /// Most requests one client key may get through with `max_requests`
    /// per window.
    pub fn max_accepted(&self, max_requests: usize) -> usize {
        let keys = match self.identity {
            Identity::ForwardedFor => self.unique_clients,
            Identity::Anonymous => 1,
            Identity::RotatingSpoof => self.total_requests,
        };
        (keys * max_requests).min(self.total_requests)
    }
}
