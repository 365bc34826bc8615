// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact form validator.
//!
//! Checks every field of a submitted form and reports all failing fields
//! together, one entry per field. A filled honeypot is detected on the raw
//! body with [`honeypot_filled`] so bots never see field errors.

use lettre::Address;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const SUBJECT_MIN: usize = 5;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 10_000;

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// A form that passed validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    /// Trimmed and lowercased.
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
}

/// Whether the hidden field carries a value, whatever the other fields hold.
pub fn honeypot_filled(raw: &Value) -> bool {
    raw.get("honeypot")
        .and_then(Value::as_str)
        .is_some_and(|value| !value.is_empty())
}

/// Validate a parsed request body.
pub fn validate(raw: &Value) -> Result<ContactSubmission, Vec<FieldError>> {
    let Some(form) = raw.as_object() else {
        debug!("Submission body is not an object");
        return Err(vec![FieldError::new("body", "Expected object")]);
    };

    let mut errors = Vec::new();

    let name = check(&mut errors, "name", required_str(form, "name").and_then(check_name));
    let email = check(&mut errors, "email", required_str(form, "email").and_then(check_email));
    let subject = check(
        &mut errors,
        "subject",
        required_str(form, "subject").and_then(|s| {
            check_length(
                s,
                SUBJECT_MIN,
                SUBJECT_MAX,
                "Subject must be at least 5 characters",
                "Subject must be less than 200 characters",
            )
        }),
    );
    let message = check(
        &mut errors,
        "message",
        required_str(form, "message").and_then(|s| {
            check_length(
                s,
                MESSAGE_MIN,
                MESSAGE_MAX,
                "Message must be at least 10 characters",
                "Message must be less than 10,000 characters",
            )
        }),
    );
    let honeypot = check(&mut errors, "honeypot", optional_str(form, "honeypot"));

    match (name, email, subject, message, honeypot) {
        (Some(name), Some(email), Some(subject), Some(message), Some(honeypot)) => {
            Ok(ContactSubmission {
                name: name.to_string(),
                email,
                subject: subject.to_string(),
                message: message.to_string(),
                honeypot: honeypot.to_string(),
            })
        }
        _ => {
            debug!(failed = errors.len(), "Submission failed validation");
            Err(errors)
        }
    }
}

fn check<T>(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    result: Result<T, &'static str>,
) -> Option<T> {
    result
        .map_err(|message| errors.push(FieldError::new(field, message)))
        .ok()
}

fn required_str<'a>(form: &'a Map<String, Value>, field: &str) -> Result<&'a str, &'static str> {
    match form.get(field) {
        None | Some(Value::Null) => Err("Required"),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err("Expected string"),
    }
}

/// Forms posted by scripts may leave the hidden field out entirely.
fn optional_str<'a>(form: &'a Map<String, Value>, field: &str) -> Result<&'a str, &'static str> {
    match form.get(field) {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err("Expected string"),
    }
}

fn check_length<'a>(
    value: &'a str,
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
) -> Result<&'a str, &'static str> {
    let len = value.chars().count();
    if len < min {
        Err(too_short)
    } else if len > max {
        Err(too_long)
    } else {
        Ok(value)
    }
}

fn check_name(name: &str) -> Result<&str, &'static str> {
    let name = check_length(
        name,
        NAME_MIN,
        NAME_MAX,
        "Name must be at least 2 characters",
        "Name must be less than 100 characters",
    )?;

    let allowed = |c: char| c.is_ascii_alphabetic() || c.is_whitespace() || c == '\'' || c == '-';
    if name.chars().all(allowed) {
        Ok(name)
    } else {
        Err("Name contains invalid characters")
    }
}

fn check_email(email: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.chars().count() > EMAIL_MAX {
        return Err("Email is too long");
    }
    match email.parse::<Address>() {
        Ok(address) if plain_user(address.user()) && dotted_domain(address.domain()) => {
            Ok(email.to_lowercase())
        }
        _ => Err("Invalid email address"),
    }
}

/// Quoted local parts are not accepted.
fn plain_user(user: &str) -> bool {
    !user.contains('"')
}

/// A host name ending in an alphabetic TLD of two or more letters. IP
/// literals are rejected.
fn dotted_domain(domain: &str) -> bool {
    if domain.starts_with('[') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}
