// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML escaping for free-text fields.
//!
//! Applied exactly once per field, right after validation. The
//! result is not idempotent: escaping twice turns `&amp;` into `&amp;amp;`.

use crate::validator::ContactSubmission;

/// Escape the characters that carry meaning in HTML.
pub fn sanitize(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape `name`, `subject` and `message`. The email was already
/// normalized by validation and is left alone.
pub fn sanitize_submission(submission: ContactSubmission) -> ContactSubmission {
    ContactSubmission {
        name: sanitize(&submission.name),
        subject: sanitize(&submission.subject),
        message: sanitize(&submission.message),
        ..submission
    }
}
