// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A submission that passes validation.
pub fn valid_form() -> Value {
    json!({
        "name": "Al",
        "email": "a@b.co",
        "subject": "Hi there",
        "message": "1234567890",
        "honeypot": ""
    })
}

/// A valid submission with the hidden field filled, as a naive bot would.
pub fn bot_form(i: usize) -> Value {
    let mut form = valid_form();
    form["honeypot"] = json!(format!("http://cheap-pills-{i}.example"));
    form
}

/// Forms failing validation in different ways.
pub fn invalid_forms() -> Vec<Value> {
    vec![
        json!({}),
        json!({ "name": "X", "email": "a@b.co", "subject": "Hi there", "message": "1234567890" }),
        json!({ "name": "Al", "email": "nope", "subject": "Hi there", "message": "1234567890" }),
        json!({ "name": "Al", "email": "a@b.co", "subject": "Hi", "message": "1234567890" }),
        json!({ "name": "Al", "email": "a@b.co", "subject": "Hi there", "message": "short" }),
        json!({ "name": "<script>", "email": "a@b.co", "subject": "Hi there", "message": "1234567890" }),
        json!({ "name": ["Al"], "email": "a@b.co", "subject": "Hi there", "message": "1234567890" }),
        json!("name=Al&email=a@b.co"),
    ]
}

/// Bodies that are not JSON at all.
pub fn malformed_bodies() -> Vec<&'static str> {
    vec![
        "",
        "name=Al&email=a%40b.co",
        "{\"name\": \"Al\"",
        "<form><input name=\"name\"></form>",
        "\u{0}\u{1}\u{2}",
    ]
}
