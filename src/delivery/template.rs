// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML and plain-text bodies for contact emails.
//!
//! `name`, `subject` and `message` arrive already escaped. Only the email
//! address is escaped here.

use crate::sanitizer::sanitize;
use crate::validator::ContactSubmission;
use chrono::{DateTime, Utc};

const STYLE: &str = r#"
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
      line-height: 1.6;
      color: #333;
      max-width: 600px;
      margin: 0 auto;
      padding: 20px;
      background-color: #f5f5f5;
    }
    .container { background-color: #ffffff; border-radius: 8px; padding: 30px; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1); }
    .header { border-bottom: 3px solid #8b5cf6; padding-bottom: 20px; margin-bottom: 30px; }
    .header h1 { margin: 0; color: #8b5cf6; font-size: 24px; }
    .field { margin-bottom: 20px; }
    .label { font-weight: 600; color: #666; font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px; }
    .value { color: #333; font-size: 16px; margin-top: 5px; }
    .message-box { background-color: #f8f9fa; border-left: 4px solid #8b5cf6; padding: 15px; border-radius: 4px; margin-top: 10px; white-space: pre-wrap; word-wrap: break-word; }
    .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #e5e7eb; text-align: center; color: #666; font-size: 14px; }
    .reply-button { display: inline-block; background-color: #8b5cf6; color: white; text-decoration: none; padding: 12px 24px; border-radius: 6px; margin-top: 20px; font-weight: 600; }
"#;

fn sent_on(now: DateTime<Utc>) -> String {
    now.format("%A, %B %-d, %Y at %H:%M UTC").to_string()
}

pub fn html(submission: &ContactSubmission, site_name: &str, now: DateTime<Utc>) -> String {
    let email = sanitize(&submission.email);
    let site_name = sanitize(site_name);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{site_name} Contact Form Submission</title>
  <style>{STYLE}</style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>New Contact Form Submission</h1>
    </div>

    <div class="field">
      <div class="label">From</div>
      <div class="value"><strong>{name}</strong></div>
    </div>

    <div class="field">
      <div class="label">Email</div>
      <div class="value">
        <a href="mailto:{email}" style="color: #8b5cf6; text-decoration: none;">{email}</a>
      </div>
    </div>

    <div class="field">
      <div class="label">Subject</div>
      <div class="value">{subject}</div>
    </div>

    <div class="field">
      <div class="label">Message</div>
      <div class="message-box">{message}</div>
    </div>

    <div style="text-align: center;">
      <a href="mailto:{email}" class="reply-button">Reply to {name}</a>
    </div>

    <div class="footer">
      <p>This email was sent from the {site_name} contact form.</p>
      <p style="color: #999; font-size: 12px;">Sent on {sent_on}</p>
    </div>
  </div>
</body>
</html>"#,
        name = submission.name,
        subject = submission.subject,
        message = submission.message,
        sent_on = sent_on(now),
    )
}

pub fn text(submission: &ContactSubmission, site_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "NEW CONTACT FORM SUBMISSION
===========================

From: {name}
Email: {email}
Subject: {subject}

Message:
--------
{message}

---
Sent from the {site_name} contact form
{sent_on}",
        name = submission.name,
        email = submission.email,
        subject = submission.subject,
        message = submission.message,
        sent_on = sent_on(now),
    )
}
