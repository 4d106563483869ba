// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deterministic inquiry message composition.
//!
//! Builds the HTML body and its plaintext equivalent from a sanitized
//! submission plus a server-generated timestamp. Optional fields are
//! omitted entirely when absent. Interpolated text is markup-safe because
//! sanitization has already stripped angle brackets.

use crate::config::MailConfig;
use chrono::{DateTime, Utc};

/// A submission whose free-text fields have passed through the sanitizer.
/// The email address is shape-checked but carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

/// A fully composed inquiry message, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    /// Submitter address, set as Reply-To so staff can answer directly
    pub reply_to: String,
    /// Never empty; falls back to the fixed default recipient
    pub recipients: Vec<String>,
}

/// Compose the inquiry message for a sanitized submission.
pub fn compose(
    submission: &SanitizedSubmission,
    mail: &MailConfig,
    submitted_at: DateTime<Utc>,
) -> ComposedMessage {
    let timestamp = submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    ComposedMessage {
        subject: format!("New inquiry from {}", submission.name),
        html_body: html_body(submission, &timestamp),
        text_body: text_body(submission, &timestamp),
        reply_to: submission.email.clone(),
        recipients: mail.recipient_list(),
    }
}

fn html_body(submission: &SanitizedSubmission, timestamp: &str) -> String {
    let mut details = format!(
        "<p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\n",
        submission.name,
        email = submission.email,
    );
    if let Some(company) = &submission.company {
        details.push_str(&format!("<p><strong>Company:</strong> {company}</p>\n"));
    }
    if let Some(phone) = &submission.phone {
        details.push_str(&format!("<p><strong>Phone:</strong> {phone}</p>\n"));
    }

    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n\
         <h2>New inquiry</h2>\n\
         <h3>Contact details</h3>\n\
         {details}\
         <h3>Message</h3>\n\
         <p style=\"white-space: pre-wrap;\">{message}</p>\n\
         <hr>\n\
         <p>Reply directly to this email to respond to {name}.</p>\n\
         <p><strong>Submitted:</strong> {timestamp}</p>\n\
         </div>",
        message = submission.message,
        name = submission.name,
    )
}

fn text_body(submission: &SanitizedSubmission, timestamp: &str) -> String {
    let mut body = format!(
        "New inquiry\n\nName: {}\nEmail: {}\n",
        submission.name, submission.email
    );
    if let Some(company) = &submission.company {
        body.push_str(&format!("Company: {company}\n"));
    }
    if let Some(phone) = &submission.phone {
        body.push_str(&format!("Phone: {phone}\n"));
    }
    body.push_str(&format!(
        "\nMessage:\n{}\n\nReply directly to this email to respond to {}.\nSubmitted: {}\n",
        submission.message, submission.name, timestamp
    ));
    body
}
