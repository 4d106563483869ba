// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Implements ingress-level validation for contact form submissions:
//! - Required-field presence (name, email, message)
//! - Email address shape check (`localpart@domain.tld`)
//! - Header-injection rejection (no whitespace or control characters in
//!   the address, which covers embedded CR/LF)
//!
//! Required-field presence treats a whitespace-only value as present; such
//! values are caught by the post-sanitization re-check instead.

use thiserror::Error;
use tracing::debug;

/// Validation error types. The display strings double as the user-visible
/// response messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name, email, and message are required")]
    MissingFields,

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("Invalid input")]
    EmptyAfterSanitize,
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission is valid
    Valid,
    /// Submission is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Validate required fields and the email shape on a raw submission.
pub fn validate_required(
    name: Option<&str>,
    email: Option<&str>,
    message: Option<&str>,
) -> ValidationResult {
    let missing = |field: Option<&str>| field.is_none() || field == Some("");
    if missing(name) || missing(email) || missing(message) {
        debug!("required field absent");
        return ValidationResult::Invalid(ValidationError::MissingFields);
    }

    // Presence established above
    let email = email.unwrap_or_default();
    if !is_valid_email(email) {
        debug!(email = %email, "email failed shape check");
        return ValidationResult::Invalid(ValidationError::InvalidEmail);
    }

    ValidationResult::Valid
}

/// Re-check the sanitized name and message.
///
/// Sanitization can reduce a whitespace-only or control-character-only
/// field to the empty string; such submissions are rejected here.
pub fn validate_sanitized(name: &str, message: &str) -> ValidationResult {
    if name.is_empty() || message.is_empty() {
        debug!("field empty after sanitization");
        return ValidationResult::Invalid(ValidationError::EmptyAfterSanitize);
    }
    ValidationResult::Valid
}

/// Pragmatic `localpart@domain.tld` shape check.
///
/// Not RFC 5322; the goal is to reject obviously malformed addresses and
/// anything that could smuggle CR/LF into mail headers. The address is used
/// verbatim as the Reply-To mailbox downstream.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(|c| c.is_whitespace() || c.is_ascii_control()) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain needs at least one dot with non-empty labels on either side
    domain.contains('.') && !domain.split('.').any(|label| label.is_empty())
}
