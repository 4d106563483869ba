// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact pipeline.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

lazy_static! {
    pub static ref SUBMISSIONS_TOTAL: IntCounter = register_int_counter!(
        "contact_submissions_total",
        "Total contact form submissions received"
    )
    .unwrap();
    pub static ref RATE_LIMITED_TOTAL: IntCounter = register_int_counter!(
        "contact_rate_limited_total",
        "Submissions rejected by the rate limiter"
    )
    .unwrap();
    pub static ref HONEYPOT_TOTAL: IntCounter = register_int_counter!(
        "contact_honeypot_total",
        "Submissions dropped by the honeypot filter"
    )
    .unwrap();
    pub static ref VALIDATION_FAILED_TOTAL: IntCounter = register_int_counter!(
        "contact_validation_failed_total",
        "Submissions rejected by validation"
    )
    .unwrap();
    pub static ref MAIL_SENT_TOTAL: IntCounter = register_int_counter!(
        "contact_mail_sent_total",
        "Inquiry emails delivered"
    )
    .unwrap();
    pub static ref MAIL_FALLBACK_TOTAL: IntCounter = register_int_counter!(
        "contact_mail_plaintext_fallback_total",
        "Deliveries that used the plaintext fallback"
    )
    .unwrap();
    pub static ref MAIL_FAILED_TOTAL: IntCounter = register_int_counter!(
        "contact_mail_failed_total",
        "Deliveries that failed after the fallback attempt"
    )
    .unwrap();
}

/// Render the default registry in Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(%error, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
