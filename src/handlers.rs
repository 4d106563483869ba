// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay service.
//!
//! The submission pipeline runs in order: rate limiter, honeypot filter,
//! validation, sanitization, composition, dispatch. Validation and
//! rate-limit rejections carry specific messages; delivery failures are
//! reported with a generic body so no relay detail leaks to the client.

use crate::composer::{self, SanitizedSubmission};
use crate::config::Config;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::{Delivery, MailDispatcher};
use crate::metrics;
use crate::sanitize::{sanitize, sanitize_opt};
use crate::validator::{self, ValidationResult};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub dispatcher: MailDispatcher,
    pub config: Config,
}

/// Incoming contact form submission. `website` is the honeypot field: it is
/// invisible on the rendered form and must arrive empty.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus text exposition endpoint.
pub async fn metrics_text() -> String {
    metrics::render()
}

/// Derive the rate-limit client key from forwarding headers.
///
/// First `X-Forwarded-For` entry wins, then `X-Real-IP`. `None` means the
/// client cannot be identified and rate limiting is skipped (fail-open).
pub fn client_key(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Handle a contact form submission.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SubmissionRequest>,
) -> Response {
    metrics::SUBMISSIONS_TOTAL.inc();

    // Rate limit per client IP; fail open when no forwarding header exists
    match client_key(&headers) {
        Some(key) => {
            if let RateLimitResult::Limited { retry_after } = state.limiter.check(&key).await {
                info!(
                    client = %key,
                    retry_after_secs = retry_after.as_secs(),
                    "submission rate limited"
                );
                metrics::RATE_LIMITED_TOTAL.inc();
                return error_response(
                    StatusCode::TOO_MANY_REQUESTS,
                    "Too many requests, please try again later.",
                );
            }
        }
        None => debug!("no forwarding header, skipping rate limit"),
    }

    // Honeypot: answer success-shaped so automated senders learn nothing
    if request.website.as_deref().is_some_and(|v| !v.is_empty()) {
        info!("honeypot field populated, dropping submission");
        metrics::HONEYPOT_TOTAL.inc();
        return success_response("Message received");
    }

    if let ValidationResult::Invalid(err) = validator::validate_required(
        request.name.as_deref(),
        request.email.as_deref(),
        request.message.as_deref(),
    ) {
        debug!(error = %err, "validation failed");
        metrics::VALIDATION_FAILED_TOTAL.inc();
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }

    // Required fields are present past this point. The email address is
    // carried verbatim; the shape check above already rejected anything
    // that could smuggle CR/LF into the mail headers.
    let name = sanitize(request.name.as_deref().unwrap_or_default());
    let message = sanitize(request.message.as_deref().unwrap_or_default());
    let email = request.email.clone().unwrap_or_default();

    if let ValidationResult::Invalid(err) = validator::validate_sanitized(&name, &message) {
        debug!(error = %err, "input empty after sanitization");
        metrics::VALIDATION_FAILED_TOTAL.inc();
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }

    let submission = SanitizedSubmission {
        name,
        email,
        company: sanitize_opt(request.company.as_deref()),
        phone: sanitize_opt(request.phone.as_deref()),
        message,
    };

    let composed = composer::compose(&submission, &state.config.mail, Utc::now());

    match state.dispatcher.send(&composed).await {
        Ok(delivery) => {
            if delivery == Delivery::PlaintextFallback {
                metrics::MAIL_FALLBACK_TOTAL.inc();
            }
            metrics::MAIL_SENT_TOTAL.inc();
            info!(reply_to = %composed.reply_to, ?delivery, "inquiry delivered");
            success_response("Email sent successfully")
        }
        Err(error) => {
            error!(%error, "mail delivery failed");
            metrics::MAIL_FAILED_TOTAL.inc();
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email")
        }
    }
}

fn success_response(message: &'static str) -> Response {
    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message,
        }),
    )
        .into_response()
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}
