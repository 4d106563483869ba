// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! This crate provides the ingress pipeline for the website contact form,
//! relaying inquiries to the configured inbox over SMTP:
//!
//! - Per-IP sliding-window rate limiting (5 per 60 s default)
//! - Honeypot bot filtering (hidden `website` field)
//! - Required-field and email-shape validation
//! - Control-character and angle-bracket sanitization
//! - Deterministic HTML + plaintext message composition
//! - SMTP delivery with a single plaintext fallback attempt

pub mod client;
pub mod composer;
pub mod config;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod sanitize;
pub mod validator;

pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use mailer::{MailDispatcher, MailError, MailTransport};
pub use validator::{ValidationError, ValidationResult};
