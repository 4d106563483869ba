// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Ingress endpoint for the website contact form. Submissions pass through
//! per-IP rate limiting, a honeypot bot filter, validation, and
//! sanitization before being composed into an inquiry email and relayed
//! over SMTP, with a plaintext fallback when the HTML send fails.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX`: Max submissions per IP per window (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Sliding window length (default: 60)
//! - `RATE_LIMIT_SWEEP_SECS`: Idle-client sweep interval (default: 60)
//! - `SMTP_URL`: Mail relay URL (default: smtp://localhost:25)
//! - `EMAIL_USER` / `EMAIL_PASS`: Relay credential pair
//! - `EMAIL_RECIPIENTS`: Comma-separated inquiry recipients
//!   (default: info@jaha.co)
//! - `MAIL_FROM`: Sender mailbox for outgoing inquiries
//! - `MAIL_SEND_TIMEOUT_SECS`: Bound on each SMTP attempt (default: 30)

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_relay::config::{Config, MailConfig, RateLimitConfig};
use contact_relay::handlers::{contact, health, metrics_text, AppState};
use contact_relay::limiter::RateLimiter;
use contact_relay::mailer::{MailDispatcher, SmtpMailTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        max_per_window = config.rate_limit.max_per_window,
        window_secs = config.rate_limit.window_secs,
        recipients = config.mail.recipients.len(),
        "Starting contact relay"
    );

    // Create application state
    let limiter = RateLimiter::new(config.rate_limit.clone());
    let transport = Arc::new(SmtpMailTransport::from_config(&config.mail)?);
    let dispatcher = MailDispatcher::new(transport, &config.mail)?;

    let state = Arc::new(AppState {
        limiter,
        dispatcher,
        config: config.clone(),
    });

    // Spawn the sweep task that keeps the rate-limit map bounded
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_state.config.rate_limit.sweep_interval());
        loop {
            interval.tick().await;
            sweep_state.limiter.cleanup().await;
        }
    });

    // Build router
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(contact));
    if config.metrics.enabled {
        app = app.route(&config.metrics.path, get(metrics_text));
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let mut mail = MailConfig {
        username: std::env::var("EMAIL_USER").ok(),
        password: std::env::var("EMAIL_PASS").ok(),
        send_timeout_secs: std::env::var("MAIL_SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
        ..Default::default()
    };
    if let Ok(url) = std::env::var("SMTP_URL") {
        mail.smtp_url = url;
    }
    if let Ok(from) = std::env::var("MAIL_FROM") {
        mail.from_address = from;
    }
    if let Ok(recipients) = std::env::var("EMAIL_RECIPIENTS") {
        let parsed: Vec<String> = recipients
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if !parsed.is_empty() {
            mail.recipients = parsed;
        }
    }

    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        rate_limit: RateLimitConfig {
            max_per_window: std::env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            sweep_interval_secs: std::env::var("RATE_LIMIT_SWEEP_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        },
        mail,
        ..Default::default()
    }
}
