// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay service.
//!
//! Defaults match the submission policy observed on the production form:
//! at most 5 submissions per IP per rolling 60 seconds, one fixed fallback
//! recipient when no recipient list is configured.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback recipient used when no recipient list is configured.
pub const DEFAULT_RECIPIENT: &str = "info@jaha.co";

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Mail delivery configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per client inside the window (default: 5)
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,

    /// Sliding window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of idle client entries in seconds
    /// (default: 60)
    #[serde(default = "default_sweep_secs")]
    pub sweep_interval_secs: u64,
}

/// Mail delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay URL (default: smtp://localhost:25)
    #[serde(default = "default_smtp_url")]
    pub smtp_url: String,

    /// SMTP username; credentials are only applied when both halves of the
    /// pair are present
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<String>,

    /// Sender mailbox for outgoing inquiries
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Inquiry recipients; the fixed default applies when empty
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Bound on each SMTP send attempt in seconds (default: 30)
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_per_window() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_secs() -> u64 {
    60
}

fn default_smtp_url() -> String {
    "smtp://localhost:25".to_string()
}

fn default_from_address() -> String {
    "Jahangir Website <noreply@jaha.co>".to_string()
}

fn default_send_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            mail: MailConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_max_per_window(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_secs(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_url: default_smtp_url(),
            username: None,
            password: None,
            from_address: default_from_address(),
            recipients: vec![DEFAULT_RECIPIENT.to_string()],
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the sliding window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl MailConfig {
    /// Get the per-attempt send timeout
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Configured recipients, never empty: the fixed default applies when
    /// the configured list is absent.
    pub fn recipient_list(&self) -> Vec<String> {
        if self.recipients.is_empty() {
            vec![DEFAULT_RECIPIENT.to_string()]
        } else {
            self.recipients.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_list_never_empty() {
        let mail = MailConfig {
            recipients: Vec::new(),
            ..Default::default()
        };
        assert_eq!(mail.recipient_list(), vec![DEFAULT_RECIPIENT.to_string()]);

        let mail = MailConfig {
            recipients: vec!["sales@jaha.co".to_string(), "info@jaha.co".to_string()],
            ..Default::default()
        };
        assert_eq!(mail.recipient_list().len(), 2);
    }
}
