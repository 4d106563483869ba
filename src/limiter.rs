// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter for contact form submissions.
//!
//! Tracks the request instants of each client key (forwarded IP) and admits
//! at most `max_per_window` submissions inside the trailing window. Instants
//! that have aged out are pruned lazily on every check; a rejected request
//! is not recorded. A periodic [`RateLimiter::cleanup`] sweep drops idle
//! keys so the map stays bounded under many distinct clients.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining submissions in the current window
        remaining: u32,
    },
    /// Request is rate limited
    Limited {
        /// Time until the oldest recorded instant leaves the window
        retry_after: Duration,
    },
}

/// Thread-safe sliding-window rate limiter.
///
/// The prune-count-append sequence for a key runs under a single write-lock
/// acquisition, so two concurrent submissions from one client cannot both
/// observe a count below the threshold.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check and record a submission for a client key.
    pub async fn check(&self, client_key: &str) -> RateLimitResult {
        self.check_at(client_key, Instant::now()).await
    }

    async fn check_at(&self, client_key: &str, now: Instant) -> RateLimitResult {
        let window = self.config.window_duration();
        let max = self.config.max_per_window as usize;

        let mut windows = self.windows.write().await;
        let instants = windows.entry(client_key.to_string()).or_default();

        // Drop instants that have aged out of the trailing window
        instants.retain(|t| now.duration_since(*t) < window);

        if instants.len() >= max {
            // Oldest surviving instant decides when a slot frees up
            let retry_after = instants
                .first()
                .map(|t| window.saturating_sub(now.duration_since(*t)))
                .unwrap_or(window);
            debug!(client = %client_key, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
            RateLimitResult::Limited { retry_after }
        } else {
            instants.push(now);
            RateLimitResult::Allowed {
                remaining: (max - instants.len()) as u32,
            }
        }
    }

    /// Drop keys with no instant left inside the window (should be called
    /// periodically).
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let window = self.config.window_duration();

        let mut windows = self.windows.write().await;
        windows.retain(|_, instants| {
            instants.retain(|t| now.duration_since(*t) < window);
            !instants.is_empty()
        });
    }

    /// Number of client keys currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_per_window: max,
            window_secs,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn boundary_at_max() {
        let limiter = limiter(5, 60);

        // First 5 submissions are admitted
        for i in 0..5 {
            let result = limiter.check("203.0.113.9").await;
            assert!(
                matches!(result, RateLimitResult::Allowed { .. }),
                "submission {} should be allowed",
                i + 1
            );
        }

        // The 6th inside the same window is not
        let result = limiter.check("203.0.113.9").await;
        assert!(matches!(result, RateLimitResult::Limited { .. }));
    }

    #[tokio::test]
    async fn rejected_requests_are_not_recorded() {
        let limiter = limiter(1, 60);
        let base = Instant::now();

        assert!(matches!(
            limiter.check_at("10.0.0.1", base).await,
            RateLimitResult::Allowed { .. }
        ));
        // Hammering while limited must not extend the window
        for i in 1..10 {
            let at = base + Duration::from_secs(i);
            assert!(matches!(
                limiter.check_at("10.0.0.1", at).await,
                RateLimitResult::Limited { .. }
            ));
        }
        // The original slot frees up exactly one window after the first hit
        let result = limiter.check_at("10.0.0.1", base + Duration::from_secs(61)).await;
        assert!(matches!(result, RateLimitResult::Allowed { .. }));
    }

    #[tokio::test]
    async fn window_slides() {
        let limiter = limiter(5, 60);
        let base = Instant::now();

        for _ in 0..5 {
            assert!(matches!(
                limiter.check_at("10.0.0.2", base).await,
                RateLimitResult::Allowed { .. }
            ));
        }
        assert!(matches!(
            limiter.check_at("10.0.0.2", base).await,
            RateLimitResult::Limited { .. }
        ));

        // 61 s later the burst has aged out
        let later = base + Duration::from_secs(61);
        assert!(matches!(
            limiter.check_at("10.0.0.2", later).await,
            RateLimitResult::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn clients_are_independent() {
        let limiter = limiter(1, 60);

        assert!(matches!(
            limiter.check("198.51.100.1").await,
            RateLimitResult::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("198.51.100.1").await,
            RateLimitResult::Limited { .. }
        ));
        assert!(matches!(
            limiter.check("198.51.100.2").await,
            RateLimitResult::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn cleanup_drops_idle_clients() {
        let limiter = limiter(5, 0);

        limiter.check("10.1.0.1").await;
        limiter.check("10.1.0.2").await;
        assert_eq!(limiter.tracked_clients().await, 2);

        // window_secs = 0 means every instant is already stale
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_clients().await, 0);
    }
}
