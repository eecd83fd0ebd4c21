//! Request pacing for page fetches
//!
//! A token bucket (governor) shared by every clone of an [`HttpClient`], so
//! pagers built over the same client draw from one budget.
//!
//! [`HttpClient`]: super::HttpClient

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Request budget of a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained request rate
    pub requests_per_second: u32,
    /// Requests allowed back to back; defaults to one second's worth
    #[serde(default)]
    pub burst_size: Option<u32>,
}

impl RateLimiterConfig {
    /// Budget of `requests_per_second`, bursting up to the same amount
    pub fn per_second(requests_per_second: u32) -> Self {
        Self {
            requests_per_second,
            burst_size: None,
        }
    }

    /// Override the burst size
    #[must_use]
    pub fn with_burst(mut self, burst_size: u32) -> Self {
        self.burst_size = Some(burst_size);
        self
    }

    /// Governor quota; zero values are raised to one
    fn quota(&self) -> Quota {
        let rate = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = self
            .burst_size
            .and_then(NonZeroU32::new)
            .unwrap_or(rate);
        Quota::per_second(rate).allow_burst(burst)
    }
}

/// Shared token bucket
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create a limiter for the given budget
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            bucket: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Take a permit, waiting for the bucket to refill if it is empty
    pub async fn acquire(&self) {
        if self.bucket.check().is_err() {
            debug!("Request budget exhausted, waiting for a permit");
            self.bucket.until_ready().await;
        }
    }

    /// Take a permit only if one is available now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
