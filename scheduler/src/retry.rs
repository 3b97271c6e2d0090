//! Bounded retries around a [`ContentSupplier`].
//!
//! A session must outlive a flaky upstream: once every attempt has failed
//! the fetcher hands back [`ContentUnit::placeholder`] instead of an error.

use std::sync::Arc;
use std::time::Duration;

use content::{ContentKind, ContentSupplier, ContentUnit};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls per fetch, including the first one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

pub struct RetryFetcher {
    supplier: Arc<dyn ContentSupplier>,
    policy: RetryPolicy,
}

impl RetryFetcher {
    pub fn new(supplier: Arc<dyn ContentSupplier>, policy: RetryPolicy) -> Self {
        Self { supplier, policy }
    }

    /// Generate one unit for `topic`, retrying failures per the policy.
    ///
    /// Never fails. The backoff only suspends the calling task.
    pub async fn fetch(&self, kind: ContentKind, topic: &str) -> ContentUnit {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            match self.supplier.generate(kind, topic).await {
                Ok(unit) => {
                    if attempt > 1 {
                        info!(attempt, topic, "content generation recovered");
                    } else {
                        debug!(topic, "content generated");
                    }
                    return unit;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts,
                        topic,
                        error = %e,
                        "content generation failed"
                    );

                    if attempt < max_attempts && !self.policy.retry_delay.is_zero() {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        warn!(
            max_attempts,
            topic, "content generation exhausted retries; using placeholder"
        );
        ContentUnit::placeholder()
    }
}
