//! Outbound call pacing for cover sources.

use tokio::time::{sleep, Duration};

/// Fixed pause applied after each completed provider attempt.
///
/// Unlike a shared rate limiter this holds no lock, so concurrent
/// resolutions pace themselves independently.
#[derive(Debug, Clone, Copy)]
pub struct AttemptThrottle {
    delay: Duration,
}

impl AttemptThrottle {
    /// Creates a throttle that waits `delay` per attempt. A zero delay
    /// disables pacing.
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the configured delay.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}
