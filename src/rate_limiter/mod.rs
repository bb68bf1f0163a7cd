use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Keeps consecutive requests at least `delay` apart.
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: None,
            request_count: 0,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            sleep_until(last + self.delay).await;
        }
        self.last_request = Some(Instant::now());
        self.request_count += 1;
    }

    pub fn request_count(&self) -> usize {
        self.request_count
    }

    /// Forget previous requests; the next `wait` returns immediately.
    pub fn reset(&mut self) {
        self.last_request = None;
        self.request_count = 0;
    }
}
