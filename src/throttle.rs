use std::time::Duration;

/// Fixed politeness delay between successive requests to the API.
///
/// Fetching stays sequential on purpose (it keeps output ordering
/// deterministic); this only bounds the request rate. A zero-duration
/// throttle pauses nothing, which is what the tests use.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Suspend until the configured delay has elapsed.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_zero_delay_does_not_sleep() {
        let throttle = Throttle::new(Duration::ZERO);
        let start = Instant::now();
        throttle.pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_waits_at_least_the_delay() {
        let throttle = Throttle::new(Duration::from_millis(20));
        let start = Instant::now();
        throttle.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
