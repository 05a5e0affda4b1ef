//! Randomised spacing between cities to stay under upstream rate limits.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::config::PacingConfig;

pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    pub fn new(config: &PacingConfig) -> Self {
        let min = Duration::from_millis(config.min_delay_ms);
        let max = Duration::from_millis(config.max_delay_ms).max(min);
        Self { min, max }
    }

    /// Pick a delay in `[min, max)`, or exactly `min` when the range is empty.
    pub fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        debug!("Sleeping {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_in_range() {
        let pacer = Pacer::new(&PacingConfig::default());
        for _ in 0..200 {
            let d = pacer.next_delay();
            assert!(d >= Duration::from_millis(500));
            assert!(d < Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_fixed_delay() {
        let pacer = Pacer::new(&PacingConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
        });
        assert_eq!(pacer.next_delay(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_pause_zero() {
        let pacer = Pacer::new(&PacingConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
        });
        pacer.pause().await;
    }
}
