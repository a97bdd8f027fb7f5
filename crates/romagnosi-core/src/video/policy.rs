use std::time::Duration;

use rand::Rng;

/// Attempt ceiling used when neither a timeout nor an attempt limit is set.
pub const HARD_ATTEMPT_CEILING: u32 = 720;

/// How often, and for how long, a job is polled.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// Fraction of the delay added or removed at random, in [0, 1)
    pub jitter: f64,
    pub timeout: Option<Duration>,
    pub max_attempts: Option<u32>,
    /// Consecutive transient status failures tolerated before giving up
    pub max_poll_retries: u32,
    pub max_download_retries: u32,
    pub download_retry_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.2,
            timeout: Some(Duration::from_secs(600)),
            max_attempts: None,
            max_poll_retries: 3,
            max_download_retries: 3,
            download_retry_delay: Duration::from_secs(2),
        }
    }
}

impl PollPolicy {
    /// Constant interval without jitter
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_interval: interval,
            max_interval: interval,
            multiplier: 1.0,
            jitter: 0.0,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Attempt limit that still applies when no timeout bounds the loop
    pub fn effective_max_attempts(&self) -> Option<u32> {
        match (self.max_attempts, self.timeout) {
            (Some(max), _) => Some(max.max(1)),
            (None, Some(_)) => None,
            (None, None) => Some(HARD_ATTEMPT_CEILING),
        }
    }

    /// Delay before poll number `attempt + 1`, jittered with `unit` in [0, 1].
    pub fn delay_with(&self, attempt: u32, unit: f64) -> Duration {
        let max = self.max_interval.max(self.initial_interval);
        let exp = self.multiplier.max(1.0).powi(attempt.min(32) as i32);
        let base = (self.initial_interval.as_secs_f64() * exp).min(max.as_secs_f64());

        let jitter = self.jitter.clamp(0.0, 0.99);
        let factor = 1.0 + jitter * (2.0 * unit.clamp(0.0, 1.0) - 1.0);

        Duration::from_secs_f64((base * factor).min(max.as_secs_f64()))
    }

    pub fn next_delay(&self, attempt: u32) -> Duration {
        let unit = if self.jitter > 0.0 {
            rand::rng().random_range(0.0..=1.0)
        } else {
            0.5
        };
        self.delay_with(attempt, unit)
    }
}
