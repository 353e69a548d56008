use rand::Rng;
use solar_config::RetryConfig;
use std::time::Duration;

/// How a pending record is polled.
///
/// Each wait lasts `base_delay` plus a uniform random share of `jitter`.
/// Without `max_attempts` and `timeout` a record is polled until it is
/// confirmed or fails fatally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub jitter: Duration,
    pub max_attempts: Option<u32>,
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Polls until confirmed, with the default delays.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_delays(mut self, base_delay: Duration, jitter: Duration) -> Self {
        self.base_delay = base_delay;
        self.jitter = jitter;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Delay before the next attempt, in `[base_delay, base_delay + jitter)`.
    pub fn backoff<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter.is_zero() {
            return self.base_delay;
        }
        self.base_delay + rng.gen_range(Duration::ZERO..self.jitter)
    }

    /// Whether another attempt may follow `attempts_made` failed ones.
    pub fn allows_retry(&self, attempts_made: u32) -> bool {
        self.max_attempts
            .map_or(true, |max_attempts| attempts_made < max_attempts)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
            max_attempts: config.max_attempts,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}
