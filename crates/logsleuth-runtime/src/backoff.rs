//! Retry-delay policy for the polling loop.

use std::time::Duration;

/// Exponential backoff with a capped interval and optional attempt bound.
///
/// `max_attempts: None` means the policy never gives up on its own; the
/// polling loop relies on external cancellation for any overall deadline.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Delay handed out on the first attempt.
    pub initial: Duration,
    /// Ceiling the growing delay is clamped to.
    pub max_interval: Duration,
    /// Growth factor applied per attempt.
    pub multiplier: f64,
    /// Attempts before `next_delay` starts returning `None`; `None` = unbounded.
    pub max_attempts: Option<u32>,
    /// Random spread applied to each delay, as a fraction of the base value
    /// (0.5 means +/-50%). Zero disables jitter.
    pub jitter: f64,

    attempt: u32,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            max_interval: Duration::from_secs(1),
            multiplier: 1.5,
            max_attempts: None,
            jitter: 0.5,
            attempt: 0,
        }
    }
}

impl ExponentialBackoff {
    /// Delay to wait before the next attempt, or `None` when a bounded
    /// policy has run out of attempts.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if self.attempt >= max {
                return None;
            }
        }
        self.attempt += 1;

        let factor = self.multiplier.powi(self.attempt.saturating_sub(1) as i32);
        let base = (self.initial.as_millis() as f64 * factor)
            .min(self.max_interval.as_millis() as f64);

        let millis = if self.jitter > 0.0 {
            use rand::Rng;
            let spread = rand::rng().random_range(-self.jitter..=self.jitter);
            base * (1.0 + spread)
        } else {
            base
        };

        Some(Duration::from_millis(millis.max(0.0) as u64))
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
