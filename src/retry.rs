//! Bounded retry policy for fallible operations.
//!
//! Replaces ad hoc retry loops with one explicit policy: a maximum
//! attempt count and a fixed delay, executed as scheduled sleeps on the
//! runtime rather than blocking waits.

use std::fmt::Display;
use std::time::Duration;

use tracing::warn;

/// A fixed-delay retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Policy for persistent-store writes: 3 attempts, 1 second apart.
    pub const fn storage() -> Self {
        Self::new(3, Duration::from_secs(1))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` up to `max_attempts` times, sleeping `delay` between
    /// attempts. Returns the first success or the last error.
    pub async fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    warn!(attempt, error = %err, "operation failed, retrying");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
