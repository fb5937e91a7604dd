//! Bounded retry with linear backoff.
//!
//! One primitive shared by every compensating deletion. Forward
//! provisioning never retries: a package-manager invocation is not assumed
//! to be safe to repeat.

use std::thread;
use std::time::Duration;

/// How many times to try, and how long to wait between tries.
///
/// The wait before attempt `n + 1` is `backoff_base * n` (linear).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

/// Every attempt failed; carries the last error.
#[derive(Debug, Clone, PartialEq)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

    /// A `max_attempts` of zero is treated as one.
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Wait applied after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, `satisfied` reports there is nothing
    /// left to do, or the attempts run out.
    ///
    /// `satisfied` is checked before every attempt. Returns the number of
    /// attempts actually made (`0` if the goal already held).
    pub fn run<E>(
        &self,
        mut satisfied: impl FnMut() -> bool,
        mut op: impl FnMut(u32) -> Result<(), E>,
    ) -> Result<u32, Exhausted<E>> {
        let mut attempt = 1;
        loop {
            if satisfied() {
                return Ok(attempt - 1);
            }
            match op(attempt) {
                Ok(()) => return Ok(attempt),
                Err(last_error) if attempt >= self.max_attempts => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error,
                    });
                }
                Err(_) => {
                    let delay = self.delay_for(attempt);
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BACKOFF)
    }
}
