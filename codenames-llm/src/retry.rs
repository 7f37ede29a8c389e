//! Exponential backoff around a provider
//!
//! Only rate limits and transient failures are retried. The backoff schedule
//! is a pure function of the attempt number so it can be checked without
//! sleeping; jitter is applied on top with an explicit RNG.

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::provider::{Message, Provider, ProviderError};

#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Fraction of the delay added or removed at random (0.0 disables)
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// A policy that never waits, for tests and dry runs
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: 0.0,
        }
    }

    /// Delay after the failed attempt `attempt` (0-based): `base * 2^attempt`, capped
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Spread `delay` uniformly by +/- `jitter`
    pub fn jittered<R: Rng>(&self, delay: Duration, rng: &mut R) -> Duration {
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let spread = rng.gen_range(-self.jitter..=self.jitter);
        delay.mul_f64((1.0 + spread).max(0.0))
    }

    /// Un-jittered waits between attempts
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1)).map(|a| self.delay_for_attempt(a)).collect()
    }
}

/// Provider wrapper applying a [`RetryPolicy`]
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
    rng: StdRng,
    sleep: fn(Duration),
}

impl<P: Provider> RetryingProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            rng: StdRng::from_entropy(),
            sleep: thread::sleep,
        }
    }

    /// Replace the sleep function (tests record waits instead of blocking)
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<P: Provider> Provider for RetryingProvider<P> {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn generate(&mut self, conversation: &[Message], max_output_tokens: u32) -> Result<String, ProviderError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.inner.generate(conversation, max_output_tokens) {
                Ok(text) => return Ok(text),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt + 1 >= attempts => {
                    tracing::warn!("{}: giving up after {} attempts: {}", self.inner.name(), attempts, err);
                    return Err(ProviderError::RetriesExhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    let wait = self.policy.jittered(self.policy.delay_for_attempt(attempt), &mut self.rng);
                    tracing::warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:.1}s",
                        self.inner.name(),
                        attempt + 1,
                        attempts,
                        err,
                        wait.as_secs_f64()
                    );
                    (self.sleep)(wait);
                    attempt += 1;
                }
            }
        }
    }
}
