use std::time::Duration;
use crate::services::{CompletionError, CompletionProvider};

/// How many times to try a completion and how long to wait between tries
pub trait RetryPolicy: Send + Sync {
    /// Total attempts including the first
    fn max_attempts(&self) -> u32;

    /// Wait after the given failed attempt (1-based) before the next one
    fn delay(&self, attempt: u32) -> Duration;
}

/// Constant delay between a fixed number of attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDelay {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl FixedDelay {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Retry without waiting
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

impl RetryPolicy for FixedDelay {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Call the provider until it succeeds, a non-retryable error occurs, or the policy runs out
///
/// The last error is returned once every attempt has failed.
pub async fn generate_with_retry(
    provider: &dyn CompletionProvider,
    policy: &dyn RetryPolicy,
    prompt: &str,
) -> Result<String, CompletionError> {
    let max_attempts = policy.max_attempts().max(1);
    let mut attempt = 1;

    loop {
        match provider.generate(prompt).await {
            Ok(text) => return Ok(text),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                tracing::warn!("Completion attempt {}/{} failed: {}", attempt, max_attempts, e);
                if attempt >= max_attempts {
                    return Err(e);
                }

                let delay = policy.delay(attempt);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
