use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Decides whether a failed attempt may be repeated
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Waits between attempts
///
/// Injected so tests can observe waits without real time passing.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of a retried operation along with how many attempts it took
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Fixed-wait retry policy shared by every upstream call
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("wait", &self.wait)
            .finish()
    }
}

impl RetryPolicy {
    /// A `max_attempts` of zero is treated as one attempt.
    pub fn new(max_attempts: u32, wait: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            wait,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry_max_attempts, config.retry_wait())
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        E: Retryable + Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation(attempt).await {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                    }
                }
                Err(err) => {
                    if attempt >= self.max_attempts || !err.is_retryable() {
                        return RetryOutcome {
                            result: Err(err),
                            attempts: attempt,
                        };
                    }

                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Upstream call failed, retrying"
                    );

                    if !self.wait.is_zero() {
                        self.sleeper.sleep(self.wait).await;
                    }
                }
            }
        }
    }
}
