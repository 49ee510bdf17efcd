use crate::constants::{DEFAULT_LOGIN_BASE_WAIT_SEC, DEFAULT_LOGIN_MAX_RETRIES, LOGIN_JITTER_SEC};
use crate::error::AuthError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff applied to log-on attempts that Steam rate-limits.
/// Any other failure is returned straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_wait: Duration,
    /// Jitter is drawn from `[0, jitter_secs)` whole seconds.
    pub jitter_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_LOGIN_MAX_RETRIES,
            base_wait: Duration::from_secs(DEFAULT_LOGIN_BASE_WAIT_SEC),
            jitter_secs: LOGIN_JITTER_SEC,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_wait: Duration) -> Self {
        Self {
            max_retries,
            base_wait,
            ..Self::default()
        }
    }

    /// `base_wait * 2^retry`, without jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_wait.saturating_mul(2u32.saturating_pow(retry))
    }

    fn jitter(&self) -> Duration {
        if self.jitter_secs == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(rand::thread_rng().gen_range(0..self.jitter_secs))
    }

    /// Runs `op` until it succeeds, fails with something other than a rate
    /// limit, or the retries are used up (the last error is returned).
    pub async fn run<T, F, Fut>(&self, flow: &str, mut op: F) -> Result<T, AuthError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AuthError>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_rate_limited() || retry >= self.max_retries => return Err(e),
                Err(_) => {
                    let wait = self.backoff(retry) + self.jitter();
                    warn!(
                        "[{}] Rate limited. Waiting {}s before retry {}/{}...",
                        flow,
                        wait.as_secs(),
                        retry + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(wait).await;
                    retry += 1;
                }
            }
        }
    }
}
