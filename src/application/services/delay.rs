use crate::config::PacingConfig;
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Pause between two consecutive comments, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPolicy {
    Fixed { ms: u64 },
    Random { min_ms: u64, max_ms: u64 },
}

impl DelayPolicy {
    pub fn fixed(ms: u64) -> Self {
        DelayPolicy::Fixed { ms }
    }

    /// `max_ms` below `min_ms` is raised to `min_ms`.
    pub fn random(min_ms: u64, max_ms: u64) -> Self {
        DelayPolicy::Random {
            min_ms,
            max_ms: max_ms.max(min_ms),
        }
    }

    /// A fixed `interval_sec` wins over the min/max range; negative or NaN intervals become 0.
    pub fn from_config(pacing: &PacingConfig) -> Self {
        match pacing.interval_sec {
            Some(sec) => {
                let ms = if sec.is_finite() && sec > 0.0 {
                    (sec * 1000.0).floor() as u64
                } else {
                    0
                };
                Self::fixed(ms)
            }
            None => Self::random(pacing.min_delay_ms, pacing.max_delay_ms),
        }
    }

    /// Draws the next delay without waiting.
    pub fn sample(&self) -> u64 {
        match *self {
            DelayPolicy::Fixed { ms } => ms,
            DelayPolicy::Random { min_ms, max_ms } => {
                let max_ms = max_ms.max(min_ms);
                rand::thread_rng().gen_range(min_ms..=max_ms)
            }
        }
    }

    /// Sleeps for the next delay and returns how many milliseconds were waited.
    pub async fn next_delay(&self) -> u64 {
        let ms = self.sample();
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        ms
    }
}

impl fmt::Display for DelayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayPolicy::Fixed { ms } => write!(f, "fixed interval {} ms", ms),
            DelayPolicy::Random { min_ms, max_ms } => {
                write!(f, "random delay {}-{} ms", min_ms, max_ms)
            }
        }
    }
}
