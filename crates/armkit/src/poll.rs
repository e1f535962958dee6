//! Settle polling with exponential backoff.
//!
//! Purge and delete requests are accepted by the provider long before the
//! backing state converges. Instead of sleeping a fixed interval and hoping,
//! callers poll a cheap probe with growing delays until it reports settled
//! or a wall-clock budget runs out.

use crate::error::Result;
use std::time::{Duration, Instant};

/// Configuration for settle polling.
#[derive(Debug, Clone)]
pub struct SettleConfig {
    /// Delay before the first probe
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each probe
    pub backoff_factor: f64,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Total wall-clock budget; polling stops once exceeded
    pub max_wait: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(15),
            max_wait: Duration::from_secs(120),
        }
    }
}

impl SettleConfig {
    /// Create a config with the default cadence but a custom budget.
    pub fn with_max_wait(max_wait: Duration) -> Self {
        Self {
            max_wait,
            ..Self::default()
        }
    }

    /// Calculate delay before probe number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay =
            self.initial_delay.as_secs_f64() * self.backoff_factor.powi(attempt.min(16) as i32);
        let delay = delay.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(delay)
    }
}

/// Outcome of a settle poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// The probe reported settled within the budget
    Settled {
        /// Number of probes issued
        checks: u32,
    },
    /// The budget ran out before the probe reported settled
    TimedOut {
        /// Number of probes issued
        checks: u32,
    },
}

impl Settle {
    /// Whether the condition settled within the budget.
    pub fn is_settled(&self) -> bool {
        matches!(self, Settle::Settled { .. })
    }

    /// Number of probes issued before the poll ended.
    pub fn checks(&self) -> u32 {
        match self {
            Settle::Settled { checks } | Settle::TimedOut { checks } => *checks,
        }
    }
}

/// Poll `probe` until it returns `Ok(true)` or the budget in `config` runs
/// out. Delays come first: the operations being watched never complete
/// instantly, so probing at time zero is wasted work.
///
/// Probe errors propagate immediately and end the poll.
pub fn wait_until<F>(config: &SettleConfig, mut probe: F) -> Result<Settle>
where
    F: FnMut() -> Result<bool>,
{
    let start = Instant::now();
    let mut checks = 0u32;

    loop {
        let delay = config.delay_for_attempt(checks);
        if start.elapsed() + delay > config.max_wait {
            return Ok(Settle::TimedOut { checks });
        }
        std::thread::sleep(delay);
        checks += 1;
        if probe()? {
            return Ok(Settle::Settled { checks });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn fast_config() -> SettleConfig {
        SettleConfig {
            initial_delay: Duration::from_millis(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_millis(4),
            max_wait: Duration::from_millis(200),
        }
    }

    #[test]
    fn test_delay_backoff() {
        let config = SettleConfig {
            initial_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(15),
            max_wait: Duration::from_secs(120),
        };
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(8));
        // Capped at max_delay from here on
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(15));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(15));
    }

    #[test]
    fn test_settles_after_some_probes() {
        let mut remaining = 3;
        let result = wait_until(&fast_config(), || {
            remaining -= 1;
            Ok(remaining == 0)
        })
        .unwrap();
        assert!(result.is_settled());
        assert_eq!(result.checks(), 3);
    }

    #[test]
    fn test_settles_on_first_probe() {
        let result = wait_until(&fast_config(), || Ok(true)).unwrap();
        assert_eq!(result, Settle::Settled { checks: 1 });
    }

    #[test]
    fn test_times_out() {
        let config = SettleConfig {
            initial_delay: Duration::from_millis(1),
            backoff_factor: 1.0,
            max_delay: Duration::from_millis(1),
            max_wait: Duration::from_millis(10),
        };
        let result = wait_until(&config, || Ok(false)).unwrap();
        assert!(!result.is_settled());
        assert!(result.checks() > 0);
    }

    #[test]
    fn test_zero_budget_never_probes() {
        let config = SettleConfig {
            max_wait: Duration::ZERO,
            ..fast_config()
        };
        let mut probed = false;
        let result = wait_until(&config, || {
            probed = true;
            Ok(true)
        })
        .unwrap();
        assert_eq!(result, Settle::TimedOut { checks: 0 });
        assert!(!probed);
    }

    #[test]
    fn test_probe_error_propagates() {
        let result = wait_until(&fast_config(), || {
            Err(Error::Network {
                message: "connection refused".to_string(),
            })
        });
        assert!(result.is_err());
        assert!(result.unwrap_err().is_fatal());
    }
}
