//! Reconnect backoff policy

use serde::{Deserialize, Serialize};

/// Exponential backoff between reconnect attempts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconnectPolicy {
    /// Delay before the first retry
    pub base_delay_ms: u32,
    /// Factor applied per consecutive failure
    pub multiplier: f64,
    /// Upper bound for any single delay
    pub max_delay_ms: u32,
    /// Consecutive failed attempts before giving up (None = never)
    pub max_attempts: Option<u32>,
    /// How long an open socket may wait for `connection_ack`
    pub ack_timeout_ms: u32,
    /// Time connected after which a drop no longer counts as a failure
    pub stable_after_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 500,
            multiplier: 2.0,
            max_delay_ms: 30_000,
            max_attempts: Some(10),
            ack_timeout_ms: 10_000,
            stable_after_ms: 30_000,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (1-based), or None once exhausted
    pub fn delay_for(&self, attempt: u32) -> Option<u32> {
        if attempt == 0 {
            return Some(0);
        }
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }
        let exponent = (attempt - 1).min(32) as i32;
        let delay = f64::from(self.base_delay_ms) * self.multiplier.max(1.0).powi(exponent);
        Some(delay.min(f64::from(self.max_delay_ms)) as u32)
    }

    /// Whether a connection proved healthy enough to reset the failure count.
    /// Delivered data counts; so does staying up for `stable_after_ms`.
    pub fn resets_failures(&self, saw_data: bool, connected_for_ms: Option<f64>) -> bool {
        saw_data || connected_for_ms.is_some_and(|ms| ms >= f64::from(self.stable_after_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_grow_and_cap() {
        let policy = ReconnectPolicy {
            base_delay_ms: 500,
            multiplier: 2.0,
            max_delay_ms: 3_000,
            max_attempts: None,
            ..Default::default()
        };
        assert_eq!(policy.delay_for(1), Some(500));
        assert_eq!(policy.delay_for(2), Some(1_000));
        assert_eq!(policy.delay_for(3), Some(2_000));
        assert_eq!(policy.delay_for(4), Some(3_000));
        assert_eq!(policy.delay_for(500), Some(3_000));
    }

    #[test]
    fn test_exhausted_after_max_attempts() {
        let policy = ReconnectPolicy {
            max_attempts: Some(2),
            ..Default::default()
        };
        assert!(policy.delay_for(2).is_some());
        assert_eq!(policy.delay_for(3), None);
    }

    #[test]
    fn test_multiplier_below_one_does_not_shrink() {
        let policy = ReconnectPolicy {
            multiplier: 0.5,
            ..Default::default()
        };
        assert_eq!(policy.delay_for(4), Some(500));
    }

    #[test]
    fn test_ack_then_quick_drop_keeps_counting() {
        let policy = ReconnectPolicy::default();
        // never acked
        assert!(!policy.resets_failures(false, None));
        // acked, closed right away, no data
        assert!(!policy.resets_failures(false, Some(50.0)));
        assert!(policy.resets_failures(false, Some(30_000.0)));
        assert!(policy.resets_failures(true, Some(50.0)));
    }

    #[test]
    fn test_flapping_server_exhausts() {
        let policy = ReconnectPolicy {
            max_attempts: Some(3),
            ..Default::default()
        };
        let mut failures = 0u32;
        let mut delays = Vec::new();
        loop {
            if policy.resets_failures(false, Some(20.0)) {
                failures = 0;
            }
            failures += 1;
            match policy.delay_for(failures) {
                Some(delay) => delays.push(delay),
                None => break,
            }
        }
        assert_eq!(delays, vec![500, 1_000, 2_000]);
        assert_eq!(failures, 4);
    }
}
