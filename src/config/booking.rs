//! Live-group and short-stay timing configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::live_group::LockPolicy;

use super::error::ValidationError;

/// Unit hold settings
#[derive(Debug, Clone, Deserialize)]
pub struct LiveGroupConfig {
    #[serde(default = "default_lock_ttl_minutes")]
    pub lock_ttl_minutes: i64,

    /// Live holds one user may have in a single project
    #[serde(default = "default_max_locks_per_user")]
    pub max_locks_per_user: u32,

    /// How often expired holds and stale reservations are swept
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl LiveGroupConfig {
    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy {
            ttl_minutes: self.lock_ttl_minutes,
            max_locks_per_user: self.max_locks_per_user,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=24 * 60).contains(&self.lock_ttl_minutes)
            || self.max_locks_per_user == 0
            || self.sweep_interval_secs == 0
        {
            return Err(ValidationError::InvalidLockSettings);
        }
        Ok(())
    }
}

impl Default for LiveGroupConfig {
    fn default() -> Self {
        Self {
            lock_ttl_minutes: default_lock_ttl_minutes(),
            max_locks_per_user: default_max_locks_per_user(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Reservation hold settings
#[derive(Debug, Clone, Deserialize)]
pub struct ShortStayConfig {
    /// How long a pending reservation blocks its dates
    #[serde(default = "default_hold_minutes")]
    pub hold_minutes: i64,

    #[serde(default = "default_max_advance_days")]
    pub max_advance_days: i64,
}

impl ShortStayConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=24 * 60).contains(&self.hold_minutes) || !(1..=730).contains(&self.max_advance_days) {
            return Err(ValidationError::InvalidShortStaySettings);
        }
        Ok(())
    }
}

impl Default for ShortStayConfig {
    fn default() -> Self {
        Self {
            hold_minutes: default_hold_minutes(),
            max_advance_days: default_max_advance_days(),
        }
    }
}

fn default_lock_ttl_minutes() -> i64 {
    15
}

fn default_max_locks_per_user() -> u32 {
    1
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_hold_minutes() -> i64 {
    30
}

fn default_max_advance_days() -> i64 {
    365
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_policy_from_defaults() {
        let config = LiveGroupConfig::default();
        assert_eq!(config.lock_policy(), LockPolicy::default());
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_lock_limit() {
        let config = LiveGroupConfig {
            max_locks_per_user: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidLockSettings));
    }

    #[test]
    fn test_short_stay_bounds() {
        assert!(ShortStayConfig::default().validate().is_ok());
        let config = ShortStayConfig {
            hold_minutes: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidShortStaySettings)
        );
    }
}
