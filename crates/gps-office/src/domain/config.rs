//! Office configuration.

use std::time::Duration;

use serde::Deserialize;
use shared_bus::NotifierConfig;

/// Neighbors kept per office. Also the upper bound on `k`.
pub const DEFAULT_NEIGHBOR_CAPACITY: usize = 3;

/// Longest lease a config may grant.
pub const MAX_LEASE_DURATION_SECS: u64 = shared_bus::MAX_LEASE_DURATION_SECS;

/// Tunables for one office.
///
/// Every field has a default, so a partial `[office]` table in a TOML file
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OfficeConfig {
    /// Neighbor table capacity, at most 3 (default: 3)
    pub k: usize,
    /// Simulated handling time per hop (default: 3000ms)
    pub settling_delay_ms: u64,
    /// Lifetime of an event subscription lease (default: 60s)
    pub lease_duration_secs: u64,
    /// Interval of the expired-lease sweep (default: 10s)
    pub lease_sweep_interval_secs: u64,
    /// Bound on a single listener delivery (default: 5000ms)
    pub delivery_timeout_ms: u64,
    /// Consecutive delivery failures before a subscriber is dropped (default: 3)
    pub max_delivery_failures: u32,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_NEIGHBOR_CAPACITY,
            settling_delay_ms: 3_000,
            lease_duration_secs: 60,
            lease_sweep_interval_secs: 10,
            delivery_timeout_ms: 5_000,
            max_delivery_failures: 3,
        }
    }
}

impl OfficeConfig {
    /// Create a config suitable for testing (no settling delay, short timeouts)
    pub fn for_testing() -> Self {
        Self {
            k: DEFAULT_NEIGHBOR_CAPACITY,
            settling_delay_ms: 0,
            lease_duration_secs: 10,
            lease_sweep_interval_secs: 1,
            delivery_timeout_ms: 100,
            max_delivery_failures: 2,
        }
    }

    /// Capacity handed to the neighbor table, kept within `1..=3` even for
    /// configs built without validation.
    pub fn neighbor_capacity(&self) -> usize {
        self.k.clamp(1, DEFAULT_NEIGHBOR_CAPACITY)
    }

    pub fn settling_delay(&self) -> Duration {
        Duration::from_millis(self.settling_delay_ms)
    }

    pub fn lease_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.lease_sweep_interval_secs)
    }

    /// Notifier limits derived from this config.
    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            lease_duration: Duration::from_secs(self.lease_duration_secs),
            delivery_timeout: Duration::from_millis(self.delivery_timeout_ms),
            max_delivery_failures: self.max_delivery_failures,
        }
    }
}
