//! Notifier configuration.

use std::time::Duration;

use crate::{
    DEFAULT_DELIVERY_TIMEOUT_MS, DEFAULT_LEASE_DURATION_SECS, DEFAULT_MAX_DELIVERY_FAILURES,
};

/// Lease and delivery limits for an `EventNotifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Lifetime of a lease from subscription or last renewal.
    pub lease_duration: Duration,
    /// Upper bound on one `EventListener::report` call.
    pub delivery_timeout: Duration,
    /// Consecutive failures tolerated before the subscriber is dropped.
    pub max_delivery_failures: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            lease_duration: Duration::from_secs(DEFAULT_LEASE_DURATION_SECS),
            delivery_timeout: Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS),
            max_delivery_failures: DEFAULT_MAX_DELIVERY_FAILURES,
        }
    }
}

impl NotifierConfig {
    /// Short timeouts for tests.
    pub fn for_testing() -> Self {
        Self {
            lease_duration: Duration::from_secs(10),
            delivery_timeout: Duration::from_millis(100),
            max_delivery_failures: 2,
        }
    }
}
