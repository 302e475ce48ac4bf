use crate::ports::TimeSource;

/// Production time source using the system clock.
///
/// # Example
///
/// ```rust
/// use gps_office::{SystemTimeSource, TimeSource};
///
/// let time_source = SystemTimeSource::new();
/// assert!(time_source.now_millis() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }
}
