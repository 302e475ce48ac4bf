//! # Driven Ports (Outbound SPI)
//!
//! Interfaces an office requires from its host.

use std::sync::Arc;

use async_trait::async_trait;

use super::inbound::OfficeRef;
use super::membership::{MembershipFilter, MembershipSubscription};
use crate::domain::DirectoryError;

/// Flat name-to-office registry shared by every office.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; offices call it concurrently from
/// their forwarding tasks.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Bind `name`. Fails with `AlreadyBound` if the name is taken.
    async fn bind(&self, name: &str, office: Arc<dyn OfficeRef>) -> Result<(), DirectoryError>;

    async fn unbind(&self, name: &str) -> Result<(), DirectoryError>;

    /// Resolve `name`. Fails with `NotBound` if nobody holds it.
    async fn lookup(&self, name: &str) -> Result<Arc<dyn OfficeRef>, DirectoryError>;

    /// Names currently bound, sorted.
    async fn list(&self) -> Result<Vec<String>, DirectoryError>;

    /// Stream of bind/unbind notifications matching `filter`.
    fn subscribe_membership(&self, filter: MembershipFilter) -> MembershipSubscription;
}

/// Wall-clock source for tracking numbers.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}
