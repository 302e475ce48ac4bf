//! # Shared Bus - Office Event Notifier
//!
//! Broadcasts package lifecycle events from one office to every listener
//! holding a live lease on that office's event stream.
//!
//! ```text
//! ┌──────────────┐   publish()   ┌───────────────┐   report()   ┌────────────┐
//! │ Office Node  │ ────────────→ │ EventNotifier │ ───────────→ │ Listener 1 │
//! └──────────────┘               │  (leases)     │ ───────────→ │ Listener 2 │
//!                                └───────────────┘              └────────────┘
//!                                        ↑
//!                                   sweeper task
//! ```
//!
//! ## Delivery Rules
//!
//! - Every publish takes the next sequence number of that publisher.
//! - Delivery to each listener is bounded by `delivery_timeout`.
//! - Failed deliveries are counted and swallowed; a subscriber reaching
//!   `max_delivery_failures` consecutive failures is dropped.
//! - Expired leases stop receiving events and are purged on the next
//!   publish or sweep, whichever comes first.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod publisher;
pub mod subscriber;

pub use config::NotifierConfig;
pub use publisher::EventNotifier;
pub use subscriber::{Lease, LeaseError};

/// Default lease lifetime granted to a new subscriber.
pub const DEFAULT_LEASE_DURATION_SECS: u64 = 60;

/// Upper bound on any lease lifetime (one day); longer durations are clamped.
pub const MAX_LEASE_DURATION_SECS: u64 = 86_400;

/// Default bound on a single listener delivery.
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 5_000;

/// Consecutive failed deliveries before a subscriber is dropped.
pub const DEFAULT_MAX_DELIVERY_FAILURES: u32 = 3;
