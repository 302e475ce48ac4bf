//! Cross-crate integration scenarios.

pub mod failure_flows;
pub mod notification_flows;
pub mod routing_flows;
