//! # Office Runtime
//!
//! Runs a whole mesh of offices inside one process.
//!
//! ## Modules
//!
//! - `config` - scenario file: offices, links, packages, faults
//! - `simulation` - launches offices behind simulated links
//! - `customer` - origin client: sends a package, waits for its fate
//! - `headquarters` - monitor subscribed to every office's events
//!
//! ## Startup Sequence
//!
//! 1. Load the scenario and the `[office]` tunables
//! 2. Bind every office in a shared in-memory directory
//! 3. Start the headquarters monitor and the lease sweepers
//! 4. Arm scheduled faults
//! 5. Send packages and wait for their terminal events

pub mod config;
pub mod customer;
pub mod headquarters;
pub mod simulation;

pub use config::{FaultKind, FaultSpec, OfficeSpec, PackageSpec, ScenarioConfig, ScenarioError};
pub use customer::{Customer, CustomerError, DeliveryReport};
pub use headquarters::{ConsoleListener, Headquarters, OutputFormat};
pub use simulation::Simulation;
