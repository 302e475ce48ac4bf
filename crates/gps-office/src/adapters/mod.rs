//! # Adapters
//!
//! In-process implementations of the driven ports. A simulation wires
//! offices through these; a networked deployment would replace the
//! directory and the links.

pub mod config;
pub mod directory;
pub mod link;
pub mod time;
pub mod view;

pub use config::{ConfigError, TomlConfigProvider};
pub use directory::InMemoryDirectory;
pub use link::{LinkFault, SimulatedLink};
pub use time::SystemTimeSource;
pub use view::DirectoryView;
