//! # Scenario Configuration
//!
//! A scenario file carries the `[office]` tunables (read through
//! `TomlConfigProvider`) plus the mesh to build:
//!
//! ```toml
//! [[offices]]
//! name = "A"
//! x = 0.0
//! y = 0.0
//! links = ["B"]        # optional; omitted = sees every office
//!
//! [[packages]]
//! origin = "A"
//! x = 29.0
//! y = 1.0
//!
//! [[faults]]
//! office = "B"
//! kind = "severed"     # or "drop-packages"
//! after_ms = 1500
//! ```

use std::fs;
use std::path::Path;

use gps_office::{ConfigError, LinkFault, Location, OfficeConfig, TomlConfigProvider};
use serde::Deserialize;
use shared_types::InvalidLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Cannot read scenario {path}: {error}")]
    Io { path: String, error: String },

    #[error("Malformed scenario: {0}")]
    Parse(String),

    #[error(transparent)]
    Office(#[from] ConfigError),

    #[error("Scenario defines no offices")]
    NoOffices,

    #[error("Unknown office {name} referenced by {context}")]
    UnknownOffice { name: String, context: String },

    #[error("{context}: {source}")]
    InvalidLocation {
        context: String,
        source: InvalidLocation,
    },
}

/// One office to launch.
#[derive(Debug, Clone, Deserialize)]
pub struct OfficeSpec {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Offices this one can discover; `None` means all of them.
    #[serde(default)]
    pub links: Option<Vec<String>>,
}

/// One package to send.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSpec {
    pub origin: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    Severed,
    DropPackages,
}

impl From<FaultKind> for LinkFault {
    fn from(kind: FaultKind) -> Self {
        match kind {
            FaultKind::Severed => LinkFault::Severed,
            FaultKind::DropPackages => LinkFault::DropPackages,
        }
    }
}

/// A fault injected into an office's link after a delay.
#[derive(Debug, Clone, Deserialize)]
pub struct FaultSpec {
    pub office: String,
    pub kind: FaultKind,
    #[serde(default)]
    pub after_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    offices: Vec<OfficeSpec>,
    #[serde(default)]
    packages: Vec<PackageSpec>,
    #[serde(default)]
    faults: Vec<FaultSpec>,
}

/// Fully validated scenario.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub office: OfficeConfig,
    pub offices: Vec<OfficeSpec>,
    pub packages: Vec<PackageSpec>,
    pub faults: Vec<FaultSpec>,
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ScenarioError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let office = TomlConfigProvider::parse(content)?.into_config();
        let file: ScenarioFile =
            toml::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))?;

        let scenario = Self {
            office,
            offices: file.offices,
            packages: file.packages,
            faults: file.faults,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn office_spec(&self, name: &str) -> Option<&OfficeSpec> {
        self.offices.iter().find(|o| o.name == name)
    }

    /// Destination of `package`, rejecting non-finite coordinates.
    pub fn destination(package: &PackageSpec) -> Result<Location, ScenarioError> {
        Location::checked(package.x, package.y).map_err(|source| ScenarioError::InvalidLocation {
            context: format!("package from {}", package.origin),
            source,
        })
    }

    /// Duplicate office names are left to the directory, which rejects them at launch.
    fn validate(&self) -> Result<(), ScenarioError> {
        if self.offices.is_empty() {
            return Err(ScenarioError::NoOffices);
        }

        for office in &self.offices {
            Location::checked(office.x, office.y).map_err(|source| {
                ScenarioError::InvalidLocation {
                    context: format!("office {}", office.name),
                    source,
                }
            })?;
            for link in office.links.iter().flatten() {
                self.require_office(link, &format!("links of {}", office.name))?;
            }
        }

        for package in &self.packages {
            self.require_office(&package.origin, "packages")?;
            Self::destination(package)?;
        }

        for fault in &self.faults {
            self.require_office(&fault.office, "faults")?;
        }

        Ok(())
    }

    fn require_office(&self, name: &str, context: &str) -> Result<(), ScenarioError> {
        match self.office_spec(name) {
            Some(_) => Ok(()),
            None => Err(ScenarioError::UnknownOffice {
                name: name.to_string(),
                context: context.to_string(),
            }),
        }
    }
}
