//! Registry configuration and TOML loading.

use std::path::Path;

use bindery_store::DEFAULT_SWEEP_INTERVAL;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Whether resolved instances are checked against their contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConformanceCheck {
    /// Every declared method must exist with the declared arity.
    #[default]
    Arity,
    /// Return instances unchecked.
    Disabled,
}

/// What `unassociate` removes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnassociatePolicy {
    /// Clear the object's own instance or factory; contract memberships stay.
    #[default]
    BindingOnly,
    /// Also remove the object from every contract's type list.
    Cascade,
}

/// Configuration for a [`Registry`](crate::Registry).
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// conformance = "arity"
/// unassociate = "cascade"
/// sweep_interval = 256
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Structural validation applied after resolution.
    pub conformance: ConformanceCheck,
    /// Scope of `unassociate`.
    pub unassociate: UnassociatePolicy,
    /// Record creations between automatic sweeps of dropped objects.
    /// `0` disables automatic sweeping.
    pub sweep_interval: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            conformance: ConformanceCheck::Arity,
            unassociate: UnassociatePolicy::BindingOnly,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl RegistryConfig {
    /// The default configuration: arity checks on, binding-only unassociate.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Skip conformance checks. Useful when instances are built from
    /// sources that cannot declare method shapes.
    pub fn lenient() -> Self {
        Self {
            conformance: ConformanceCheck::Disabled,
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
