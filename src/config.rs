//! Engine configuration, loadable from YAML.
//!
//! ```yaml
//! resolution: 0.1
//! padding_cells: 2
//! log_odds:
//!   d_free: 0.2
//!   d_occ: 0.4
//!   l_min: -5.0
//!   l_max: 5.0
//! ```
//!
//! Every field is optional and falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::LogOddsParams;
use crate::types::{DEFAULT_PADDING_CELLS, MapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMapConfig {
    /// Cell size in meters.
    #[serde(
        default = "default_resolution",
        deserialize_with = "deserialize_resolution"
    )]
    pub resolution: f64,
    /// Cells added on every side beyond the trajectory plus sensor range.
    #[serde(default = "default_padding_cells")]
    pub padding_cells: u32,
    #[serde(default)]
    pub log_odds: LogOddsParams,
}

impl Default for GridMapConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            padding_cells: default_padding_cells(),
            log_odds: LogOddsParams::default(),
        }
    }
}

fn default_resolution() -> f64 {
    0.1
}

fn default_padding_cells() -> u32 {
    DEFAULT_PADDING_CELLS
}

fn deserialize_resolution<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(
            "resolution must be a positive number of meters",
        ))
    }
}

impl GridMapConfig {
    pub fn with_resolution(resolution: f64) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.resolution > 0.0 && self.resolution.is_finite()) {
            return Err(MapError::InvalidConfig(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        self.log_odds.validate()
    }
}
