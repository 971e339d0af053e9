use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::Metric;
use crate::{DEFAULT_TOP_K, DEFAULT_WALKING_SPEED_KMH, Error, Position};

/// Tuning of the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub metric: Metric,
    pub walking_speed_kmh: f64,
    /// How many routes to recommend.
    pub top_k: usize,
    /// Travel mode passed to the directions hand-off.
    pub travel_mode: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
            top_k: DEFAULT_TOP_K,
            travel_mode: "walking".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.walking_speed_kmh.is_finite() && self.walking_speed_kmh > 0.0) {
            return Err(Error::Config(format!(
                "walking_speed_kmh must be positive, got {}",
                self.walking_speed_kmh
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Config("top_k must be at least 1".to_string()));
        }
        if self.travel_mode.trim().is_empty() {
            return Err(Error::Config("travel_mode must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: String,
    /// GeoJSON road network.
    pub roads: PathBuf,
    /// When set, every query uses this position instead of the device fix.
    pub debug_location: Option<Position>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            roads: PathBuf::from("assets/roads.geojson"),
            debug_location: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }
}
