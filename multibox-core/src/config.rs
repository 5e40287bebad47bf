use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Triple;
use crate::adjuster::ValueAdjuster;
use crate::bounds::Range;
use crate::error::{ConfigError, NumberBoxError};

/// Cadence of the held-key auto-repeat loop.
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 10;

/// Everything a box can be configured with. Every field has a default, so an
/// empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberBoxConfig {
    pub initial: Triple,
    pub tick_frequency: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub wrap: bool,
    pub repeat_interval_ms: u64,
}

impl Default for NumberBoxConfig {
    fn default() -> Self {
        Self {
            initial: Triple::default(),
            tick_frequency: 1.0,
            minimum: f64::MIN,
            maximum: f64::MAX,
            wrap: false,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
        }
    }
}

impl NumberBoxConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded number box config");
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), NumberBoxError> {
        self.adjuster().map(|_| ())
    }

    pub fn range(&self) -> Result<Range, NumberBoxError> {
        Range::new(self.minimum, self.maximum, self.wrap)
    }

    pub fn adjuster(&self) -> Result<ValueAdjuster, NumberBoxError> {
        ValueAdjuster::new(self.tick_frequency, self.range()?)
    }

    /// Never zero; a zero interval would spin the cadence loop.
    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms.max(1))
    }
}
