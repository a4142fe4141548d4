//! Gameplay configuration.

use lumen_common::{load_toml, load_toml_or_default, save_toml};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::current::CurrentConfig;
use crate::error::GameplayResult;
use crate::light_toggle::LightToggleSettings;

/// Top-level gameplay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Default current zone settings
    pub current: CurrentConfig,
    /// Player light settings
    pub lights: LightToggleSettings,
    /// Seconds between light energy drains
    pub light_drain_interval: f32,
    /// Energy drained per interval
    pub light_drain_cost: f32,
    /// Capacity of the light energy pool
    pub light_energy: f32,
}

impl GameplayConfig {
    /// Load configuration from a specific path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> GameplayResult<Self> {
        let mut config: Self = load_toml(path)?;
        config.validate();
        Ok(config)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let mut config: Self = load_toml_or_default(path);
        config.validate();
        config
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> GameplayResult<()> {
        save_toml(self, path)?;
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        if self.current.strength < 0.0 {
            warn!("Negative current strength {}, clamping", self.current.strength);
            self.current.strength = 0.0;
        }
        self.current.particle_despawn_distance = self.current.particle_despawn_distance.max(0.0);
        self.lights.propulsion_light_range = self.lights.propulsion_light_range.clamp(0.0, 1.0);
        self.lights.minimal_energy = self.lights.minimal_energy.max(0.0);
        self.light_drain_interval = self.light_drain_interval.max(0.0);
        self.light_drain_cost = self.light_drain_cost.max(0.0);
        self.light_energy = self.light_energy.max(0.0);
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            current: CurrentConfig::default(),
            lights: LightToggleSettings::default(),
            light_drain_interval: 1.0,
            light_drain_cost: 1.0,
            light_energy: 100.0,
        }
    }
}
