//! Simulation configuration.
//!
//! Holds the run parameters plus the steering and gameplay tables, all in
//! one TOML file.

use anyhow::Result;
use lumen_common::{load_toml, load_toml_or_default, save_toml};
use lumen_gameplay::GameplayConfig;
use lumen_steering::SteeringConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of frames to run
    pub frames: u32,
    /// Fixed timestep in seconds
    pub fixed_dt: f32,
    /// Number of flocking agents
    pub agent_count: usize,
    /// Agents spawn inside a square of this half-extent
    pub spawn_extent: f32,
    /// Seed for spawn positions and wander
    pub seed: u64,
    /// Where the leader heads
    pub beacon: [f32; 3],
    /// Steering tuning
    pub steering: SteeringConfig,
    /// Gameplay tuning
    pub gameplay: GameplayConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fixed_dt: 1.0 / 60.0,
            agent_count: 24,
            spawn_extent: 10.0,
            seed: 7,
            beacon: [30.0, 0.0, 0.0],
            steering: SteeringConfig::default(),
            gameplay: GameplayConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a specific path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
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
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_toml(self, path)?;
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        if self.fixed_dt <= 0.0 {
            warn!("fixed_dt {} must be positive, using 1/60", self.fixed_dt);
            self.fixed_dt = 1.0 / 60.0;
        }
        self.fixed_dt = self.fixed_dt.max(0.001); // Minimum 1ms
        self.spawn_extent = self.spawn_extent.max(0.0);
        self.steering.validate();
        self.gameplay.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sim").join("lumen.toml");

        let mut config = SimConfig::default();
        config.agent_count = 3;
        config.steering.flocking.max_force_override = Some(2.0);
        config.save_to(&path).expect("save");

        assert_eq!(SimConfig::load_from(&path).expect("load"), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lumen.toml");
        std::fs::write(&path, "frames = \"many\"").expect("write");

        assert!(SimConfig::load_from(&path).is_err());
        assert_eq!(SimConfig::load_or_default(&path), SimConfig::default());
    }

    #[test]
    fn test_validate_fixes_timestep() {
        let mut config = SimConfig {
            fixed_dt: -1.0,
            ..SimConfig::default()
        };
        config.validate();
        assert!((config.fixed_dt - 1.0 / 60.0).abs() < 1e-6);
    }
}
