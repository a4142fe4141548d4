//! Steering configuration.
//!
//! Provides tunable parameters for agents, arrival and flocking.
//! Configuration can be loaded from and saved to a TOML file.

use lumen_common::{load_toml, load_toml_or_default, save_toml, LayerMask};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::SteeringResult;
use crate::flocking::SpeedOverride;
use crate::steerable::MIN_SLOWING_RADIUS;

/// Default limits for newly spawned agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Minimum speed
    pub min_speed: f32,
    /// Maximum speed
    pub max_speed: f32,
    /// Maximum steering force
    pub max_force: f32,
    /// Neighbourhood query radius
    pub neighbor_radius: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.5,
            max_speed: 5.0,
            max_force: 10.0,
            neighbor_radius: 5.0,
        }
    }
}

/// Arrival tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalSettings {
    /// Distance at which agents start slowing down
    pub slowing_radius: f32,
    /// Strength multiplier
    pub strength: f32,
}

impl Default for ArrivalSettings {
    fn default() -> Self {
        Self {
            slowing_radius: 5.0,
            strength: 1.0,
        }
    }
}

/// Wander tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderSettings {
    /// Strength multiplier
    pub strength: f32,
    /// Wander circle radius
    pub circle_radius: f32,
    /// Distance to the wander circle
    pub circle_distance: f32,
    /// Maximum angle change per frame, in degrees
    pub angle_change: f32,
    /// Seed for the random walk
    pub seed: u64,
}

impl Default for WanderSettings {
    fn default() -> Self {
        Self {
            strength: 1.0,
            circle_radius: 1.0,
            circle_distance: 2.0,
            angle_change: 15.0,
            seed: 0x5EED,
        }
    }
}

/// Wall-avoidance tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallAvoidanceSettings {
    /// Strength multiplier
    pub strength: f32,
    /// Force applied to avoid the nearest obstacle
    pub avoidance_force: f32,
    /// Only obstacles this close are avoided
    pub max_view_distance: f32,
    /// Layers holding avoidable colliders
    pub obstacle_layer: LayerMask,
}

impl Default for WallAvoidanceSettings {
    fn default() -> Self {
        Self {
            strength: 1.0,
            avoidance_force: 10.0,
            max_view_distance: 3.0,
            obstacle_layer: LayerMask::ALL,
        }
    }
}

/// Flocking tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingConfig {
    /// Wander sub-behaviour
    pub wander: WanderSettings,
    /// Wall-avoidance sub-behaviour
    pub wall_avoidance: WallAvoidanceSettings,
    /// Alignment strength multiplier
    pub alignment_strength: f32,
    /// Cohesion strength multiplier
    pub cohesion_strength: f32,
    /// Separation strength multiplier
    pub separation_strength: f32,
    /// Speed bounds forced onto flocking agents
    pub speed_override: Option<SpeedOverride>,
    /// Max force forced onto flocking agents
    pub max_force_override: Option<f32>,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            wander: WanderSettings::default(),
            wall_avoidance: WallAvoidanceSettings::default(),
            alignment_strength: 1.0,
            cohesion_strength: 1.0,
            separation_strength: 1.5,
            speed_override: None,
            max_force_override: None,
        }
    }
}

/// Top-level steering configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Agent defaults
    pub agent: AgentConfig,
    /// Arrival tuning
    pub arrival: ArrivalSettings,
    /// Flocking tuning
    pub flocking: FlockingConfig,
}

impl SteeringConfig {
    /// Load configuration from a specific path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> SteeringResult<Self> {
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
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> SteeringResult<()> {
        save_toml(self, path)?;
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        let agent = &mut self.agent;
        agent.max_speed = agent.max_speed.max(0.0);
        if agent.min_speed > agent.max_speed {
            warn!(
                "min_speed {} exceeds max_speed {}, clamping",
                agent.min_speed, agent.max_speed
            );
        }
        agent.min_speed = agent.min_speed.clamp(0.0, agent.max_speed);
        agent.max_force = agent.max_force.max(0.0);
        agent.neighbor_radius = agent.neighbor_radius.max(0.0);

        if self.arrival.slowing_radius < MIN_SLOWING_RADIUS {
            warn!(
                "slowing_radius {} below minimum, clamping to {MIN_SLOWING_RADIUS}",
                self.arrival.slowing_radius
            );
            self.arrival.slowing_radius = MIN_SLOWING_RADIUS;
        }

        let flocking = &mut self.flocking;
        flocking.wander.circle_radius = flocking.wander.circle_radius.max(0.0);
        flocking.wander.circle_distance = flocking.wander.circle_distance.max(0.0);
        flocking.wander.angle_change = flocking.wander.angle_change.abs();
        flocking.wall_avoidance.avoidance_force = flocking.wall_avoidance.avoidance_force.max(0.0);
        flocking.wall_avoidance.max_view_distance =
            flocking.wall_avoidance.max_view_distance.max(0.0);
        if let Some(limits) = flocking.speed_override.as_mut() {
            limits.max_speed = limits.max_speed.max(0.0);
            limits.min_speed = limits.min_speed.clamp(0.0, limits.max_speed);
        }
        if let Some(max_force) = flocking.max_force_override.as_mut() {
            *max_force = max_force.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("steering.toml");

        let mut config = SteeringConfig::default();
        config.flocking.speed_override = Some(SpeedOverride {
            min_speed: 1.0,
            max_speed: 4.0,
        });
        config.flocking.wall_avoidance.obstacle_layer = LayerMask::from_layer(6);
        config.save_to(&path).expect("save");

        let loaded = SteeringConfig::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = SteeringConfig::default();
        config.agent.min_speed = 9.0;
        config.agent.max_speed = 3.0;
        config.arrival.slowing_radius = 0.0;
        config.flocking.wander.angle_change = -20.0;
        config.flocking.max_force_override = Some(-1.0);
        config.validate();

        assert_eq!(config.agent.min_speed, 3.0);
        assert_eq!(config.arrival.slowing_radius, MIN_SLOWING_RADIUS);
        assert_eq!(config.flocking.wander.angle_change, 20.0);
        assert_eq!(config.flocking.max_force_override, Some(0.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SteeringConfig = toml::from_str(
            "[flocking]\nseparation_strength = 3.0\n[flocking.wander]\ncircle_radius = 2.5\n",
        )
        .expect("parse");
        assert_eq!(config.flocking.separation_strength, 3.0);
        assert_eq!(config.flocking.wander.circle_radius, 2.5);
        assert_eq!(config.flocking.wander.circle_distance, 2.0);
        assert_eq!(config.agent, AgentConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = SteeringConfig::load_or_default(dir.path().join("nope.toml"));
        assert_eq!(config, SteeringConfig::default());
    }
}
