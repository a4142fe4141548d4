//! Scene queries consumed by the steering behaviours.
//!
//! Behaviours never hold references into the scene. Targets are addressed by
//! [`EntityId`] and resolved through a [`SteeringWorld`] on every call, so a
//! despawned target simply resolves to `None`.

use glam::Vec3;
use lumen_common::{EntityId, LayerMask};
use std::collections::BTreeMap;

use crate::steerable::Steerable;

/// Read-only view of another agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    /// Entity the agent belongs to
    pub id: EntityId,
    /// World position
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
}

/// Closest point of an obstacle collider relative to a query origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    /// Closest point on the collider surface
    pub point: Vec3,
    /// Outward surface normal at `point`
    pub normal: Vec3,
}

/// Scene query interface for steering behaviours.
///
/// This trait abstracts the host scene: transform lookup, the agent registry,
/// and layer-filtered collider queries.
pub trait SteeringWorld {
    /// Returns the world position of a transform, if it still exists.
    fn target_position(&self, target: EntityId) -> Option<Vec3>;

    /// Returns the state of another agent, if it still exists.
    fn agent(&self, id: EntityId) -> Option<AgentSnapshot>;

    /// Returns the agents within `agent.neighbor_radius()` of `agent`,
    /// excluding the agent itself.
    fn neighbors(&self, agent: &Steerable) -> Vec<AgentSnapshot>;

    /// Returns obstacles on `layers` within `max_distance` of `position`.
    fn obstacles(&self, position: Vec3, max_distance: f32, layers: LayerMask) -> Vec<ObstacleHit>;
}

/// Obstacle stored by [`SimpleWorld`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    /// Infinite plane through `point` facing `normal`
    Plane {
        /// Any point on the plane
        point: Vec3,
        /// Outward normal
        normal: Vec3,
        /// Collision layer
        layer: u8,
    },
    /// Sphere collider
    Sphere {
        /// Sphere centre
        centre: Vec3,
        /// Sphere radius
        radius: f32,
        /// Collision layer
        layer: u8,
    },
}

impl Obstacle {
    /// Returns the collision layer.
    #[must_use]
    pub const fn layer(&self) -> u8 {
        match self {
            Self::Plane { layer, .. } | Self::Sphere { layer, .. } => *layer,
        }
    }

    /// Returns the closest point on the obstacle to `position`.
    #[must_use]
    pub fn closest_hit(&self, position: Vec3) -> ObstacleHit {
        match *self {
            Self::Plane { point, normal, .. } => {
                let normal = normal.normalize_or_zero();
                let offset = (position - point).dot(normal);
                ObstacleHit {
                    point: position - normal * offset,
                    normal,
                }
            },
            Self::Sphere { centre, radius, .. } => {
                let normal = (position - centre).try_normalize().unwrap_or(Vec3::Y);
                ObstacleHit {
                    point: centre + normal * radius,
                    normal,
                }
            },
        }
    }
}

/// In-memory [`SteeringWorld`] for tests and headless simulation.
#[derive(Debug, Default)]
pub struct SimpleWorld {
    /// Tracked transform positions
    targets: BTreeMap<EntityId, Vec3>,
    /// Registered agents
    agents: BTreeMap<EntityId, AgentSnapshot>,
    /// Static obstacles
    obstacles: Vec<Obstacle>,
}

impl SimpleWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or moves a target transform.
    pub fn set_target(&mut self, id: EntityId, position: Vec3) {
        self.targets.insert(id, position);
    }

    /// Removes a target transform.
    pub fn remove_target(&mut self, id: EntityId) {
        self.targets.remove(&id);
    }

    /// Registers or updates an agent.
    pub fn upsert_agent(&mut self, snapshot: AgentSnapshot) {
        self.agents.insert(snapshot.id, snapshot);
    }

    /// Removes an agent.
    pub fn remove_agent(&mut self, id: EntityId) {
        self.agents.remove(&id);
    }

    /// Adds a static obstacle.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Returns the number of registered agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }
}

impl SteeringWorld for SimpleWorld {
    fn target_position(&self, target: EntityId) -> Option<Vec3> {
        self.targets.get(&target).copied()
    }

    fn agent(&self, id: EntityId) -> Option<AgentSnapshot> {
        self.agents.get(&id).copied()
    }

    fn neighbors(&self, agent: &Steerable) -> Vec<AgentSnapshot> {
        let radius_sq = agent.neighbor_radius() * agent.neighbor_radius();
        self.agents
            .values()
            .filter(|other| {
                other.id != agent.id()
                    && other.position.distance_squared(agent.position()) <= radius_sq
            })
            .copied()
            .collect()
    }

    fn obstacles(&self, position: Vec3, max_distance: f32, layers: LayerMask) -> Vec<ObstacleHit> {
        self.obstacles
            .iter()
            .filter(|obstacle| layers.contains_layer(obstacle.layer()))
            .map(|obstacle| obstacle.closest_hit(position))
            .filter(|hit| hit.point.distance(position) <= max_distance)
            .collect()
    }
}
