//! Wall avoidance (containment): push away from the nearest obstacle.
//!
//! Works for obstacles of any shape since it only needs the closest point on
//! each collider, unlike sphere-approximating obstacle avoidance.

use lumen_common::LayerMask;

use crate::action::{ActionState, NpcAction};
use crate::steerable::{BehaviorKind, Steerable};
use crate::world::SteeringWorld;

/// Avoids the nearest obstacle within view.
#[derive(Debug, Clone)]
pub struct WallAvoidance {
    state: ActionState,
    /// Force applied to avoid the nearest obstacle
    avoidance_force: f32,
    /// Only obstacles within this distance are avoided
    max_view_distance: f32,
    /// Layers holding avoidable colliders
    obstacle_layer: LayerMask,
}

impl WallAvoidance {
    /// Creates a wall-avoidance action that sees every layer.
    #[must_use]
    pub fn new(priority: i32, id: impl Into<String>) -> Self {
        Self {
            state: ActionState::new(priority, id),
            avoidance_force: 10.0,
            max_view_distance: 3.0,
            obstacle_layer: LayerMask::ALL,
        }
    }

    /// Returns the avoidance force.
    #[must_use]
    pub const fn avoidance_force(&self) -> f32 {
        self.avoidance_force
    }

    /// Sets the avoidance force.
    pub fn set_avoidance_force(&mut self, force: f32) {
        self.avoidance_force = force.max(0.0);
    }

    /// Returns the view distance.
    #[must_use]
    pub const fn max_view_distance(&self) -> f32 {
        self.max_view_distance
    }

    /// Sets the view distance.
    pub fn set_max_view_distance(&mut self, distance: f32) {
        self.max_view_distance = distance.max(0.0);
    }

    /// Returns the obstacle layer mask.
    #[must_use]
    pub const fn obstacle_layer(&self) -> LayerMask {
        self.obstacle_layer
    }

    /// Sets the obstacle layer mask.
    pub fn set_obstacle_layer(&mut self, layer: LayerMask) {
        self.obstacle_layer = layer;
    }
}

impl NpcAction for WallAvoidance {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::WallAvoidance
    }

    fn execute(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld) {
        let obstacles =
            world.obstacles(steerable.position(), self.max_view_distance, self.obstacle_layer);
        steerable.add_wall_avoidance_force(
            &obstacles,
            self.max_view_distance,
            self.avoidance_force,
            self.state.strength_multiplier(),
        );
    }
}
