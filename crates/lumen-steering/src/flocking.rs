//! Flocking: five steering behaviours run as one action.
//!
//! A [`Flocking`] owns its sub-behaviours outright and keeps their priority
//! and id in lock-step with its own. Every frame it runs them in a fixed
//! order: Cohesion, Alignment, Separation, WallAvoidance, Wander.

use lumen_common::LayerMask;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::action::{ActionState, NpcAction};
use crate::config::FlockingConfig;
use crate::neighborhood::{Alignment, Cohesion, Separation};
use crate::steerable::{BehaviorKind, Steerable};
use crate::wall_avoidance::WallAvoidance;
use crate::wander::Wander;
use crate::world::SteeringWorld;

/// Speed bounds forced onto the steerable while flocking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedOverride {
    /// Minimum speed
    pub min_speed: f32,
    /// Maximum speed
    pub max_speed: f32,
}

/// Composite flocking action.
#[derive(Debug, Clone)]
pub struct Flocking {
    state: ActionState,
    wander: Wander,
    wall_avoidance: WallAvoidance,
    alignment: Alignment,
    cohesion: Cohesion,
    separation: Separation,
    /// Speed bounds applied to the steerable before steering, if any
    speed_override: Option<SpeedOverride>,
    /// Max force applied to the steerable before steering, if any
    max_force_override: Option<f32>,
}

impl Flocking {
    /// Creates a flocking action; every sub-behaviour shares `priority` and `id`.
    #[must_use]
    pub fn new(priority: i32, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            state: ActionState::new(priority, id.clone()),
            wander: Wander::new(priority, id.clone()),
            wall_avoidance: WallAvoidance::new(priority, id.clone()),
            alignment: Alignment::new(priority, id.clone()),
            cohesion: Cohesion::new(priority, id.clone()),
            separation: Separation::new(priority, id),
            speed_override: None,
            max_force_override: None,
        }
    }

    /// Creates a flocking action configured from `config`.
    #[must_use]
    pub fn from_config(priority: i32, id: impl Into<String>, config: &FlockingConfig) -> Self {
        let mut flocking = Self::new(priority, id);
        flocking.apply_config(config);
        flocking
    }

    /// Applies every setting in `config`.
    pub fn apply_config(&mut self, config: &FlockingConfig) {
        let wander = &config.wander;
        self.set_wander_properties(
            wander.strength,
            wander.circle_radius,
            wander.circle_distance,
            wander.angle_change,
        );
        self.wander.reseed(wander.seed);

        let walls = &config.wall_avoidance;
        self.set_wall_avoidance_properties(
            walls.strength,
            walls.avoidance_force,
            walls.max_view_distance,
            walls.obstacle_layer,
        );
        self.set_alignment_properties(config.alignment_strength);
        self.set_cohesion_properties(config.cohesion_strength);
        self.set_separation_properties(config.separation_strength);

        self.speed_override = config.speed_override;
        self.max_force_override = config.max_force_override;
    }

    /// Configures the wander behaviour.
    ///
    /// `circle_radius` and `circle_distance` both strengthen the wander force
    /// and make direction changes likelier; `angle_change` is the maximum
    /// drift per frame in degrees.
    pub fn set_wander_properties(
        &mut self,
        strength: f32,
        circle_radius: f32,
        circle_distance: f32,
        angle_change: f32,
    ) {
        self.wander.set_strength_multiplier(strength);
        self.wander.set_circle_radius(circle_radius);
        self.wander.set_circle_distance(circle_distance);
        self.wander.set_angle_change(angle_change);
    }

    /// Configures the wall-avoidance behaviour.
    pub fn set_wall_avoidance_properties(
        &mut self,
        strength: f32,
        avoidance_force: f32,
        max_view_distance: f32,
        obstacle_layer: LayerMask,
    ) {
        self.wall_avoidance.set_strength_multiplier(strength);
        self.wall_avoidance.set_avoidance_force(avoidance_force);
        self.wall_avoidance.set_max_view_distance(max_view_distance);
        self.wall_avoidance.set_obstacle_layer(obstacle_layer);
    }

    /// Sets the alignment strength.
    pub fn set_alignment_properties(&mut self, strength: f32) {
        self.alignment.set_strength_multiplier(strength);
    }

    /// Sets the cohesion strength.
    pub fn set_cohesion_properties(&mut self, strength: f32) {
        self.cohesion.set_strength_multiplier(strength);
    }

    /// Sets the separation strength.
    pub fn set_separation_properties(&mut self, strength: f32) {
        self.separation.set_strength_multiplier(strength);
    }

    /// Forces the steerable's speed bounds while flocking.
    pub fn set_speed_override(&mut self, min_speed: f32, max_speed: f32) {
        self.speed_override = Some(SpeedOverride {
            min_speed,
            max_speed,
        });
    }

    /// Forces the steerable's max force while flocking.
    pub fn set_max_force_override(&mut self, max_force: f32) {
        self.max_force_override = Some(max_force);
    }

    /// Stops overriding the steerable's limits.
    pub fn clear_overrides(&mut self) {
        self.speed_override = None;
        self.max_force_override = None;
    }

    /// Returns the speed override, if any.
    #[must_use]
    pub const fn speed_override(&self) -> Option<SpeedOverride> {
        self.speed_override
    }

    /// Returns the max-force override, if any.
    #[must_use]
    pub const fn max_force_override(&self) -> Option<f32> {
        self.max_force_override
    }

    /// Returns the wander sub-behaviour.
    #[must_use]
    pub const fn wander(&self) -> &Wander {
        &self.wander
    }

    /// Returns the wall-avoidance sub-behaviour.
    #[must_use]
    pub const fn wall_avoidance(&self) -> &WallAvoidance {
        &self.wall_avoidance
    }

    /// Returns the alignment sub-behaviour.
    #[must_use]
    pub const fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    /// Returns the cohesion sub-behaviour.
    #[must_use]
    pub const fn cohesion(&self) -> &Cohesion {
        &self.cohesion
    }

    /// Returns the separation sub-behaviour.
    #[must_use]
    pub const fn separation(&self) -> &Separation {
        &self.separation
    }

    fn members_mut(&mut self) -> [&mut dyn NpcAction; 5] {
        [
            &mut self.cohesion,
            &mut self.alignment,
            &mut self.separation,
            &mut self.wall_avoidance,
            &mut self.wander,
        ]
    }
}

impl NpcAction for Flocking {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Flocking
    }

    fn set_priority(&mut self, priority: i32) {
        self.state.set_priority(priority);
        for member in self.members_mut() {
            member.set_priority(priority);
        }
    }

    fn set_id(&mut self, id: String) {
        for member in self.members_mut() {
            member.set_id(id.clone());
        }
        self.state.set_id(id);
    }

    fn execute(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld) {
        if let Some(limits) = self.speed_override {
            // Max first so the new minimum is not clamped by the old maximum
            steerable.set_max_speed(limits.max_speed);
            steerable.set_min_speed(limits.min_speed);
        }
        if let Some(max_force) = self.max_force_override {
            steerable.set_max_force(max_force);
        }

        // Order matters: each stage adds to the same accumulator
        for member in self.members_mut() {
            member.execute(steerable, world);
        }

        trace!(
            "Flocking '{}' force {:?}",
            self.state.id(),
            steerable.steering_force()
        );
    }
}
