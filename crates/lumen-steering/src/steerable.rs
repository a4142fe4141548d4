//! Steerable agent state and the force primitives behaviours call into.
//!
//! A [`Steerable`] never moves itself. Behaviours add force through the
//! `add_*_force` primitives; the simulation owner integrates the accumulated
//! force, clamps the speed, and resets the accumulator once per frame.

use glam::Vec3;
use lumen_common::EntityId;
use serde::{Deserialize, Serialize};

use crate::world::{AgentSnapshot, ObstacleHit};

/// Smallest slowing radius accepted by the arrival primitive.
pub const MIN_SLOWING_RADIUS: f32 = 0.01;

/// Distance under which two agents are treated as coincident.
const COINCIDENT_DISTANCE: f32 = 1e-4;

/// Kind of steering behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    /// Seek a target, slowing down on approach
    Arrival,
    /// Flee the predicted position of another agent
    Evade,
    /// Random walk on a projected circle
    Wander,
    /// Match the neighbourhood's heading
    Alignment,
    /// Steer toward the neighbourhood's centre
    Cohesion,
    /// Keep distance from close neighbours
    Separation,
    /// Push away from the nearest obstacle
    WallAvoidance,
    /// Composite of the five flocking behaviours
    Flocking,
}

impl BehaviorKind {
    /// Get display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Arrival => "Arrival",
            Self::Evade => "Evade",
            Self::Wander => "Wander",
            Self::Alignment => "Alignment",
            Self::Cohesion => "Cohesion",
            Self::Separation => "Separation",
            Self::WallAvoidance => "Wall Avoidance",
            Self::Flocking => "Flocking",
        }
    }
}

/// One physically simulated agent.
#[derive(Debug, Clone)]
pub struct Steerable {
    id: EntityId,
    position: Vec3,
    velocity: Vec3,
    min_speed: f32,
    max_speed: f32,
    max_force: f32,
    neighbor_radius: f32,
    /// Force accumulated this frame
    steering_force: Vec3,
    /// Contributions added this frame, in call order
    contributions: Vec<(BehaviorKind, Vec3)>,
}

impl Steerable {
    /// Creates a stationary steerable at the given position.
    #[must_use]
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            min_speed: 0.0,
            max_speed: 5.0,
            max_force: 10.0,
            neighbor_radius: 5.0,
            steering_force: Vec3::ZERO,
            contributions: Vec::new(),
        }
    }

    /// Sets the initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the speed limits.
    #[must_use]
    pub fn with_speed_limits(mut self, min_speed: f32, max_speed: f32) -> Self {
        self.set_max_speed(max_speed);
        self.set_min_speed(min_speed);
        self
    }

    /// Sets the maximum steering force.
    #[must_use]
    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.set_max_force(max_force);
        self
    }

    /// Sets the radius used for neighbourhood queries.
    #[must_use]
    pub fn with_neighbor_radius(mut self, radius: f32) -> Self {
        self.neighbor_radius = radius.max(0.0);
        self
    }

    /// Returns the entity this steerable belongs to.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the world position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Sets the world position. Owner only.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Returns the current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Sets the velocity. Owner only.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Returns the minimum speed.
    #[must_use]
    pub const fn min_speed(&self) -> f32 {
        self.min_speed
    }

    /// Sets the minimum speed, never above the maximum.
    pub fn set_min_speed(&mut self, min_speed: f32) {
        self.min_speed = min_speed.clamp(0.0, self.max_speed);
    }

    /// Returns the maximum speed.
    #[must_use]
    pub const fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Sets the maximum speed, lowering the minimum if needed.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(0.0);
        self.min_speed = self.min_speed.min(self.max_speed);
    }

    /// Returns the maximum steering force.
    #[must_use]
    pub const fn max_force(&self) -> f32 {
        self.max_force
    }

    /// Sets the maximum steering force.
    pub fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force.max(0.0);
        self.steering_force = self.steering_force.clamp_length_max(self.max_force);
    }

    /// Returns the neighbourhood query radius.
    #[must_use]
    pub const fn neighbor_radius(&self) -> f32 {
        self.neighbor_radius
    }

    /// Returns the force accumulated this frame.
    #[must_use]
    pub const fn steering_force(&self) -> Vec3 {
        self.steering_force
    }

    /// Returns every contribution added this frame, in call order.
    #[must_use]
    pub fn contributions(&self) -> &[(BehaviorKind, Vec3)] {
        &self.contributions
    }

    /// Clears the accumulated force. Called by the owner between frames.
    pub fn reset_steering_force(&mut self) {
        self.steering_force = Vec3::ZERO;
        self.contributions.clear();
    }

    /// Clamps the speed into `[min_speed, max_speed]`. Called by the owner
    /// after integrating the steering force.
    pub fn clamp_speed(&mut self) {
        let speed = self.velocity.length();
        if speed > self.max_speed {
            self.velocity = self.velocity.clamp_length_max(self.max_speed);
        } else if speed < self.min_speed && speed > f32::EPSILON {
            self.velocity *= self.min_speed / speed;
        }
    }

    /// Captures position and velocity for other agents to read.
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
        }
    }

    fn apply(&mut self, kind: BehaviorKind, force: Vec3) {
        self.contributions.push((kind, force));
        self.steering_force = (self.steering_force + force).clamp_length_max(self.max_force);
    }

    /// Velocity change needed to travel along `direction` at full speed.
    fn steer_toward(&self, direction: Vec3) -> Vec3 {
        direction.normalize_or_zero() * self.max_speed - self.velocity
    }

    fn neighborhood<'a>(
        &'a self,
        neighbors: &'a [AgentSnapshot],
    ) -> impl Iterator<Item = &'a AgentSnapshot> + 'a {
        neighbors.iter().filter(move |other| {
            other.id != self.id
                && other.position.distance_squared(self.position)
                    <= self.neighbor_radius * self.neighbor_radius
        })
    }

    // ========================================================================
    // Arrival
    // ========================================================================

    /// Computes the unscaled arrival force toward `target`.
    ///
    /// Beyond `slowing_radius` the desired velocity is a full-speed seek; inside
    /// it the desired speed falls linearly to zero at the target.
    #[must_use]
    pub fn arrival_force(&self, target: Vec3, slowing_radius: f32) -> Vec3 {
        let radius = slowing_radius.max(MIN_SLOWING_RADIUS);
        let to_target = target - self.position;
        let ramp = (to_target.length() / radius).min(1.0);
        to_target.normalize_or_zero() * self.max_speed * ramp - self.velocity
    }

    /// Adds an arrival force toward `target`.
    pub fn add_arrival_force(&mut self, target: Vec3, slowing_radius: f32, strength: f32) {
        let force = self.arrival_force(target, slowing_radius) * strength;
        self.apply(BehaviorKind::Arrival, force);
    }

    // ========================================================================
    // Evade
    // ========================================================================

    /// Computes the unscaled force fleeing the predicted position of `target`.
    #[must_use]
    pub fn evade_force(&self, target: &AgentSnapshot) -> Vec3 {
        let distance = self.position.distance(target.position);
        let look_ahead = if self.max_speed > f32::EPSILON {
            distance / self.max_speed
        } else {
            0.0
        };
        let predicted = target.position + target.velocity * look_ahead;
        self.steer_toward(self.position - predicted)
    }

    /// Adds a force fleeing the predicted position of `target`.
    pub fn add_evade_force(&mut self, target: &AgentSnapshot, strength: f32) {
        let force = self.evade_force(target) * strength;
        self.apply(BehaviorKind::Evade, force);
    }

    // ========================================================================
    // Wander
    // ========================================================================

    /// Computes the wander force for the given angle on the wander circle.
    ///
    /// The circle sits `circle_distance` ahead of the agent along its heading
    /// (+X when stationary); the angle is measured in radians in the XY plane.
    #[must_use]
    pub fn wander_force(&self, angle: f32, circle_distance: f32, circle_radius: f32) -> Vec3 {
        let heading = self.velocity.try_normalize().unwrap_or(Vec3::X);
        let centre = heading * circle_distance;
        let displacement = Vec3::new(angle.cos(), angle.sin(), 0.0) * circle_radius;
        centre + displacement
    }

    /// Adds a wander force.
    pub fn add_wander_force(
        &mut self,
        angle: f32,
        circle_distance: f32,
        circle_radius: f32,
        strength: f32,
    ) {
        let force = self.wander_force(angle, circle_distance, circle_radius) * strength;
        self.apply(BehaviorKind::Wander, force);
    }

    // ========================================================================
    // Neighbourhood behaviours
    // ========================================================================

    /// Computes the force matching the neighbourhood's average heading.
    #[must_use]
    pub fn alignment_force(&self, neighbors: &[AgentSnapshot]) -> Vec3 {
        let (sum, count) = self
            .neighborhood(neighbors)
            .fold((Vec3::ZERO, 0_u32), |(sum, count), other| {
                (sum + other.velocity, count + 1)
            });
        if count == 0 {
            return Vec3::ZERO;
        }
        let average = sum / count as f32;
        if average.length_squared() <= f32::EPSILON {
            return Vec3::ZERO;
        }
        self.steer_toward(average)
    }

    /// Adds an alignment force.
    pub fn add_alignment_force(&mut self, neighbors: &[AgentSnapshot], strength: f32) {
        let force = self.alignment_force(neighbors) * strength;
        self.apply(BehaviorKind::Alignment, force);
    }

    /// Computes the force seeking the neighbourhood's centre.
    #[must_use]
    pub fn cohesion_force(&self, neighbors: &[AgentSnapshot]) -> Vec3 {
        let (sum, count) = self
            .neighborhood(neighbors)
            .fold((Vec3::ZERO, 0_u32), |(sum, count), other| {
                (sum + other.position, count + 1)
            });
        if count == 0 {
            return Vec3::ZERO;
        }
        let to_centre = sum / count as f32 - self.position;
        if to_centre.length() <= COINCIDENT_DISTANCE {
            return Vec3::ZERO;
        }
        self.steer_toward(to_centre)
    }

    /// Adds a cohesion force.
    pub fn add_cohesion_force(&mut self, neighbors: &[AgentSnapshot], strength: f32) {
        let force = self.cohesion_force(neighbors) * strength;
        self.apply(BehaviorKind::Cohesion, force);
    }

    /// Computes the force repelling from neighbours, weighted by inverse distance.
    #[must_use]
    pub fn separation_force(&self, neighbors: &[AgentSnapshot]) -> Vec3 {
        let push = self
            .neighborhood(neighbors)
            .filter_map(|other| {
                let away = self.position - other.position;
                let distance = away.length();
                // Coincident agents have no direction to push along
                (distance > COINCIDENT_DISTANCE).then(|| away / (distance * distance))
            })
            .fold(Vec3::ZERO, |sum, push| sum + push);
        if push.length_squared() <= f32::EPSILON * f32::EPSILON {
            return Vec3::ZERO;
        }
        self.steer_toward(push)
    }

    /// Adds a separation force.
    pub fn add_separation_force(&mut self, neighbors: &[AgentSnapshot], strength: f32) {
        let force = self.separation_force(neighbors) * strength;
        self.apply(BehaviorKind::Separation, force);
    }

    // ========================================================================
    // Wall avoidance
    // ========================================================================

    /// Computes the force pushing away from the nearest obstacle in view.
    #[must_use]
    pub fn wall_avoidance_force(
        &self,
        obstacles: &[ObstacleHit],
        max_view_distance: f32,
        avoidance_force: f32,
    ) -> Vec3 {
        let nearest = obstacles
            .iter()
            .map(|hit| (hit, hit.point.distance(self.position)))
            .filter(|(_, distance)| *distance <= max_view_distance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        match nearest {
            Some((hit, _)) => {
                let away = (self.position - hit.point)
                    .try_normalize()
                    .unwrap_or_else(|| hit.normal.normalize_or_zero());
                away * avoidance_force
            },
            None => Vec3::ZERO,
        }
    }

    /// Adds a wall-avoidance force.
    pub fn add_wall_avoidance_force(
        &mut self,
        obstacles: &[ObstacleHit],
        max_view_distance: f32,
        avoidance_force: f32,
        strength: f32,
    ) {
        let force =
            self.wall_avoidance_force(obstacles, max_view_distance, avoidance_force) * strength;
        self.apply(BehaviorKind::WallAvoidance, force);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(position: Vec3) -> Steerable {
        Steerable::new(EntityId::new(), position)
            .with_speed_limits(0.0, 5.0)
            .with_max_force(100.0)
    }

    fn neighbor(position: Vec3, velocity: Vec3) -> AgentSnapshot {
        AgentSnapshot {
            id: EntityId::new(),
            position,
            velocity,
        }
    }

    #[test]
    fn test_arrival_full_speed_outside_radius() {
        let agent = agent_at(Vec3::ZERO);
        let force = agent.arrival_force(Vec3::new(20.0, 0.0, 0.0), 10.0);
        assert!((force - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_arrival_slows_inside_radius() {
        let agent = agent_at(Vec3::ZERO);
        let force = agent.arrival_force(Vec3::new(0.0, 3.0, 0.0), 10.0);
        assert!((force.length() - 1.5).abs() < 1e-5);
        assert!(force.y > 0.0);
    }

    #[test]
    fn test_arrival_zero_radius_is_clamped() {
        let agent = agent_at(Vec3::ZERO);
        let force = agent.arrival_force(Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert!(force.is_finite());
        assert!((force.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_arrival_at_target_brakes() {
        let agent = agent_at(Vec3::ONE).with_velocity(Vec3::new(2.0, 0.0, 0.0));
        let force = agent.arrival_force(Vec3::ONE, 4.0);
        assert!((force - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_evade_flees_predicted_position() {
        let agent = agent_at(Vec3::ZERO);
        // Target passes in front of the agent heading +Y
        let target = neighbor(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0));
        let force = agent.evade_force(&target);

        // Prediction lands at (5, 5): flee toward (-, -)
        assert!(force.x < 0.0);
        assert!(force.y < 0.0);
        assert!((force.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_wander_uses_heading() {
        let agent = agent_at(Vec3::ZERO).with_velocity(Vec3::new(0.0, 2.0, 0.0));
        let force = agent.wander_force(0.0, 3.0, 1.0);
        assert!((force - Vec3::new(1.0, 3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_wander_stationary_defaults_to_x() {
        let agent = agent_at(Vec3::ZERO);
        let force = agent.wander_force(std::f32::consts::FRAC_PI_2, 2.0, 1.0);
        assert!((force - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_alignment_matches_average_heading() {
        let agent = agent_at(Vec3::ZERO);
        let neighbors = [
            neighbor(Vec3::X, Vec3::new(0.0, 1.0, 0.0)),
            neighbor(Vec3::Y, Vec3::new(0.0, 3.0, 0.0)),
        ];
        let force = agent.alignment_force(&neighbors);
        assert!((force - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_neighbourhood_ignores_self_and_far_agents() {
        let agent = agent_at(Vec3::ZERO).with_neighbor_radius(2.0);
        let neighbors = [
            agent.snapshot(),
            neighbor(Vec3::new(50.0, 0.0, 0.0), Vec3::X),
        ];
        assert_eq!(agent.alignment_force(&neighbors), Vec3::ZERO);
        assert_eq!(agent.cohesion_force(&neighbors), Vec3::ZERO);
        assert_eq!(agent.separation_force(&neighbors), Vec3::ZERO);
    }

    #[test]
    fn test_cohesion_seeks_centroid() {
        let agent = agent_at(Vec3::ZERO);
        let neighbors = [
            neighbor(Vec3::new(2.0, 1.0, 0.0), Vec3::ZERO),
            neighbor(Vec3::new(2.0, -1.0, 0.0), Vec3::ZERO),
        ];
        let force = agent.cohesion_force(&neighbors);
        assert!((force - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_separation_pushes_away_from_closest() {
        let agent = agent_at(Vec3::ZERO);
        let neighbors = [
            neighbor(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO),
            neighbor(Vec3::new(-4.0, 0.0, 0.0), Vec3::ZERO),
        ];
        let force = agent.separation_force(&neighbors);
        assert!(force.x < 0.0);
        assert!((force.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_separation_skips_coincident() {
        let agent = agent_at(Vec3::ZERO);
        let neighbors = [neighbor(Vec3::ZERO, Vec3::X)];
        assert_eq!(agent.separation_force(&neighbors), Vec3::ZERO);
    }

    #[test]
    fn test_wall_avoidance_uses_nearest_in_view() {
        let agent = agent_at(Vec3::ZERO);
        let obstacles = [
            ObstacleHit {
                point: Vec3::new(0.0, 4.0, 0.0),
                normal: Vec3::NEG_Y,
            },
            ObstacleHit {
                point: Vec3::new(2.0, 0.0, 0.0),
                normal: Vec3::NEG_X,
            },
            ObstacleHit {
                point: Vec3::new(0.0, -0.5, 0.0),
                normal: Vec3::Y,
            },
        ];

        let force = agent.wall_avoidance_force(&obstacles, 3.0, 2.0);
        assert!((force - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);

        let out_of_view = agent.wall_avoidance_force(&obstacles[..1], 3.0, 2.0);
        assert_eq!(out_of_view, Vec3::ZERO);
    }

    #[test]
    fn test_wall_avoidance_touching_uses_normal() {
        let agent = agent_at(Vec3::ZERO);
        let obstacles = [ObstacleHit {
            point: Vec3::ZERO,
            normal: Vec3::new(0.0, 0.0, 3.0),
        }];
        let force = agent.wall_avoidance_force(&obstacles, 1.0, 4.0);
        assert!((force - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_accumulated_force_is_truncated() {
        let mut agent = agent_at(Vec3::ZERO).with_max_force(3.0);
        agent.add_arrival_force(Vec3::new(100.0, 0.0, 0.0), 1.0, 1.0);
        agent.add_arrival_force(Vec3::new(0.0, 100.0, 0.0), 1.0, 1.0);

        assert!(agent.steering_force().length() <= 3.0 + 1e-5);
        assert_eq!(agent.contributions().len(), 2);
        assert_eq!(agent.contributions()[0].0, BehaviorKind::Arrival);

        agent.reset_steering_force();
        assert_eq!(agent.steering_force(), Vec3::ZERO);
        assert!(agent.contributions().is_empty());
    }

    #[test]
    fn test_speed_limits_stay_ordered() {
        let mut agent = agent_at(Vec3::ZERO).with_speed_limits(2.0, 6.0);
        agent.set_max_speed(1.0);
        assert_eq!(agent.min_speed(), 1.0);
        agent.set_min_speed(4.0);
        assert_eq!(agent.min_speed(), 1.0);
        agent.set_max_force(-2.0);
        assert_eq!(agent.max_force(), 0.0);
    }

    #[test]
    fn test_clamp_speed() {
        let mut fast = agent_at(Vec3::ZERO)
            .with_speed_limits(1.0, 4.0)
            .with_velocity(Vec3::new(10.0, 0.0, 0.0));
        fast.clamp_speed();
        assert!((fast.velocity().length() - 4.0).abs() < 1e-5);

        let mut slow = agent_at(Vec3::ZERO)
            .with_speed_limits(1.0, 4.0)
            .with_velocity(Vec3::new(0.0, 0.25, 0.0));
        slow.clamp_speed();
        assert!((slow.velocity().length() - 1.0).abs() < 1e-5);

        let mut still = agent_at(Vec3::ZERO).with_speed_limits(1.0, 4.0);
        still.clamp_speed();
        assert_eq!(still.velocity(), Vec3::ZERO);
    }
}
