//! Wander: a smooth random walk along a circle projected ahead of the agent.

use crate::action::{ActionState, NpcAction};
use crate::steerable::{BehaviorKind, Steerable};
use crate::world::SteeringWorld;

/// Seed used when none is supplied.
const DEFAULT_SEED: u64 = 0x5EED;

/// Applies a wander steering force.
///
/// The wander angle persists between frames and drifts by at most
/// `angle_change / 2` degrees either way per frame.
#[derive(Debug, Clone)]
pub struct Wander {
    state: ActionState,
    /// Radius of the wander circle; larger means sharper turns
    circle_radius: f32,
    /// Distance from the agent to the circle centre
    circle_distance: f32,
    /// Maximum change of the wander angle per frame, in degrees
    angle_change: f32,
    /// Current position on the circle, in radians
    wander_angle: f32,
    rng: fastrand::Rng,
}

impl Wander {
    /// Creates a wander action with default circle parameters.
    #[must_use]
    pub fn new(priority: i32, id: impl Into<String>) -> Self {
        Self {
            state: ActionState::new(priority, id),
            circle_radius: 1.0,
            circle_distance: 2.0,
            angle_change: 15.0,
            wander_angle: 0.0,
            rng: fastrand::Rng::with_seed(DEFAULT_SEED),
        }
    }

    /// Reseeds the random walk.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Restarts the random walk from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Returns the circle radius.
    #[must_use]
    pub const fn circle_radius(&self) -> f32 {
        self.circle_radius
    }

    /// Sets the circle radius.
    pub fn set_circle_radius(&mut self, radius: f32) {
        self.circle_radius = radius.max(0.0);
    }

    /// Returns the circle distance.
    #[must_use]
    pub const fn circle_distance(&self) -> f32 {
        self.circle_distance
    }

    /// Sets the circle distance.
    pub fn set_circle_distance(&mut self, distance: f32) {
        self.circle_distance = distance.max(0.0);
    }

    /// Returns the maximum angle change per frame, in degrees.
    #[must_use]
    pub const fn angle_change(&self) -> f32 {
        self.angle_change
    }

    /// Sets the maximum angle change per frame, in degrees.
    pub fn set_angle_change(&mut self, degrees: f32) {
        self.angle_change = degrees.abs();
    }

    /// Returns the current wander angle, in radians.
    #[must_use]
    pub const fn wander_angle(&self) -> f32 {
        self.wander_angle
    }
}

impl NpcAction for Wander {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Wander
    }

    fn execute(&mut self, steerable: &mut Steerable, _world: &dyn SteeringWorld) {
        steerable.add_wander_force(
            self.wander_angle,
            self.circle_distance,
            self.circle_radius,
            self.state.strength_multiplier(),
        );

        let drift = self.rng.f32() * self.angle_change - self.angle_change * 0.5;
        self.wander_angle =
            (self.wander_angle + drift.to_radians()).rem_euclid(std::f32::consts::TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SimpleWorld;
    use glam::Vec3;
    use lumen_common::EntityId;

    #[test]
    fn test_angle_drift_is_bounded() {
        let world = SimpleWorld::new();
        let mut wander = Wander::new(0, "wander").with_seed(7);
        wander.set_angle_change(10.0);
        let mut steerable = Steerable::new(EntityId::new(), Vec3::ZERO);

        let limit = 5.0_f32.to_radians() + 1e-5;
        for _ in 0..100 {
            let before = wander.wander_angle();
            wander.execute(&mut steerable, &world);
            steerable.reset_steering_force();

            let mut delta = (wander.wander_angle() - before).abs();
            if delta > std::f32::consts::PI {
                delta = std::f32::consts::TAU - delta;
            }
            assert!(delta <= limit, "drift {delta} exceeded {limit}");
            assert!((0.0..std::f32::consts::TAU).contains(&wander.wander_angle()));
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let world = SimpleWorld::new();
        let mut a = Wander::new(0, "a").with_seed(42);
        let mut b = Wander::new(0, "b").with_seed(42);
        let mut steerable = Steerable::new(EntityId::new(), Vec3::ZERO);

        for _ in 0..20 {
            a.execute(&mut steerable, &world);
            b.execute(&mut steerable, &world);
        }
        assert_eq!(a.wander_angle(), b.wander_angle());
    }

    #[test]
    fn test_force_follows_circle() {
        let world = SimpleWorld::new();
        let mut wander = Wander::new(0, "wander");
        wander.set_circle_distance(3.0);
        wander.set_circle_radius(1.0);
        wander.set_strength_multiplier(2.0);

        let mut steerable = Steerable::new(EntityId::new(), Vec3::ZERO)
            .with_velocity(Vec3::new(1.0, 0.0, 0.0))
            .with_max_force(100.0);
        wander.execute(&mut steerable, &world);

        // First frame starts at angle zero
        assert!((steerable.steering_force() - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(steerable.contributions()[0].0, BehaviorKind::Wander);
    }
}
