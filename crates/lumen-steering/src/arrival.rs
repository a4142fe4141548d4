//! Arrival: seek a transform and slow down on approach.

use lumen_common::EntityId;
use tracing::debug;

use crate::action::{ActionState, NpcAction};
use crate::steerable::{BehaviorKind, Steerable, MIN_SLOWING_RADIUS};
use crate::world::SteeringWorld;

/// Default slowing radius in world units.
pub const DEFAULT_SLOWING_RADIUS: f32 = 5.0;

/// Applies an arrival steering force toward a target transform.
///
/// If the target stops resolving the action completes and stays completed:
/// pointing it at a new target does not re-arm it.
#[derive(Debug, Clone)]
pub struct Arrival {
    state: ActionState,
    /// Transform being approached
    target: EntityId,
    /// Distance at which the agent starts slowing down
    slowing_radius: f32,
}

impl Arrival {
    /// Creates an arrival action toward `target`.
    #[must_use]
    pub fn new(priority: i32, id: impl Into<String>, target: EntityId) -> Self {
        Self {
            state: ActionState::new(priority, id),
            target,
            slowing_radius: DEFAULT_SLOWING_RADIUS,
        }
    }

    /// Sets the slowing radius.
    #[must_use]
    pub fn with_slowing_radius(mut self, radius: f32) -> Self {
        self.set_slowing_radius(radius);
        self
    }

    /// Returns the target transform.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        self.target
    }

    /// Points the action at another transform.
    pub fn set_target(&mut self, target: EntityId) {
        self.target = target;
    }

    /// Returns the slowing radius.
    #[must_use]
    pub const fn slowing_radius(&self) -> f32 {
        self.slowing_radius
    }

    /// Sets the slowing radius, clamped to [`MIN_SLOWING_RADIUS`].
    pub fn set_slowing_radius(&mut self, radius: f32) {
        self.slowing_radius = radius.max(MIN_SLOWING_RADIUS);
    }
}

impl NpcAction for Arrival {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Arrival
    }

    fn execute(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld) {
        if let Some(target) = world.target_position(self.target) {
            steerable.add_arrival_force(
                target,
                self.slowing_radius,
                self.state.strength_multiplier(),
            );
        } else {
            debug!(
                "Arrival '{}' lost target {:?}, completing",
                self.state.id(),
                self.target
            );
            self.action_completed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SimpleWorld;
    use glam::Vec3;
    use proptest::prelude::*;

    fn agent() -> Steerable {
        Steerable::new(EntityId::new(), Vec3::ZERO)
            .with_speed_limits(0.0, 5.0)
            .with_max_force(1000.0)
    }

    fn arrival_magnitude(distance: f32, slowing_radius: f32, strength: f32) -> f32 {
        let mut world = SimpleWorld::new();
        let target = EntityId::new();
        world.set_target(target, Vec3::new(distance, 0.0, 0.0));

        let mut arrival = Arrival::new(1, "arrive", target).with_slowing_radius(slowing_radius);
        arrival.set_strength_multiplier(strength);

        let mut steerable = agent();
        arrival.execute(&mut steerable, &world);
        steerable.steering_force().length()
    }

    #[test]
    fn test_arrival_scales_inside_radius() {
        let full = arrival_magnitude(50.0, 10.0, 1.0);
        let near = arrival_magnitude(3.0, 10.0, 1.0);
        assert!((full - 5.0).abs() < 1e-4);
        assert!((near - 0.3 * full).abs() < 1e-4);
    }

    #[test]
    fn test_arrival_completes_when_target_lost() {
        let mut world = SimpleWorld::new();
        let target = EntityId::new();
        world.set_target(target, Vec3::new(4.0, 0.0, 0.0));

        let mut arrival = Arrival::new(1, "arrive", target);
        let mut steerable = agent();

        arrival.execute(&mut steerable, &world);
        assert!(!arrival.is_completed());
        steerable.reset_steering_force();

        world.remove_target(target);
        arrival.execute(&mut steerable, &world);
        assert!(arrival.is_completed());
        assert_eq!(steerable.steering_force(), Vec3::ZERO);
        assert!(steerable.contributions().is_empty());
    }

    #[test]
    fn test_arrival_new_target_does_not_rearm() {
        let mut world = SimpleWorld::new();
        let mut arrival = Arrival::new(1, "arrive", EntityId::new());
        let mut steerable = agent();

        arrival.execute(&mut steerable, &world);
        assert!(arrival.is_completed());

        let replacement = EntityId::new();
        world.set_target(replacement, Vec3::X);
        arrival.set_target(replacement);
        assert!(arrival.is_completed());

        arrival.rearm();
        arrival.execute(&mut steerable, &world);
        assert!(!arrival.is_completed());
        assert_ne!(steerable.steering_force(), Vec3::ZERO);
    }

    #[test]
    fn test_slowing_radius_is_clamped() {
        let arrival = Arrival::new(1, "arrive", EntityId::new()).with_slowing_radius(0.0);
        assert_eq!(arrival.slowing_radius(), MIN_SLOWING_RADIUS);
    }

    proptest! {
        #[test]
        fn prop_full_strength_beyond_radius(
            radius in 0.1f32..50.0,
            extra in 0.0f32..100.0,
            strength in 0.1f32..4.0,
        ) {
            let magnitude = arrival_magnitude(radius + extra, radius, strength);
            prop_assert!((magnitude - 5.0 * strength).abs() < 1e-3 * strength.max(1.0));
        }

        #[test]
        fn prop_scales_with_distance_inside_radius(
            radius in 1.0f32..50.0,
            a in 0.0f32..1.0,
            b in 0.0f32..1.0,
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let near = arrival_magnitude(low * radius, radius, 1.0);
            let far = arrival_magnitude(high * radius, radius, 1.0);
            prop_assert!(near <= far + 1e-4);
            prop_assert!((near - 5.0 * low).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_distance_has_zero_force() {
        assert_eq!(arrival_magnitude(0.0, 10.0, 1.0), 0.0);
    }
}
