//! Alignment, cohesion and separation: forces derived from nearby agents.

use crate::action::{ActionState, NpcAction};
use crate::steerable::{BehaviorKind, Steerable};
use crate::world::SteeringWorld;

macro_rules! neighborhood_behavior {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $add:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            state: ActionState,
        }

        impl $name {
            #[doc = concat!("Creates a ", stringify!($name), " action.")]
            #[must_use]
            pub fn new(priority: i32, id: impl Into<String>) -> Self {
                Self {
                    state: ActionState::new(priority, id),
                }
            }
        }

        impl NpcAction for $name {
            fn state(&self) -> &ActionState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut ActionState {
                &mut self.state
            }

            fn kind(&self) -> BehaviorKind {
                BehaviorKind::$kind
            }

            fn execute(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld) {
                let neighbors = world.neighbors(steerable);
                steerable.$add(&neighbors, self.state.strength_multiplier());
            }
        }
    };
}

neighborhood_behavior!(
    /// Steers toward the average heading of nearby agents.
    Alignment,
    Alignment,
    add_alignment_force
);

neighborhood_behavior!(
    /// Steers toward the centre of nearby agents.
    Cohesion,
    Cohesion,
    add_cohesion_force
);

neighborhood_behavior!(
    /// Steers away from nearby agents, closest ones weighted most.
    Separation,
    Separation,
    add_separation_force
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{AgentSnapshot, SimpleWorld};
    use glam::Vec3;
    use lumen_common::EntityId;

    fn school() -> (SimpleWorld, Steerable) {
        let mut world = SimpleWorld::new();
        let me = Steerable::new(EntityId::new(), Vec3::ZERO)
            .with_neighbor_radius(10.0)
            .with_max_force(100.0);
        world.upsert_agent(me.snapshot());
        world.upsert_agent(AgentSnapshot {
            id: EntityId::new(),
            position: Vec3::new(4.0, 0.0, 0.0),
            velocity: Vec3::new(0.0, 1.0, 0.0),
        });
        world.upsert_agent(AgentSnapshot {
            id: EntityId::new(),
            position: Vec3::new(4.0, 2.0, 0.0),
            velocity: Vec3::new(0.0, 1.0, 0.0),
        });
        (world, me)
    }

    #[test]
    fn test_alignment_follows_school_heading() {
        let (world, mut me) = school();
        Alignment::new(1, "flock").execute(&mut me, &world);
        assert!((me.steering_force() - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_cohesion_heads_for_centre() {
        let (world, mut me) = school();
        Cohesion::new(1, "flock").execute(&mut me, &world);
        let force = me.steering_force();
        assert!(force.x > 0.0 && force.y > 0.0);
        assert!((force.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_separation_backs_off() {
        let (world, mut me) = school();
        let mut separation = Separation::new(1, "flock");
        separation.set_strength_multiplier(0.5);
        separation.execute(&mut me, &world);
        let force = me.steering_force();
        assert!(force.x < 0.0);
        assert!((force.length() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_alone_produces_zero_but_records() {
        let world = SimpleWorld::new();
        let mut me = Steerable::new(EntityId::new(), Vec3::ZERO);
        Cohesion::new(1, "flock").execute(&mut me, &world);
        Alignment::new(1, "flock").execute(&mut me, &world);

        assert_eq!(me.steering_force(), Vec3::ZERO);
        let kinds: Vec<_> = me.contributions().iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![BehaviorKind::Cohesion, BehaviorKind::Alignment]);
    }
}
