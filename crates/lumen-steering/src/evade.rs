//! Evade: escape the predicted position of another agent.

use lumen_common::EntityId;
use tracing::trace;

use crate::action::{ActionState, NpcAction};
use crate::steerable::{BehaviorKind, Steerable};
use crate::world::SteeringWorld;

/// Applies an evade steering force away from another agent.
///
/// Unlike [`Arrival`](crate::Arrival), losing the target does not complete
/// the action; it keeps running and resumes once the target resolves again.
#[derive(Debug, Clone)]
pub struct Evade {
    state: ActionState,
    /// Agent being escaped
    target: EntityId,
}

impl Evade {
    /// Creates an evade action away from `target`.
    #[must_use]
    pub fn new(priority: i32, id: impl Into<String>, target: EntityId) -> Self {
        Self {
            state: ActionState::new(priority, id),
            target,
        }
    }

    /// Returns the agent being escaped.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        self.target
    }

    /// Sets the agent being escaped.
    pub fn set_target(&mut self, target: EntityId) {
        self.target = target;
    }
}

impl NpcAction for Evade {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Evade
    }

    fn execute(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld) {
        match world.agent(self.target) {
            Some(target) => steerable.add_evade_force(&target, self.state.strength_multiplier()),
            None => trace!("Evade '{}' has no target this frame", self.state.id()),
        }
    }
}
