//! The prioritized action contract shared by every steering behaviour.

use serde::{Deserialize, Serialize};

use crate::steerable::{BehaviorKind, Steerable};
use crate::world::SteeringWorld;

/// Identity and bookkeeping shared by every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    /// Scheduling key, unique among an agent's active actions
    priority: i32,
    /// Reference handle
    id: String,
    /// Scale applied to the produced force
    strength_multiplier: f32,
    /// Set once the action has nothing left to do
    completed: bool,
}

impl ActionState {
    /// Creates a fresh, active state with a unit strength multiplier.
    #[must_use]
    pub fn new(priority: i32, id: impl Into<String>) -> Self {
        Self {
            priority,
            id: id.into(),
            strength_multiplier: 1.0,
            completed: false,
        }
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Sets the priority.
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Returns the id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Returns the strength multiplier.
    #[must_use]
    pub const fn strength_multiplier(&self) -> f32 {
        self.strength_multiplier
    }

    /// Sets the strength multiplier.
    pub fn set_strength_multiplier(&mut self, strength: f32) {
        self.strength_multiplier = strength;
    }

    /// Returns whether the action has completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Marks the action as completed.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Clears the completed flag.
    pub fn rearm(&mut self) {
        self.completed = false;
    }
}

/// A prioritized, identified unit of steering logic.
///
/// Implementors only provide [`state`](Self::state),
/// [`state_mut`](Self::state_mut), [`kind`](Self::kind) and
/// [`execute`](Self::execute); identity accessors come for free and may be
/// overridden by composites that need to fan changes out.
pub trait NpcAction: std::fmt::Debug {
    /// Shared action state.
    fn state(&self) -> &ActionState;

    /// Mutable shared action state.
    fn state_mut(&mut self) -> &mut ActionState;

    /// Which behaviour this action runs.
    fn kind(&self) -> BehaviorKind;

    /// Applies this frame's force contribution to `steerable`.
    ///
    /// Called once per frame while the action is scheduled. Must never panic:
    /// an unresolvable target is handled inside the action.
    fn execute(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld);

    /// Returns the scheduling priority.
    fn priority(&self) -> i32 {
        self.state().priority()
    }

    /// Sets the scheduling priority.
    fn set_priority(&mut self, priority: i32) {
        self.state_mut().set_priority(priority);
    }

    /// Returns the reference id.
    fn id(&self) -> &str {
        self.state().id()
    }

    /// Sets the reference id.
    fn set_id(&mut self, id: String) {
        self.state_mut().set_id(id);
    }

    /// Returns the strength multiplier.
    fn strength_multiplier(&self) -> f32 {
        self.state().strength_multiplier()
    }

    /// Sets the strength multiplier.
    fn set_strength_multiplier(&mut self, strength: f32) {
        self.state_mut().set_strength_multiplier(strength);
    }

    /// Signals that the action is finished.
    fn action_completed(&mut self) {
        self.state_mut().complete();
    }

    /// Returns whether the action is finished.
    fn is_completed(&self) -> bool {
        self.state().is_completed()
    }

    /// Makes a completed action schedulable again.
    fn rearm(&mut self) {
        self.state_mut().rearm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_lifecycle() {
        let mut state = ActionState::new(3, "seek-home");
        assert_eq!(state.priority(), 3);
        assert_eq!(state.id(), "seek-home");
        assert_eq!(state.strength_multiplier(), 1.0);
        assert!(!state.is_completed());

        state.complete();
        assert!(state.is_completed());
        state.rearm();
        assert!(!state.is_completed());

        state.set_priority(-1);
        state.set_id("other");
        state.set_strength_multiplier(0.5);
        assert_eq!(state, {
            let mut expected = ActionState::new(-1, "other");
            expected.set_strength_multiplier(0.5);
            expected
        });
    }
}
