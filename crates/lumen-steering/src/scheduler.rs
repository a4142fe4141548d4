//! Per-agent action scheduler.
//!
//! Holds an agent's active actions keyed by priority. Each frame every action
//! runs once, highest priority first, and completed actions are dropped.

use std::collections::BTreeMap;
use tracing::debug;

use crate::action::NpcAction;
use crate::error::{SteeringError, SteeringResult};
use crate::steerable::Steerable;
use crate::world::SteeringWorld;

/// The set of actions driving one agent.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: BTreeMap<i32, Box<dyn NpcAction>>,
}

impl ActionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an action. Fails if its priority is already taken.
    pub fn insert(&mut self, action: Box<dyn NpcAction>) -> SteeringResult<()> {
        let priority = action.priority();
        if let Some(existing) = self.actions.get(&priority) {
            return Err(SteeringError::DuplicatePriority {
                priority,
                existing: existing.id().to_string(),
                rejected: action.id().to_string(),
            });
        }
        debug!(
            "Scheduled {} '{}' at priority {priority}",
            action.kind().display_name(),
            action.id()
        );
        self.actions.insert(priority, action);
        Ok(())
    }

    /// Unschedules the action with the given id.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Box<dyn NpcAction>> {
        let priority = self.key_of(id).ok()?;
        self.actions.remove(&priority)
    }

    /// Returns the action with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn NpcAction> {
        self.actions
            .values()
            .find(|action| action.id() == id)
            .map(|action| &**action)
    }

    /// Applies `edit` to the action with the given id.
    ///
    /// If `edit` changes the action's priority the action is re-keyed. A new
    /// priority held by another action is rolled back and reported as
    /// [`SteeringError::DuplicatePriority`]; any other edits are kept.
    pub fn modify<R>(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut dyn NpcAction) -> R,
    ) -> SteeringResult<R> {
        let key = self.key_of(id)?;
        let mut action = self
            .actions
            .remove(&key)
            .ok_or_else(|| SteeringError::UnknownAction(id.to_string()))?;

        let output = edit(action.as_mut());
        let wanted = action.priority();
        if wanted == key {
            self.actions.insert(key, action);
            return Ok(output);
        }

        if let Some(existing) = self.actions.get(&wanted) {
            let err = SteeringError::DuplicatePriority {
                priority: wanted,
                existing: existing.id().to_string(),
                rejected: action.id().to_string(),
            };
            action.set_priority(key);
            self.actions.insert(key, action);
            return Err(err);
        }

        debug!("Moved '{}' from priority {key} to {wanted}", action.id());
        self.actions.insert(wanted, action);
        Ok(output)
    }

    /// Moves the action with the given id to `priority`.
    pub fn set_priority(&mut self, id: &str, priority: i32) -> SteeringResult<()> {
        self.modify(id, |action| action.set_priority(priority))
    }

    fn key_of(&self, id: &str) -> SteeringResult<i32> {
        self.actions
            .iter()
            .find_map(|(priority, action)| (action.id() == id).then_some(*priority))
            .ok_or_else(|| SteeringError::UnknownAction(id.to_string()))
    }

    /// Returns the scheduled priorities, highest first.
    #[must_use]
    pub fn priorities(&self) -> Vec<i32> {
        self.actions.keys().rev().copied().collect()
    }

    /// Returns the number of scheduled actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs every active action once, highest priority first, then drops the
    /// completed ones. Returns how many actions ran.
    pub fn run_frame(&mut self, steerable: &mut Steerable, world: &dyn SteeringWorld) -> usize {
        let mut executed = 0;
        for action in self.actions.values_mut().rev() {
            if action.is_completed() {
                continue;
            }
            action.execute(steerable, world);
            executed += 1;
        }

        self.actions.retain(|priority, action| {
            if action.is_completed() {
                debug!(
                    "Dropping completed {} '{}' at priority {priority}",
                    action.kind().display_name(),
                    action.id()
                );
                false
            } else {
                true
            }
        });

        executed
    }
}
