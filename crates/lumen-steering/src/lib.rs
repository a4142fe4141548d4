//! # Lumen Steering
//!
//! Priority-ordered NPC steering for Lumen.
//!
//! This crate provides the per-frame steering layer:
//! - [`Steerable`] force accumulator with speed and force limits
//! - The [`NpcAction`] contract shared by every behaviour
//! - Arrival, Evade and Wander
//! - Neighbourhood behaviours (Alignment, Cohesion, Separation)
//! - Wall avoidance against layered obstacles
//! - Flocking, a fixed-order composite of the above
//! - [`ActionQueue`], a per-agent priority scheduler
//! - TOML configuration
//!
//! Targets and neighbours are looked up through a [`SteeringWorld`], so an
//! action never owns the entities it reacts to.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod action;
pub mod arrival;
pub mod config;
pub mod error;
pub mod evade;
pub mod flocking;
pub mod neighborhood;
pub mod scheduler;
pub mod steerable;
pub mod wall_avoidance;
pub mod wander;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::action::*;
    pub use crate::arrival::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::evade::*;
    pub use crate::flocking::*;
    pub use crate::neighborhood::*;
    pub use crate::scheduler::*;
    pub use crate::steerable::*;
    pub use crate::wall_avoidance::*;
    pub use crate::wander::*;
    pub use crate::world::*;
}

pub use prelude::*;
