//! # Lumen Gameplay
//!
//! Gameplay systems for Lumen.
//!
//! This crate provides:
//! - Water currents that push physics bodies and track the player
//! - The player light toggle and its energy drain
//! - Light energy pool
//! - Scene service traits and their mock implementations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod current;
pub mod energy;
pub mod error;
pub mod light_toggle;
pub mod scene;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::current::*;
    pub use crate::energy::*;
    pub use crate::error::*;
    pub use crate::light_toggle::*;
    pub use crate::scene::*;
}

pub use prelude::*;
