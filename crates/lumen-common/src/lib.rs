//! # Lumen Common
//!
//! Common types, utilities, and shared abstractions for Lumen.
//!
//! This crate provides foundational types used across all Lumen subsystems:
//! - ID types (EntityId) and collision layer masks
//! - TOML configuration loading helpers
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
        assert!(!EntityId::NULL.is_valid());
    }

    #[test]
    fn test_layer_mask_filtering() {
        let walls = LayerMask::from_layer(3);
        let both = walls | LayerMask::from_layer(5);

        assert!(both.contains_layer(3));
        assert!(both.contains_layer(5));
        assert!(!walls.contains_layer(5));
        assert!(LayerMask::ALL.intersects(walls));
        assert!(!LayerMask::NONE.intersects(walls));
    }
}
