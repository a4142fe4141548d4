//! ID types for entities and collision layers.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for entity IDs.
static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an entity in the scene.
///
/// Behaviours refer to their targets through an `EntityId` rather than a
/// reference, so a despawned target simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new unique entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) entity ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Bitmask over the 32 collision layers of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Mask matching no layer.
    pub const NONE: Self = Self(0);
    /// Mask matching every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Creates a mask containing a single layer.
    ///
    /// Layers outside `0..32` produce an empty mask.
    #[must_use]
    pub const fn from_layer(layer: u8) -> Self {
        if layer < 32 {
            Self(1 << layer)
        } else {
            Self::NONE
        }
    }

    /// Checks whether the given layer is part of this mask.
    #[must_use]
    pub const fn contains_layer(self, layer: u8) -> bool {
        self.intersects(Self::from_layer(layer))
    }

    /// Checks whether two masks share at least one layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
