//! Light energy pool.

use serde::{Deserialize, Serialize};

/// Energy that powers the player's lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightEnergy {
    /// Current value (0.0 to max)
    current: f32,
    /// Maximum value
    max: f32,
}

impl LightEnergy {
    /// Creates a full pool.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Returns current energy.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Returns max energy.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Returns energy as percentage (0.0-1.0).
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    /// Removes energy.
    pub fn deplete(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Adds energy.
    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Checks if depleted (0).
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deplete_and_restore() {
        let mut energy = LightEnergy::new(10.0);
        energy.deplete(4.0);
        assert_eq!(energy.current(), 6.0);
        assert_eq!(energy.percentage(), 0.6);

        energy.restore(100.0);
        assert_eq!(energy.current(), 10.0);

        energy.deplete(100.0);
        assert!(energy.is_depleted());
    }

    proptest! {
        #[test]
        fn prop_energy_stays_in_range(
            max in 0.0f32..1000.0,
            ops in prop::collection::vec((any::<bool>(), 0.0f32..500.0), 0..32),
        ) {
            let mut energy = LightEnergy::new(max);
            for (restore, amount) in ops {
                if restore {
                    energy.restore(amount);
                } else {
                    energy.deplete(amount);
                }
                prop_assert!(energy.current() >= 0.0);
                prop_assert!(energy.current() <= energy.max());
            }
        }
    }
}
