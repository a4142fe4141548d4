//! Player light toggle.
//!
//! Tracks whether the player has switched their lights on, drains light
//! energy while they are on, and briefly lights the way at reduced range
//! while the player is propelling with the lights off.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::energy::LightEnergy;
use crate::scene::LightRig;

/// Light toggle settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightToggleSettings {
    /// Initial light state, inverted once on construction
    pub default_light_status: bool,
    /// Lights switch off once energy falls to this level
    pub minimal_energy: f32,
    /// Range percentage used while propelling with the lights off
    pub propulsion_light_range: f32,
}

impl Default for LightToggleSettings {
    fn default() -> Self {
        Self {
            default_light_status: true,
            minimal_energy: 1.0,
            propulsion_light_range: 0.5,
        }
    }
}

/// Player light state machine.
#[derive(Debug, Clone)]
pub struct PlayerLightToggle {
    settings: LightToggleSettings,
    /// Whether the lights are currently lit
    lights_enabled: bool,
    /// Whether the player has switched the lights on
    button_pressed: bool,
    /// Time accumulated towards the next energy drain
    depletion_timer: f32,
}

impl PlayerLightToggle {
    /// Creates the toggle and applies its initial state to `rig`.
    ///
    /// The default status is toggled once, so `default_light_status = true`
    /// starts with the lights off. The probe light is dimmed to zero.
    pub fn new(settings: LightToggleSettings, rig: &mut dyn LightRig) -> Self {
        let mut toggle = Self {
            lights_enabled: settings.default_light_status,
            button_pressed: settings.default_light_status,
            settings,
            depletion_timer: 0.0,
        };
        toggle.toggle_lights(rig);
        rig.set_probe_intensity(0.0);
        toggle
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &LightToggleSettings {
        &self.settings
    }

    /// Returns whether the lights are lit.
    #[must_use]
    pub const fn lights_enabled(&self) -> bool {
        self.lights_enabled
    }

    /// Returns whether the player has switched the lights on.
    #[must_use]
    pub const fn light_button_pressed(&self) -> bool {
        self.button_pressed
    }

    /// Flips the light button and applies it at full range.
    pub fn toggle_lights(&mut self, rig: &mut dyn LightRig) {
        self.button_pressed = !self.button_pressed;
        self.set_lights(rig, self.button_pressed, 1.0);
    }

    /// Drains `energy_cost` every `time_to_deplete` seconds while the light
    /// button is on, switching the lights off once energy runs low.
    pub fn deplete_light(
        &mut self,
        dt: f32,
        time_to_deplete: f32,
        energy_cost: f32,
        energy: &mut LightEnergy,
        rig: &mut dyn LightRig,
    ) {
        if !self.button_pressed {
            return;
        }

        self.depletion_timer += dt;
        if self.depletion_timer > time_to_deplete {
            energy.deplete(energy_cost);
            self.depletion_timer = 0.0;

            if energy.current() <= self.settings.minimal_energy {
                debug!("Light energy low ({}), switching lights off", energy.current());
                self.toggle_lights(rig);
            }
        }
    }

    /// Lights up at reduced range when propulsion starts with the lights off.
    pub fn on_propulsion_start(&mut self, rig: &mut dyn LightRig) {
        if !self.button_pressed {
            self.set_lights(rig, true, self.settings.propulsion_light_range);
        }
    }

    /// Restores the button state once propulsion ends.
    pub fn on_propulsion_end(&mut self, rig: &mut dyn LightRig) {
        if self.button_pressed {
            self.set_lights(rig, true, 1.0);
        } else {
            self.set_lights(rig, false, 1.0);
        }
    }

    fn set_lights(&mut self, rig: &mut dyn LightRig, enabled: bool, percent_range: f32) {
        rig.apply(enabled, percent_range);
        self.lights_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MockLights;

    fn settings(default_light_status: bool) -> LightToggleSettings {
        LightToggleSettings {
            default_light_status,
            minimal_energy: 2.0,
            propulsion_light_range: 0.4,
        }
    }

    #[test]
    fn test_construction_inverts_default() {
        let mut rig = MockLights::default();
        let toggle = PlayerLightToggle::new(settings(true), &mut rig);
        assert!(!toggle.light_button_pressed());
        assert!(!toggle.lights_enabled());
        assert!(!rig.active);
        assert_eq!(rig.probe_intensity, 0.0);

        let toggle = PlayerLightToggle::new(settings(false), &mut rig);
        assert!(toggle.light_button_pressed());
        assert!(rig.active);
        assert_eq!(rig.percent_range, 1.0);
    }

    #[test]
    fn test_depletion_switches_off_at_threshold() {
        let mut rig = MockLights::default();
        let mut toggle = PlayerLightToggle::new(settings(false), &mut rig);
        let mut energy = LightEnergy::new(4.0);

        // Timer must exceed the interval, not just reach it
        toggle.deplete_light(1.0, 1.0, 1.0, &mut energy, &mut rig);
        assert_eq!(energy.current(), 4.0);

        toggle.deplete_light(0.5, 1.0, 1.0, &mut energy, &mut rig);
        assert_eq!(energy.current(), 3.0);
        assert!(toggle.lights_enabled());

        toggle.deplete_light(1.5, 1.0, 1.0, &mut energy, &mut rig);
        assert_eq!(energy.current(), 2.0);
        assert!(!toggle.light_button_pressed());
        assert!(!rig.active);

        // Button off: no more drain
        toggle.deplete_light(5.0, 1.0, 1.0, &mut energy, &mut rig);
        assert_eq!(energy.current(), 2.0);
    }

    #[test]
    fn test_propulsion_with_lights_off() {
        let mut rig = MockLights::default();
        let mut toggle = PlayerLightToggle::new(settings(true), &mut rig);

        toggle.on_propulsion_start(&mut rig);
        assert!(rig.active);
        assert_eq!(rig.percent_range, toggle.settings().propulsion_light_range);
        assert_eq!(rig.percent_range, 0.4);
        assert!(toggle.lights_enabled());
        assert!(!toggle.light_button_pressed());

        toggle.on_propulsion_end(&mut rig);
        assert!(!rig.active);
        assert!(!toggle.lights_enabled());
    }

    #[test]
    fn test_propulsion_with_lights_on() {
        let mut rig = MockLights::default();
        let mut toggle = PlayerLightToggle::new(settings(false), &mut rig);

        toggle.on_propulsion_start(&mut rig);
        assert_eq!(rig.percent_range, 1.0);

        toggle.on_propulsion_end(&mut rig);
        assert!(rig.active);
        assert_eq!(rig.percent_range, 1.0);
    }
}
