//! Scene services used by gameplay systems.
//!
//! Gameplay code never looks objects up globally. Instead each frame it is
//! handed a [`SceneContext`] borrowing the services it may touch. The mock
//! implementations below back the tests and the headless simulation.

use glam::Vec3;
use lumen_common::EntityId;
use std::collections::BTreeMap;

/// Physics bodies that can be pushed around.
pub trait PhysicsBodies {
    /// Returns whether `id` has a physics body.
    fn is_body(&self, id: EntityId) -> bool;

    /// Returns the body's velocity, or `None` if it no longer exists.
    fn velocity(&self, id: EntityId) -> Option<Vec3>;

    /// Adds a force to the body. Unknown ids are ignored.
    fn add_force(&mut self, id: EntityId, force: Vec3);
}

/// The main camera.
pub trait CameraRig {
    /// World position of the camera.
    fn position(&self) -> Vec3;

    /// Returns whether the camera has a zoom controller.
    fn has_zoom(&self) -> bool;

    /// Restarts the zoom controller's revert timer.
    fn revert_zoom_timer(&mut self);
}

/// One-shot sound playback.
pub trait SoundPlayer {
    /// Plays the named sound at `source`.
    fn play(&mut self, name: &str, source: EntityId);
}

/// Particle effect instances.
pub trait ParticleSpawner {
    /// Spawns the named effect at `position` and starts it playing.
    fn spawn(&mut self, effect: &str, position: Vec3) -> EntityId;

    /// Returns the instance position, or `None` if it is gone.
    fn position(&self, id: EntityId) -> Option<Vec3>;

    /// Moves an instance.
    fn set_position(&mut self, id: EntityId, position: Vec3);

    /// Destroys an instance.
    fn despawn(&mut self, id: EntityId);
}

/// The lights carried by the player.
pub trait LightRig {
    /// Switches every player light except the probe light and scales its
    /// range, `0.0` being off and `1.0` the original range.
    fn apply(&mut self, active: bool, percent_range: f32);

    /// Sets the probe light's intensity.
    fn set_probe_intensity(&mut self, intensity: f32);
}

/// Services available to a gameplay system during one frame.
pub struct SceneContext<'a> {
    /// Physics bodies
    pub bodies: &'a mut dyn PhysicsBodies,
    /// Main camera
    pub camera: &'a mut dyn CameraRig,
    /// Particle effects
    pub particles: &'a mut dyn ParticleSpawner,
    /// Sound playback, if a sound manager exists
    pub sound: Option<&'a mut dyn SoundPlayer>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MockBody {
    velocity: Vec3,
    force: Vec3,
}

/// Mock physics bodies for testing.
#[derive(Debug, Default)]
pub struct MockBodies {
    bodies: BTreeMap<EntityId, MockBody>,
}

impl MockBodies {
    /// Creates an empty body set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body moving at `velocity`.
    pub fn insert(&mut self, id: EntityId, velocity: Vec3) {
        self.bodies.insert(
            id,
            MockBody {
                velocity,
                force: Vec3::ZERO,
            },
        );
    }

    /// Removes a body.
    pub fn remove(&mut self, id: EntityId) {
        self.bodies.remove(&id);
    }

    /// Returns the force accumulated on a body since the last [`Self::step`].
    #[must_use]
    pub fn force(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|body| body.force)
    }

    /// Integrates accumulated forces into velocities (unit mass) and clears them.
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.velocity += body.force * dt;
            body.force = Vec3::ZERO;
        }
    }
}

impl PhysicsBodies for MockBodies {
    fn is_body(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn velocity(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|body| body.velocity)
    }

    fn add_force(&mut self, id: EntityId, force: Vec3) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.force += force;
        }
    }
}

/// Mock camera for testing.
#[derive(Debug, Default)]
pub struct MockCamera {
    /// Camera position
    pub position: Vec3,
    /// Whether a zoom controller is attached
    pub has_zoom: bool,
    /// How many times the zoom timer was reverted
    pub zoom_reverts: u32,
}

impl MockCamera {
    /// Creates a camera at `position` with a zoom controller.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            has_zoom: true,
            zoom_reverts: 0,
        }
    }
}

impl CameraRig for MockCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn has_zoom(&self) -> bool {
        self.has_zoom
    }

    fn revert_zoom_timer(&mut self) {
        self.zoom_reverts += 1;
    }
}

/// Mock sound player that records what was played.
#[derive(Debug, Default)]
pub struct MockSound {
    /// Every `(name, source)` played so far
    pub played: Vec<(String, EntityId)>,
}

impl SoundPlayer for MockSound {
    fn play(&mut self, name: &str, source: EntityId) {
        self.played.push((name.to_string(), source));
    }
}

/// Mock particle spawner.
#[derive(Debug, Default)]
pub struct MockParticles {
    instances: BTreeMap<EntityId, (String, Vec3)>,
}

impl MockParticles {
    /// Creates an empty spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live instances.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.instances.len()
    }

    /// Returns the effect name of an instance.
    #[must_use]
    pub fn effect(&self, id: EntityId) -> Option<&str> {
        self.instances.get(&id).map(|(effect, _)| effect.as_str())
    }
}

impl ParticleSpawner for MockParticles {
    fn spawn(&mut self, effect: &str, position: Vec3) -> EntityId {
        let id = EntityId::new();
        self.instances.insert(id, (effect.to_string(), position));
        id
    }

    fn position(&self, id: EntityId) -> Option<Vec3> {
        self.instances.get(&id).map(|(_, position)| *position)
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some((_, current)) = self.instances.get_mut(&id) {
            *current = position;
        }
    }

    fn despawn(&mut self, id: EntityId) {
        self.instances.remove(&id);
    }
}

/// Mock light rig.
#[derive(Debug, Clone, PartialEq)]
pub struct MockLights {
    /// Whether the lights are on
    pub active: bool,
    /// Current range percentage
    pub percent_range: f32,
    /// Probe light intensity
    pub probe_intensity: f32,
}

impl Default for MockLights {
    fn default() -> Self {
        Self {
            active: false,
            percent_range: 1.0,
            probe_intensity: 1.0,
        }
    }
}

impl LightRig for MockLights {
    fn apply(&mut self, active: bool, percent_range: f32) {
        self.active = active;
        self.percent_range = percent_range;
    }

    fn set_probe_intensity(&mut self, intensity: f32) {
        self.probe_intensity = intensity;
    }
}
