//! Water currents.
//!
//! A [`CurrentZone`] is an invisible trigger volume that pushes every physics
//! body inside it along one cardinal direction. While the player is inside,
//! a particle effect tracks the camera along the current's axis.

use glam::Vec3;
use lumen_common::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::scene::{CameraRig, ParticleSpawner, SceneContext};

/// Name of the sound played while a current pushes bodies.
pub const CURRENT_SOUND: &str = "Current";

/// Direction a current pushes in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentDirection {
    /// Pushes towards -Y
    #[default]
    Down,
    /// Pushes towards +Y
    Up,
    /// Pushes towards -X
    Left,
    /// Pushes towards +X
    Right,
}

impl CurrentDirection {
    /// Unit push vector.
    #[must_use]
    pub const fn vector(self) -> Vec3 {
        match self {
            Self::Down => Vec3::NEG_Y,
            Self::Up => Vec3::Y,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
        }
    }

    /// Name of the particle effect shown for this direction.
    #[must_use]
    pub const fn particle_effect(self) -> &'static str {
        match self {
            Self::Down => "downCurrent",
            Self::Up => "upCurrent",
            Self::Left => "leftCurrent",
            Self::Right => "rightCurrent",
        }
    }

    /// Whether the current runs along the Y axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Down | Self::Up)
    }
}

/// Current zone settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConfig {
    /// Magnitude of the push
    pub strength: f32,
    /// Push direction
    pub direction: CurrentDirection,
    /// Camera distance at which the particle effect is destroyed
    pub particle_despawn_distance: f32,
}

impl Default for CurrentConfig {
    fn default() -> Self {
        Self {
            strength: 5.0,
            direction: CurrentDirection::Down,
            particle_despawn_distance: 20.0,
        }
    }
}

/// Which currents hold the player, shared by every zone in a level.
#[derive(Debug, Clone, Default)]
pub struct CurrentTracker {
    /// Zones holding the player, with their particle direction
    occupied: BTreeMap<EntityId, Option<CurrentDirection>>,
    /// Direction parked while the player overlaps two currents
    waiting: Option<CurrentDirection>,
}

impl CurrentTracker {
    /// Creates a tracker with the player outside every current.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the player is inside any current.
    #[must_use]
    pub fn player_in_currents(&self) -> bool {
        !self.occupied.is_empty()
    }

    /// Returns the particle direction of a current holding the player.
    #[must_use]
    pub fn current_particle_direction(&self) -> Option<CurrentDirection> {
        self.occupied.values().find_map(|direction| *direction)
    }

    /// Returns the parked direction, if any.
    #[must_use]
    pub const fn waiting(&self) -> Option<CurrentDirection> {
        self.waiting
    }
}

/// A trigger volume that pushes bodies along a cardinal direction.
#[derive(Debug, Clone)]
pub struct CurrentZone {
    id: EntityId,
    origin: Vec3,
    config: CurrentConfig,
    /// Bodies currently inside the volume
    bodies: Vec<EntityId>,
    /// Live particle instance, if any
    particles: Option<EntityId>,
    /// Direction the particle effect follows; cleared once the player leaves
    particle_direction: Option<CurrentDirection>,
    player_inside: bool,
}

impl CurrentZone {
    /// Creates a zone at `origin`.
    #[must_use]
    pub fn new(id: EntityId, origin: Vec3, config: CurrentConfig) -> Self {
        Self {
            id,
            origin,
            particle_direction: Some(config.direction),
            config,
            bodies: Vec::new(),
            particles: None,
            player_inside: false,
        }
    }

    /// Returns the zone's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the zone's settings.
    #[must_use]
    pub const fn config(&self) -> &CurrentConfig {
        &self.config
    }

    /// Returns whether no bodies are inside.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Returns the bodies inside.
    #[must_use]
    pub fn bodies(&self) -> &[EntityId] {
        &self.bodies
    }

    /// Returns whether the player is inside this zone.
    #[must_use]
    pub const fn player_inside(&self) -> bool {
        self.player_inside
    }

    /// Returns the live particle instance.
    #[must_use]
    pub const fn particles(&self) -> Option<EntityId> {
        self.particles
    }

    /// Returns the direction the particle effect follows.
    #[must_use]
    pub const fn particle_direction(&self) -> Option<CurrentDirection> {
        self.particle_direction
    }

    /// Handles a collider entering the volume. Colliders without a physics
    /// body are ignored.
    pub fn on_body_enter(
        &mut self,
        body: EntityId,
        is_player: bool,
        ctx: &mut SceneContext<'_>,
        tracker: &mut CurrentTracker,
    ) {
        if !ctx.bodies.is_body(body) {
            return;
        }
        if !self.bodies.contains(&body) {
            self.bodies.push(body);
        }

        if is_player {
            let direction = self.particle_direction.unwrap_or(self.config.direction);
            self.start_particles(direction, ctx.particles);
            self.transition(true, Some(direction), tracker, ctx.camera);
            self.player_inside = true;
            tracker.occupied.insert(self.id, self.particle_direction);
            debug!("Player entered current {:?} ({:?})", self.id, direction);
        }
    }

    /// Handles a collider leaving the volume.
    pub fn on_body_exit(
        &mut self,
        body: EntityId,
        is_player: bool,
        ctx: &mut SceneContext<'_>,
        tracker: &mut CurrentTracker,
    ) {
        let Some(index) = self.bodies.iter().position(|tracked| *tracked == body) else {
            return;
        };
        self.bodies.remove(index);

        if is_player {
            self.transition(false, None, tracker, ctx.camera);
            self.player_inside = false;
            tracker.occupied.remove(&self.id);
            debug!("Player left current {:?}", self.id);
        }
    }

    /// Pushes every body inside and keeps the particle effect in view.
    pub fn update(&mut self, ctx: &mut SceneContext<'_>) {
        let push = self.config.direction.vector() * self.config.strength;
        for &body in &self.bodies {
            let Some(velocity) = ctx.bodies.velocity(body) else {
                continue;
            };
            if let Some(sound) = ctx.sound.as_deref_mut() {
                sound.play(CURRENT_SOUND, self.id);
            }
            ctx.bodies.add_force(body, -velocity);
            ctx.bodies.add_force(body, push);
            trace!("Current {:?} pushed {:?}", self.id, body);
        }

        self.update_particles(ctx.particles, &*ctx.camera);
    }

    fn start_particles(
        &mut self,
        direction: CurrentDirection,
        particles: &mut dyn ParticleSpawner,
    ) {
        let alive = self
            .particles
            .is_some_and(|instance| particles.position(instance).is_some());
        if !alive {
            self.particles = Some(particles.spawn(direction.particle_effect(), self.origin));
        }
    }

    fn update_particles(&mut self, particles: &mut dyn ParticleSpawner, camera: &dyn CameraRig) {
        let Some(instance) = self.particles else {
            return;
        };
        let Some(mut position) = particles.position(instance) else {
            self.particles = None;
            return;
        };

        let camera_position = camera.position();
        if let Some(direction) = self.particle_direction {
            if direction.is_vertical() {
                position.x = camera_position.x;
            } else {
                position.y = camera_position.y;
            }
            particles.set_position(instance, position);
        }

        if !self.player_inside
            && position.distance(camera_position) >= self.config.particle_despawn_distance
        {
            particles.despawn(instance);
            self.particles = None;
            debug!("Despawned particles of current {:?}", self.id);
        }
    }

    /// Updates the particle direction and zoom when the player crosses the
    /// boundary. A current entered while the player is already in another one
    /// is parked until the player leaves.
    fn transition(
        &mut self,
        entering: bool,
        direction: Option<CurrentDirection>,
        tracker: &mut CurrentTracker,
        camera: &mut dyn CameraRig,
    ) {
        if !camera.has_zoom() {
            return;
        }

        let mut entering = entering;
        if !entering {
            if let Some(waiting) = tracker.waiting.take() {
                self.particle_direction = Some(waiting);
                entering = true;
            }
        }

        if entering && tracker.player_in_currents() {
            tracker.waiting = direction;
        } else {
            self.particle_direction = direction;
        }
        camera.revert_zoom_timer();
    }
}
