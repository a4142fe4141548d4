//! Headless simulation loop.
//!
//! Spawns a flock with one leader heading for a beacon, drops the player into
//! a water current, and steps everything at a fixed timestep.

use anyhow::Result;
use glam::Vec3;
use lumen_common::EntityId;
use lumen_gameplay::{
    CurrentTracker, CurrentZone, LightEnergy, MockBodies, MockCamera, MockLights, MockParticles,
    MockSound, PhysicsBodies, PlayerLightToggle, SceneContext,
};
use lumen_steering::{ActionQueue, Arrival, Flocking, NpcAction, SimpleWorld, Steerable};
use tracing::{debug, info};

use crate::config::SimConfig;

const FLOCKING_PRIORITY: i32 = 1;
const ARRIVAL_PRIORITY: i32 = 10;

/// One simulated NPC.
#[derive(Debug)]
pub struct Agent {
    /// Kinematic state and force accumulator
    pub steerable: Steerable,
    /// Scheduled actions
    pub queue: ActionQueue,
}

/// Aggregate state reported after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    /// Frames simulated
    pub frames: u32,
    /// Mean agent speed
    pub mean_speed: f32,
    /// Highest agent speed
    pub max_speed: f32,
    /// Flock centroid
    pub centroid: Vec3,
    /// Distance from the leader to the beacon
    pub leader_distance: f32,
    /// Player velocity
    pub player_velocity: Vec3,
    /// Whether the player is inside a current
    pub player_in_current: bool,
    /// Remaining light energy
    pub light_energy: f32,
    /// Whether the player's lights are lit
    pub lights_enabled: bool,
}

/// Gameplay side of the simulation.
#[derive(Debug)]
struct Level {
    bodies: MockBodies,
    camera: MockCamera,
    particles: MockParticles,
    sound: MockSound,
    lights: MockLights,
    tracker: CurrentTracker,
    zone: CurrentZone,
    player: EntityId,
    toggle: PlayerLightToggle,
    energy: LightEnergy,
}

/// Flock plus level, stepped together.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    world: SimpleWorld,
    agents: Vec<Agent>,
    beacon: EntityId,
    level: Level,
    frame: u32,
}

impl Simulation {
    /// Builds the flock and the level from `config`.
    pub fn new(config: SimConfig) -> Result<Self> {
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let mut world = SimpleWorld::new();

        let beacon = EntityId::new();
        world.set_target(beacon, Vec3::from_array(config.beacon));

        let agent_defaults = &config.steering.agent;
        let mut agents = Vec::with_capacity(config.agent_count);
        for index in 0..config.agent_count {
            let extent = config.spawn_extent;
            let position = Vec3::new(
                (rng.f32() * 2.0 - 1.0) * extent,
                (rng.f32() * 2.0 - 1.0) * extent,
                0.0,
            );
            let steerable = Steerable::new(EntityId::new(), position)
                .with_speed_limits(agent_defaults.min_speed, agent_defaults.max_speed)
                .with_max_force(agent_defaults.max_force)
                .with_neighbor_radius(agent_defaults.neighbor_radius);

            let mut flocking_config = config.steering.flocking.clone();
            flocking_config.wander.seed = flocking_config.wander.seed.wrapping_add(index as u64);

            let mut queue = ActionQueue::new();
            queue.insert(Box::new(Flocking::from_config(
                FLOCKING_PRIORITY,
                format!("flock-{index}"),
                &flocking_config,
            )))?;

            if index == 0 {
                let arrival_settings = &config.steering.arrival;
                let mut arrival = Arrival::new(ARRIVAL_PRIORITY, "leader", beacon)
                    .with_slowing_radius(arrival_settings.slowing_radius);
                arrival.set_strength_multiplier(arrival_settings.strength);
                queue.insert(Box::new(arrival))?;
            }

            world.upsert_agent(steerable.snapshot());
            agents.push(Agent { steerable, queue });
        }

        let level = Level::new(&config);
        info!(
            "Spawned {} agents, beacon at {:?}",
            agents.len(),
            config.beacon
        );

        Ok(Self {
            config,
            world,
            agents,
            beacon,
            level,
            frame: 0,
        })
    }

    /// Returns the agents.
    #[cfg(test)]
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Removes the beacon, which completes the leader's arrival.
    #[cfg(test)]
    pub fn remove_beacon(&mut self) {
        self.world.remove_target(self.beacon);
    }

    /// Advances one fixed step.
    pub fn step(&mut self) {
        let dt = self.config.fixed_dt;

        for agent in &mut self.agents {
            agent.steerable.reset_steering_force();
            agent.queue.run_frame(&mut agent.steerable, &self.world);
        }

        // Integrate after every agent has steered so neighbours see one frame
        for agent in &mut self.agents {
            let steerable = &mut agent.steerable;
            let velocity = steerable.velocity() + steerable.steering_force() * dt;
            steerable.set_velocity(velocity);
            steerable.clamp_speed();
            steerable.set_position(steerable.position() + steerable.velocity() * dt);
            self.world.upsert_agent(steerable.snapshot());
        }

        self.level.step(dt, &self.config);
        self.frame += 1;

        if self.frame % 60 == 0 {
            debug!("Frame {}: centroid {:?}", self.frame, self.centroid());
        }
    }

    /// Runs the configured number of frames.
    pub fn run(&mut self) -> SimSummary {
        for _ in 0..self.config.frames {
            self.step();
        }
        self.summary()
    }

    /// Reports the current state.
    #[must_use]
    pub fn summary(&self) -> SimSummary {
        let speeds: Vec<f32> = self
            .agents
            .iter()
            .map(|agent| agent.steerable.velocity().length())
            .collect();
        let mean_speed = if speeds.is_empty() {
            0.0
        } else {
            speeds.iter().sum::<f32>() / speeds.len() as f32
        };

        let leader_distance = self.agents.first().map_or(0.0, |leader| {
            leader
                .steerable
                .position()
                .distance(Vec3::from_array(self.config.beacon))
        });

        SimSummary {
            frames: self.frame,
            mean_speed,
            max_speed: speeds.iter().copied().fold(0.0, f32::max),
            centroid: self.centroid(),
            leader_distance,
            player_velocity: self.level.bodies.velocity(self.level.player).unwrap_or(Vec3::ZERO),
            player_in_current: self.level.tracker.player_in_currents(),
            light_energy: self.level.energy.current(),
            lights_enabled: self.level.toggle.lights_enabled(),
        }
    }

    fn centroid(&self) -> Vec3 {
        if self.agents.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.agents.iter().map(|agent| agent.steerable.position()).sum();
        sum / self.agents.len() as f32
    }
}

impl Level {
    fn new(config: &SimConfig) -> Self {
        let gameplay = &config.gameplay;
        let mut bodies = MockBodies::new();
        let mut camera = MockCamera::new(Vec3::ZERO);
        let mut particles = MockParticles::new();
        let mut lights = MockLights::default();
        let mut tracker = CurrentTracker::new();

        let player = EntityId::new();
        bodies.insert(player, Vec3::ZERO);

        let mut zone = CurrentZone::new(EntityId::new(), Vec3::ZERO, gameplay.current.clone());
        let mut ctx = SceneContext {
            bodies: &mut bodies,
            camera: &mut camera,
            particles: &mut particles,
            sound: None,
        };
        zone.on_body_enter(player, true, &mut ctx, &mut tracker);

        let mut toggle = PlayerLightToggle::new(gameplay.lights.clone(), &mut lights);
        if !toggle.light_button_pressed() {
            toggle.toggle_lights(&mut lights);
        }

        Self {
            bodies,
            camera,
            particles,
            sound: MockSound::default(),
            lights,
            tracker,
            zone,
            player,
            toggle,
            energy: LightEnergy::new(gameplay.light_energy),
        }
    }

    fn step(&mut self, dt: f32, config: &SimConfig) {
        if let Some(velocity) = self.bodies.velocity(self.player) {
            self.camera.position += velocity * dt;
        }

        let mut ctx = SceneContext {
            bodies: &mut self.bodies,
            camera: &mut self.camera,
            particles: &mut self.particles,
            sound: Some(&mut self.sound),
        };
        self.zone.update(&mut ctx);
        self.bodies.step(dt);
        self.sound.played.clear();

        let gameplay = &config.gameplay;
        self.toggle.deplete_light(
            dt,
            gameplay.light_drain_interval,
            gameplay.light_drain_cost,
            &mut self.energy,
            &mut self.lights,
        );
    }
}
