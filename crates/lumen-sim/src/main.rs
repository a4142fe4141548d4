//! # Lumen Sim
//!
//! Headless driver for Lumen's NPC steering and gameplay systems.
//!
//! Usage: `lumen-sim [config.toml]`. A named file that does not exist yet is
//! created with the defaults. Without a path, `lumen.toml` in the working
//! directory is used if present.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod sim;

use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::SimConfig;
use crate::sim::Simulation;

const DEFAULT_CONFIG_PATH: &str = "lumen.toml";

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("lumen=info".parse()?))
        .init();

    info!("Lumen sim starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) if Path::new(&path).exists() => SimConfig::load_from(&path)?,
        Some(path) => {
            let config = SimConfig::default();
            config.save_to(&path)?;
            info!("Wrote default config to {path}");
            config
        },
        None => SimConfig::load_or_default(DEFAULT_CONFIG_PATH),
    };
    info!(
        "Running {} frames at dt={:.4} with {} agents",
        config.frames, config.fixed_dt, config.agent_count
    );

    let mut simulation = Simulation::new(config)?;
    let summary = simulation.run();

    info!(
        "Finished {} frames: mean speed {:.2}, max speed {:.2}, centroid {:?}",
        summary.frames, summary.mean_speed, summary.max_speed, summary.centroid
    );
    info!("Leader is {:.2} from the beacon", summary.leader_distance);
    info!(
        "Player velocity {:?} (in current: {}), light energy {:.1}, lights {}",
        summary.player_velocity,
        summary.player_in_current,
        summary.light_energy,
        if summary.lights_enabled { "on" } else { "off" }
    );

    info!("Lumen sim shutdown complete");
    Ok(())
}
