//! Engine binary for the GridChase simulation.
//!
//! Wires the configuration, world setup, stock policies, and the bounded
//! run loop together and runs the chase until a bound is hit (or forever,
//! when both bounds are 0).
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gridchase-config.yaml` (or the path in
//!    `GRIDCHASE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the world: maze, roster, starting rewards
//! 4. Run the chase loop
//! 5. Log the result

mod error;
mod terminal;

use std::path::PathBuf;
use std::time::Duration;

use gridchase_core::config::SimulationConfig;
use gridchase_core::decision::ScriptedPolicy;
use gridchase_core::render::{NoOpRenderer, Renderer};
use gridchase_core::runner::{self, RunBounds};
use gridchase_core::setup::EpisodeSetup;
use gridchase_world::is_connected;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::terminal::TerminalRenderer;

/// Environment variable naming an alternative config file.
const CONFIG_ENV: &str = "GRIDCHASE_CONFIG";

/// Config file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "gridchase-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, setup, or the run loop fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so where it came from
    //    is reported after step 2.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("gridchase-engine starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        size = config.world.size,
        wall_ratio = config.world.wall_ratio,
        seed = config.world.seed,
        agents = config.agents.len(),
        initial_rewards = config.world.initial_rewards,
        "World parameters"
    );

    // 3. Build the world.
    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let mut manager = EpisodeSetup::from_config(&config)
        .build(&mut rng)
        .map_err(EngineError::from)?;
    info!(
        connected = is_connected(manager.world()),
        passable = manager.world().passable_count(),
        "World ready"
    );

    // 4. Run the chase.
    let mut policy = ScriptedPolicy::new(StdRng::seed_from_u64(config.world.seed.wrapping_add(1)));
    let bounds = RunBounds::new(config.run.max_ticks, config.run.max_episodes)
        .with_tick_interval(Duration::from_millis(config.run.tick_interval_ms));
    let mut terminal = TerminalRenderer::new();
    let mut silent = NoOpRenderer;
    let renderer: &mut dyn Renderer = if config.run.render {
        &mut terminal
    } else {
        &mut silent
    };

    let result = runner::run_simulation(&mut manager, &mut policy, bounds, renderer)
        .map_err(EngineError::from)?;

    // 5. Log results.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "gridchase-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// `GRIDCHASE_CONFIG` names the file when set, and must then exist.
/// Otherwise `gridchase-config.yaml` in the working directory is used if
/// present, and built-in defaults if not. Returns the path actually read.
fn load_config() -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        let config = SimulationConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }

    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((SimulationConfig::default(), None))
    }
}
