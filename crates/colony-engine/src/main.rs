//! Headless engine binary for the colony economy simulation.
//!
//! Wires configuration, logging, the colony, and the real-time frame loop
//! together, then writes a final snapshot if one is configured.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `colony-config.yaml` (or the path given as
//!    the first argument); defaults when the file is missing
//! 2. Initialize structured logging (tracing)
//! 3. Found the colony and seed the dice
//! 4. Run the frame loop until the tick limit, a launch, or Ctrl-C
//! 5. Log the result and write the final snapshot

mod error;
mod runner;

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use colony_core::config::LoggingConfig;
use colony_core::{Colony, SeededDice, SimulationConfig};

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "colony-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, colony creation, a tick, or the
/// final snapshot fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        path = %config_path.display(),
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        time_scale = config.world.time_scale,
        cycle_length_ticks = config.world.cycle_length_ticks,
        "Configuration loaded"
    );

    // 3. Found the colony.
    let mut dice = SeededDice::new(config.world.seed);
    let max_ticks = config.world.max_ticks;
    let snapshot_path = config.logging.snapshot_path.clone();
    let mut colony = Colony::new(config)?;

    // 4. Run.
    let result = runner::run(&mut colony, &mut dice, max_ticks, runner::FRAME).await?;

    // 5. Report and persist.
    runner::log_run_end(&result);
    if let Some(path) = snapshot_path {
        let json = colony.snapshot().to_json()?;
        std::fs::write(&path, json)?;
        info!(path = %path, "Final snapshot written");
    }

    info!("colony-engine shutdown complete");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), EngineError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", config.level),
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
