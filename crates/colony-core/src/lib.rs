//! Tick engine and player commands for the colony economy simulation.
//!
//! This crate owns simulated time. A [`Colony`] holds the ledger, the
//! buildings, the workforce, and the global modifiers; [`run_tick`] advances
//! it by one tick through a fixed sequence of phases, and the command
//! methods on [`Colony`] apply player actions between ticks.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter, time of day, and day counter.
//! - [`colony`] -- [`Colony`]: every piece of simulation state.
//! - [`commands`] -- Validated player actions on a [`Colony`].
//! - [`config`] -- YAML configuration with serde defaults.
//! - [`dice`] -- Injectable randomness for spawning, smelting, and traders.
//! - [`events`] -- Day events and the per-tick event log.
//! - [`jobs`] -- Job targets and the greedy worker allocator.
//! - [`modifiers`] -- Happiness, food efficiency, storage cap, warehouse
//!   bonus.
//! - [`production`] -- The per-building production engine.
//! - [`scheduler`] -- Real-time pacing with a 1x/10x speed multiplier.
//! - [`snapshot`] -- Serializable whole-colony snapshots.
//! - [`spawn`] -- Population growth from housing.
//! - [`tick`] -- The tick cycle and its summary.

pub mod clock;
pub mod colony;
pub mod commands;
pub mod config;
pub mod dice;
pub mod events;
pub mod jobs;
pub mod modifiers;
pub mod production;
pub mod scheduler;
pub mod snapshot;
pub mod spawn;
pub mod tick;

// Re-export primary types at crate root.
pub use clock::{ClockError, ClockStep, WorldClock};
pub use colony::Colony;
pub use commands::CommandError;
pub use config::{ConfigError, SimulationConfig};
pub use dice::{Dice, FixedDice, ScriptedDice, SeededDice};
pub use events::{TickEvent, TradeOffer, Trader};
pub use jobs::{AllocationReport, FILL, JobTargets};
pub use modifiers::GlobalModifiers;
pub use production::{ProductionContext, ProductionReport};
pub use scheduler::TickScheduler;
pub use snapshot::{ColonySnapshot, SnapshotError};
pub use tick::{TickError, TickSummary, run_tick};
