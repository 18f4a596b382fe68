//! Buildings, workforce, recipes, and technology for the colony simulation.
//!
//! This crate models what exists in the colony and the static tables that
//! describe it. It does not advance time; the tick engine in `colony-core`
//! drives everything here.
//!
//! # Modules
//!
//! - [`assignment`] -- The only place the worker/building relation is
//!   mutated: hire, fire, and release-on-demolition.
//! - [`blueprint`] -- Per-kind base costs, upgrade costs, tech gates, and
//!   flags (robots, power toggle, happiness).
//! - [`building`] -- [`Building`]: level, staff, buffers, history, power.
//! - [`error`] -- Error types for world operations.
//! - [`history`] -- Rolling per-tick and per-day production series.
//! - [`recipe`] -- Per-kind production recipes as tagged variants.
//! - [`registry`] -- [`BuildingRegistry`]: buildings in registration order.
//! - [`tech`] -- [`TechUnlockRegistry`] and the research tree.
//! - [`workforce`] -- [`Worker`] and [`WorkforcePool`].

pub mod assignment;
pub mod blueprint;
pub mod building;
pub mod error;
pub mod history;
pub mod recipe;
pub mod registry;
pub mod tech;
pub mod workforce;

// Re-export primary types at crate root.
pub use blueprint::{Blueprint, blueprint};
pub use building::{Building, HOUSING_PER_LEVEL, MAX_LEVEL, RocketState, SLOTS_PER_LEVEL};
pub use error::WorldError;
pub use history::HistorySeries;
pub use recipe::{ChanceOutput, ConversionStage, Recipe, SimpleRecipe, recipe};
pub use registry::BuildingRegistry;
pub use tech::TechUnlockRegistry;
pub use workforce::{Employment, Worker, WorkforcePool};
