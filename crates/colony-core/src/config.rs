//! Configuration loading and typed config structures for the colony
//! simulation.
//!
//! The canonical configuration lives in `colony-config.yaml` at the project
//! root. Every section and every field has a default, so an empty document
//! yields the reference tuning. [`SimulationConfig::from_file`] and
//! [`SimulationConfig::parse`] validate after parsing.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use colony_types::{BuildingKind, GridPos, ResourceCost, ResourceKind, TechId};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `colony-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Seed, timing, and starting layout.
    #[serde(default)]
    pub world: WorldConfig,

    /// Housing growth.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Happiness and food efficiency tuning.
    #[serde(default)]
    pub modifiers: ModifiersConfig,

    /// Storage cap tuning.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Warehouse proximity bonus.
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Random day events.
    #[serde(default)]
    pub events: EventsConfig,

    /// Rocket boarding and launch.
    #[serde(default)]
    pub rocket: RocketConfig,

    /// One-time reward code.
    #[serde(default)]
    pub rewards: RewardsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every range constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.world.time_scale, 1 | 10) {
            return Err(invalid("world.time_scale", "must be 1 or 10"));
        }
        if self.world.tick_interval_ms == 0 {
            return Err(invalid("world.tick_interval_ms", "must be at least 1"));
        }
        if self.world.cycle_length_ticks < 2 {
            return Err(invalid("world.cycle_length_ticks", "must be at least 2"));
        }
        if self.modifiers.ticks_per_minute == 0 {
            return Err(invalid("modifiers.ticks_per_minute", "must be at least 1"));
        }
        check_probability("population.spawn_probability", self.population.spawn_probability)?;
        check_probability("events.trader_chance", self.events.trader_chance)?;

        let non_negative = [
            ("modifiers.happiness_bonus_per_percent", self.modifiers.happiness_bonus_per_percent),
            ("modifiers.food_efficiency_step", self.modifiers.food_efficiency_step),
            ("modifiers.food_per_worker_per_minute", self.modifiers.food_per_worker_per_minute),
            ("storage.base_cap", self.storage.base_cap),
            ("storage.per_warehouse", self.storage.per_warehouse),
            ("warehouse.bonus", self.warehouse.bonus),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(invalid(field, "must not be negative"));
            }
        }
        if self.rewards.grant.values().any(|q| *q < Decimal::ZERO) {
            return Err(invalid("rewards.grant", "quantities must not be negative"));
        }
        if self.world.starting_resources.values().any(|q| *q < Decimal::ZERO) {
            return Err(invalid("world.starting_resources", "quantities must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

fn check_probability(field: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(field, "must be within [0, 1]"))
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Seed, timing, and starting layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick at 1x speed.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Speed multiplier: 1 or 10.
    #[serde(default = "default_time_scale")]
    pub time_scale: u32,

    /// Ticks in one day/night cycle.
    #[serde(default = "default_cycle_length_ticks")]
    pub cycle_length_ticks: u64,

    /// Stop after this many ticks; run until interrupted when absent.
    #[serde(default)]
    pub max_ticks: Option<u64>,

    /// Ledger contents at the start of a new colony.
    #[serde(default = "default_starting_resources")]
    pub starting_resources: BTreeMap<ResourceKind, Decimal>,

    /// Buildings placed free of charge at the start.
    #[serde(default = "default_starting_buildings")]
    pub starting_buildings: Vec<StartingBuilding>,

    /// Technologies known at the start, besides woodworking.
    #[serde(default)]
    pub starting_techs: Vec<TechId>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            time_scale: default_time_scale(),
            cycle_length_ticks: default_cycle_length_ticks(),
            max_ticks: None,
            starting_resources: default_starting_resources(),
            starting_buildings: default_starting_buildings(),
            starting_techs: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Starting resources as a cost bundle.
    pub fn starting_stock(&self) -> ResourceCost {
        self.starting_resources
            .iter()
            .map(|(&kind, &amount)| (kind, amount))
            .collect()
    }
}

/// A building placed at colony creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StartingBuilding {
    /// Building kind.
    pub kind: BuildingKind,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Starting level.
    #[serde(default = "default_level")]
    pub level: u32,
}

impl StartingBuilding {
    /// Tile position.
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// Housing growth.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Per-tick chance that a house below capacity gains a villager.
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,

    /// Unemployed villagers present at the start.
    #[serde(default)]
    pub initial_workers: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            spawn_probability: default_spawn_probability(),
            initial_workers: 0,
        }
    }
}

/// Happiness and food efficiency tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModifiersConfig {
    /// Production bonus per happiness percent.
    #[serde(default = "default_happiness_bonus")]
    pub happiness_bonus_per_percent: Decimal,

    /// Food efficiency change per simulated minute.
    #[serde(default = "default_food_step")]
    pub food_efficiency_step: Decimal,

    /// Ticks in a simulated minute.
    #[serde(default = "default_ticks_per_minute")]
    pub ticks_per_minute: u64,

    /// Food eaten per villager per simulated minute.
    #[serde(default = "default_food_per_worker")]
    pub food_per_worker_per_minute: Decimal,
}

impl Default for ModifiersConfig {
    fn default() -> Self {
        Self {
            happiness_bonus_per_percent: default_happiness_bonus(),
            food_efficiency_step: default_food_step(),
            ticks_per_minute: default_ticks_per_minute(),
            food_per_worker_per_minute: default_food_per_worker(),
        }
    }
}

/// Storage cap tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Cap with no warehouses.
    #[serde(default = "default_base_cap")]
    pub base_cap: Decimal,

    /// Cap added by each warehouse.
    #[serde(default = "default_per_warehouse")]
    pub per_warehouse: Decimal,

    /// Clamp ledger credits to the cap.
    #[serde(default)]
    pub enforce_cap: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_cap: default_base_cap(),
            per_warehouse: default_per_warehouse(),
            enforce_cap: false,
        }
    }
}

/// Warehouse proximity bonus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarehouseConfig {
    /// Multiplier added per qualifying warehouse.
    #[serde(default = "default_warehouse_bonus")]
    pub bonus: Decimal,

    /// Chebyshev radius in tiles.
    #[serde(default = "default_warehouse_radius")]
    pub radius: u32,

    /// Staff a warehouse needs before it counts.
    #[serde(default = "default_warehouse_staff")]
    pub staff_threshold: u32,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            bonus: default_warehouse_bonus(),
            radius: default_warehouse_radius(),
            staff_threshold: default_warehouse_staff(),
        }
    }
}

/// Random day events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventsConfig {
    /// Chance a trader arrives at each day rollover.
    #[serde(default = "default_trader_chance")]
    pub trader_chance: f64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            trader_chance: default_trader_chance(),
        }
    }
}

/// Rocket boarding and launch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RocketConfig {
    /// Charged per villager boarded.
    #[serde(default = "default_passenger_cost")]
    pub passenger_cost: BTreeMap<ResourceKind, Decimal>,

    /// Ticks from ignition to lift-off.
    #[serde(default = "default_launch_ticks")]
    pub launch_ticks: u32,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            passenger_cost: default_passenger_cost(),
            launch_ticks: default_launch_ticks(),
        }
    }
}

impl RocketConfig {
    /// Passenger cost as a cost bundle.
    pub fn passenger_cost(&self) -> ResourceCost {
        self.passenger_cost
            .iter()
            .map(|(&kind, &amount)| (kind, amount))
            .collect()
    }
}

/// The reward code a player can redeem once per colony.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardsConfig {
    /// The code to type.
    #[serde(default = "default_reward_code")]
    pub code: String,

    /// Resources granted on redemption.
    #[serde(default = "default_reward_grant")]
    pub grant: BTreeMap<ResourceKind, Decimal>,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            code: default_reward_code(),
            grant: default_reward_grant(),
        }
    }
}

impl RewardsConfig {
    /// The grant as a cost bundle.
    pub fn grant(&self) -> ResourceCost {
        self.grant.iter().map(|(&kind, &amount)| (kind, amount)).collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (`RUST_LOG` overrides it).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Write the final colony snapshot here on shutdown.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            snapshot_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde's `default = "..."` attribute)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_time_scale() -> u32 {
    1
}

const fn default_cycle_length_ticks() -> u64 {
    1200
}

fn default_starting_resources() -> BTreeMap<ResourceKind, Decimal> {
    BTreeMap::from([
        (ResourceKind::Wood, Decimal::TEN),
        (ResourceKind::Stone, Decimal::TEN),
        (ResourceKind::Iron, Decimal::TEN),
    ])
}

fn default_starting_buildings() -> Vec<StartingBuilding> {
    vec![
        StartingBuilding {
            kind: BuildingKind::House,
            x: 0,
            y: 0,
            level: 1,
        },
        StartingBuilding {
            kind: BuildingKind::LoggingWorkshop,
            x: 3,
            y: 0,
            level: 1,
        },
    ]
}

const fn default_level() -> u32 {
    1
}

fn default_spawn_probability() -> f64 {
    1.0 / 6.0
}

fn default_happiness_bonus() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_food_step() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

const fn default_ticks_per_minute() -> u64 {
    60
}

fn default_food_per_worker() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

fn default_base_cap() -> Decimal {
    Decimal::from(500)
}

fn default_per_warehouse() -> Decimal {
    Decimal::from(250)
}

fn default_warehouse_bonus() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

const fn default_warehouse_radius() -> u32 {
    5
}

const fn default_warehouse_staff() -> u32 {
    3
}

const fn default_trader_chance() -> f64 {
    0.25
}

fn default_passenger_cost() -> BTreeMap<ResourceKind, Decimal> {
    BTreeMap::from([
        (ResourceKind::Wood, Decimal::TEN),
        (ResourceKind::Stone, Decimal::TEN),
        (ResourceKind::Iron, Decimal::TEN),
    ])
}

const fn default_launch_ticks() -> u32 {
    30
}

fn default_reward_code() -> String {
    "baconwithcherries".to_owned()
}

fn default_reward_grant() -> BTreeMap<ResourceKind, Decimal> {
    let amount = Decimal::from(1500);
    BTreeMap::from([
        (ResourceKind::Wood, amount),
        (ResourceKind::Stone, amount),
        (ResourceKind::Iron, amount),
    ])
}

fn default_log_level() -> String {
    "info".to_owned()
}
