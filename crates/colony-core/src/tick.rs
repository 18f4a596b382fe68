//! The tick cycle.
//!
//! Each tick runs five phases in a fixed order:
//!
//! 1. **Clock** -- Advance time. On a day rollover, roll every building's
//!    history, send the trader away, and roll for a new one.
//! 2. **Modifiers** -- Recompute happiness and the storage cap; feed the
//!    population once per simulated minute.
//! 3. **Allocation** -- Move workers toward the job targets.
//! 4. **Production** -- Run every building once, in registration order.
//! 5. **Spawning** -- Houses below capacity roll for a new villager.
//!
//! The ledger's flow journal is cleared before phase 1 and taken after
//! phase 5, so [`TickSummary::flows`] covers exactly this tick.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use colony_ledger::FlowJournal;

use crate::clock::ClockError;
use crate::colony::Colony;
use crate::config::ConfigError;
use crate::dice::Dice;
use crate::events::{TickEvent, roll_trader};
use crate::jobs::allocate;
use crate::production::{ProductionContext, ProductionReport, run_production};
use crate::spawn::run_spawns;

use colony_world::WorldError;

/// Errors that abort a tick or colony creation.
///
/// Scarcity never produces one of these; they indicate exhausted counters
/// or invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Configuration is out of range.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick that ran.
    pub tick: u64,
    /// Current day.
    pub day: u64,
    /// Position within the day/night cycle after this tick.
    pub time_of_day: u64,
    /// Happiness percent used by production.
    pub happiness_percent: u32,
    /// Food efficiency used by production.
    pub food_efficiency: Decimal,
    /// Food eaten this tick (zero outside feeding ticks).
    pub food_eaten: Decimal,
    /// Villagers after spawning.
    pub population: usize,
    /// Villagers without a job after allocation and spawning.
    pub unemployed: usize,
    /// Workers hired by the allocator.
    pub hires: usize,
    /// Workers fired by the allocator.
    pub fires: usize,
    /// Villagers spawned.
    pub spawns: usize,
    /// Production outcome.
    pub production: ProductionReport,
    /// Ledger credits and debits during the tick.
    pub flows: FlowJournal,
    /// Notable events.
    pub events: Vec<TickEvent>,
}

/// Run one tick of the simulation.
pub fn run_tick(colony: &mut Colony, dice: &mut dyn Dice) -> Result<TickSummary, TickError> {
    colony.ledger.take_flows();
    let mut events = Vec::new();

    // --- Phase 1: Clock ---
    let step = colony.clock.advance()?;
    if step.new_day {
        start_day(colony, dice, &mut events);
    }

    // --- Phase 2: Modifiers ---
    colony.refresh_derived();
    let food_eaten = colony.modifiers.feed(
        step.tick,
        colony.workforce.len(),
        &mut colony.ledger,
        &colony.config.modifiers,
    );

    // --- Phase 3: Allocation ---
    let allocation = allocate(&mut colony.buildings, &mut colony.workforce, &colony.targets)?;

    // --- Phase 4: Production ---
    let ctx = ProductionContext {
        modifiers: &colony.modifiers,
        techs: &colony.techs,
        config: &colony.config,
    };
    let production = run_production(&mut colony.buildings, &mut colony.ledger, &ctx, dice);
    if let Some(building) = production.launched {
        colony.launched = true;
        events.push(TickEvent::RocketLaunched { building });
    }

    // --- Phase 5: Spawning ---
    let spawned = run_spawns(
        &mut colony.buildings,
        &mut colony.workforce,
        colony.config.population.spawn_probability,
        dice,
    )?;

    let summary = TickSummary {
        tick: step.tick,
        day: colony.clock.day(),
        time_of_day: colony.clock.time_of_day(),
        happiness_percent: colony.modifiers.happiness_percent,
        food_efficiency: colony.modifiers.food_efficiency,
        food_eaten,
        population: colony.workforce.len(),
        unemployed: colony.workforce.unemployed_count(),
        hires: allocation.hired.len(),
        fires: allocation.fired.len(),
        spawns: spawned.len(),
        production,
        flows: colony.ledger.take_flows(),
        events,
    };
    debug!(
        tick = summary.tick,
        population = summary.population,
        active = summary.production.active,
        "Tick complete"
    );
    Ok(summary)
}

/// Day rollover: history buckets, trader departure and arrival.
fn start_day(colony: &mut Colony, dice: &mut dyn Dice, events: &mut Vec<TickEvent>) {
    let day = colony.clock.day();
    for building in colony.buildings.iter_mut() {
        building.roll_history();
    }
    events.push(TickEvent::DayStarted { day });

    if colony.trader.take().is_some() {
        events.push(TickEvent::TraderDeparted);
    }
    if let Some(trader) = roll_trader(dice, colony.config.events.trader_chance, day) {
        events.push(TickEvent::TraderArrived {
            offers: trader.offers.len(),
        });
        colony.trader = Some(trader);
    }

    info!(
        day,
        population = colony.workforce.len(),
        happiness = colony.modifiers.happiness_percent,
        food_efficiency = %colony.modifiers.food_efficiency,
        trader = colony.trader.is_some(),
        "Day started"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use colony_types::{BuildingKind, ResourceKind};

    use super::*;
    use crate::config::{SimulationConfig, StartingBuilding};
    use crate::dice::{FixedDice, ScriptedDice};

    fn config_with(buildings: &[BuildingKind], workers: u32) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.starting_buildings = buildings
            .iter()
            .zip((0..).step_by(2))
            .map(|(&kind, x)| StartingBuilding {
                kind,
                x,
                y: 0,
                level: 1,
            })
            .collect();
        config.population.initial_workers = workers;
        config.world.cycle_length_ticks = 4;
        config
    }

    #[test]
    fn first_tick_hires_and_produces() {
        let mut colony = Colony::new(config_with(&[BuildingKind::LoggingWorkshop], 3)).unwrap();
        let summary = run_tick(&mut colony, &mut FixedDice::never()).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.hires, 3);
        assert_eq!(summary.unemployed, 0);
        assert_eq!(colony.ledger().quantity(ResourceKind::Wood), dec!(10.1));
        assert_eq!(summary.flows.get(ResourceKind::Wood).credited, dec!(0.1));
    }

    #[test]
    fn day_rollover_rolls_history_and_emits_event() {
        let mut colony = Colony::new(config_with(&[BuildingKind::LoggingWorkshop], 0)).unwrap();
        let mut dice = FixedDice::never();
        for _ in 0..3 {
            let summary = run_tick(&mut colony, &mut dice).unwrap();
            assert!(summary.events.is_empty());
        }
        let summary = run_tick(&mut colony, &mut dice).unwrap();
        assert_eq!(summary.day, 2);
        assert_eq!(summary.events, vec![TickEvent::DayStarted { day: 2 }]);
        let workshop = colony.buildings().iter().next().unwrap();
        assert_eq!(workshop.history().days().len(), 2);
    }

    #[test]
    fn trader_arrives_and_leaves_on_rollovers() {
        let mut colony = Colony::new(config_with(&[], 0)).unwrap();
        // Ticks 1..=3 roll nothing (no houses). Tick 4: trader roll hits.
        let mut dice = ScriptedDice::new(vec![true]).with_picks(vec![0, 0, 0]);
        for _ in 0..4 {
            run_tick(&mut colony, &mut dice).unwrap();
        }
        assert_eq!(colony.trader().map(|t| t.offers.len()), Some(3));

        for _ in 0..3 {
            run_tick(&mut colony, &mut dice).unwrap();
        }
        let summary = run_tick(&mut colony, &mut dice).unwrap();
        assert!(summary.events.contains(&TickEvent::TraderDeparted));
        assert!(colony.trader().is_none());
    }

    #[test]
    fn spawning_grows_population() {
        let mut colony = Colony::new(config_with(&[BuildingKind::House], 0)).unwrap();
        let summary = run_tick(&mut colony, &mut FixedDice::always()).unwrap();
        assert_eq!(summary.spawns, 1);
        assert_eq!(summary.population, 1);
        assert_eq!(summary.unemployed, 1);
    }

    #[test]
    fn feeding_happens_on_minute_boundaries() {
        let mut config = config_with(&[], 20);
        config.modifiers.ticks_per_minute = 2;
        config.world.starting_resources.insert(ResourceKind::Food, dec!(10));
        let mut colony = Colony::new(config).unwrap();
        let mut dice = FixedDice::never();

        let first = run_tick(&mut colony, &mut dice).unwrap();
        assert_eq!(first.food_eaten, Decimal::ZERO);
        let second = run_tick(&mut colony, &mut dice).unwrap();
        assert_eq!(second.food_eaten, dec!(1.00));
        assert_eq!(colony.ledger().quantity(ResourceKind::Food), dec!(9));
        assert_eq!(second.flows.get(ResourceKind::Food).debited, dec!(1.00));
    }
}
