//! The colony: every piece of simulation state in one owner.
//!
//! [`Colony`] is passed explicitly to the tick and to every player command;
//! nothing reaches global state. Fields are crate-visible so that the tick
//! phases can borrow disjoint parts at once.

use tracing::info;

use colony_ledger::ResourceLedger;
use colony_types::{BuildingKind, GridPos, ResourceKind};
use colony_world::{BuildingRegistry, TechUnlockRegistry, WorkforcePool};

use crate::clock::WorldClock;
use crate::config::SimulationConfig;
use crate::dice::Dice;
use crate::events::Trader;
use crate::jobs::JobTargets;
use crate::modifiers::{GlobalModifiers, storage_cap};
use crate::scheduler::TickScheduler;
use crate::tick::{TickError, TickSummary, run_tick};

/// Complete simulation state.
#[derive(Debug, Clone)]
pub struct Colony {
    pub(crate) config: SimulationConfig,
    pub(crate) clock: WorldClock,
    pub(crate) scheduler: TickScheduler,
    pub(crate) ledger: ResourceLedger,
    pub(crate) techs: TechUnlockRegistry,
    pub(crate) buildings: BuildingRegistry,
    pub(crate) workforce: WorkforcePool,
    pub(crate) targets: JobTargets,
    pub(crate) modifiers: GlobalModifiers,
    pub(crate) trader: Option<Trader>,
    pub(crate) launched: bool,
    pub(crate) code_redeemed: bool,
}

impl Colony {
    /// Found a new colony from configuration.
    ///
    /// Starting buildings are placed free of charge, starting workers spawn
    /// unemployed at the first house (or the origin when there is none).
    pub fn new(config: SimulationConfig) -> Result<Self, TickError> {
        config.validate()?;
        let mut colony = Self::empty(config)?;

        colony.ledger = ResourceLedger::with_stock(&colony.config.world.starting_stock());
        colony.ledger.set_cap_enforced(colony.config.storage.enforce_cap);

        for &tech in &colony.config.world.starting_techs {
            colony.techs.unlock(tech);
        }
        for start in &colony.config.world.starting_buildings {
            let id = colony.buildings.place(start.kind, start.position())?;
            colony.buildings.require_mut(id)?.set_level(start.level);
        }

        let home = colony
            .buildings
            .of_kind(BuildingKind::House)
            .next()
            .map(|house| (house.id(), house.position()));
        let position = home.map_or(GridPos::default(), |(_, position)| position);
        for _ in 0..colony.config.population.initial_workers {
            colony.workforce.spawn(position)?;
            if let Some((house, _)) = home {
                colony.buildings.require_mut(house)?.add_resident();
            }
        }

        colony.refresh_derived();
        info!(
            buildings = colony.buildings.len(),
            population = colony.workforce.len(),
            wood = %colony.ledger.quantity(ResourceKind::Wood),
            "Colony founded"
        );
        Ok(colony)
    }

    /// A colony with no buildings, workers, or stock.
    pub(crate) fn empty(config: SimulationConfig) -> Result<Self, TickError> {
        let clock = WorldClock::new(config.world.cycle_length_ticks)?;
        let scheduler = TickScheduler::new(config.world.tick_interval_ms, config.world.time_scale)?;
        let mut ledger = ResourceLedger::new();
        ledger.set_cap_enforced(config.storage.enforce_cap);
        Ok(Self {
            config,
            clock,
            scheduler,
            ledger,
            techs: TechUnlockRegistry::new(),
            buildings: BuildingRegistry::new(),
            workforce: WorkforcePool::new(),
            targets: JobTargets::new(),
            modifiers: GlobalModifiers::default(),
            trader: None,
            launched: false,
            code_redeemed: false,
        })
    }

    /// Recompute happiness and the storage cap from the census.
    pub(crate) fn refresh_derived(&mut self) {
        self.modifiers.recompute_happiness(&self.buildings);
        self.ledger
            .set_storage_cap(storage_cap(&self.buildings, &self.config.storage));
    }

    // -----------------------------------------------------------------------
    // Driving time
    // -----------------------------------------------------------------------

    /// Run exactly one tick.
    pub fn tick(&mut self, dice: &mut dyn Dice) -> Result<TickSummary, TickError> {
        run_tick(self, dice)
    }

    /// Account for one frame of real time; runs a tick when one is due.
    pub fn frame(
        &mut self,
        elapsed_ms: u64,
        dice: &mut dyn Dice,
    ) -> Result<Option<TickSummary>, TickError> {
        if self.scheduler.advance(elapsed_ms) {
            run_tick(self, dice).map(Some)
        } else {
            Ok(None)
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Active configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulated time.
    pub const fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Real-time pacing.
    pub const fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Resource stock.
    pub const fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Resource stock, for hosts that grant or remove resources directly.
    pub const fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    /// Unlocked technologies.
    pub const fn techs(&self) -> &TechUnlockRegistry {
        &self.techs
    }

    /// Placed buildings.
    pub const fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    /// Villagers.
    pub const fn workforce(&self) -> &WorkforcePool {
        &self.workforce
    }

    /// Job targets.
    pub const fn targets(&self) -> &JobTargets {
        &self.targets
    }

    /// Happiness and food efficiency.
    pub const fn modifiers(&self) -> &GlobalModifiers {
        &self.modifiers
    }

    /// Happiness and food efficiency, for hosts that script scenarios.
    pub const fn modifiers_mut(&mut self) -> &mut GlobalModifiers {
        &mut self.modifiers
    }

    /// The visiting trader, if any.
    pub const fn trader(&self) -> Option<&Trader> {
        self.trader.as_ref()
    }

    /// Whether a rocket has completed its launch.
    pub const fn has_launched(&self) -> bool {
        self.launched
    }

    /// Whether the reward code has been redeemed.
    pub const fn has_redeemed_code(&self) -> bool {
        self.code_redeemed
    }

    /// Total villagers.
    pub fn population(&self) -> usize {
        self.workforce.len()
    }
}
