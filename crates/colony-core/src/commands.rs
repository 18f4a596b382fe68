//! Player commands.
//!
//! Every command validates completely before it mutates anything: a
//! rejected command leaves the colony exactly as it found it. Affordability
//! failures report the shortfall per resource.

use rust_decimal::Decimal;
use tracing::{debug, info};

use colony_types::{BuildingId, BuildingKind, GridPos, ResourceCost, ResourceKind, TechId};
use colony_world::blueprint::{base_cost, cost_of_next_level};
use colony_world::tech::{prerequisite, research_cost};
use colony_world::{Building, WorldError, assignment, blueprint, recipe};

use crate::clock::ClockError;
use crate::colony::Colony;
use crate::jobs::capacity_of;

/// Why a player command was rejected.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The ledger cannot cover a cost.
    #[error("insufficient resources, missing {missing:?}")]
    InsufficientResources {
        /// Shortfall per resource.
        missing: ResourceCost,
    },

    /// The building kind needs a technology not yet researched.
    #[error("{kind} requires {tech:?}")]
    TechLocked {
        /// The kind that was requested.
        kind: BuildingKind,
        /// The missing technology.
        tech: TechId,
    },

    /// The command targets the wrong kind of building.
    #[error("{building} is a {actual}, expected a {expected}")]
    WrongKind {
        /// The building addressed.
        building: BuildingId,
        /// The kind the command works on.
        expected: BuildingKind,
        /// The building's actual kind.
        actual: BuildingKind,
    },

    /// The building has no power switch.
    #[error("{kind} has no power toggle")]
    NoPowerToggle {
        /// The building's kind.
        kind: BuildingKind,
    },

    /// The technology is already known.
    #[error("{tech:?} is already researched")]
    AlreadyResearched {
        /// The technology.
        tech: TechId,
    },

    /// The technology's prerequisite is not yet known.
    #[error("{tech:?} requires {requires:?} first")]
    ResearchLocked {
        /// The technology requested.
        tech: TechId,
        /// Its missing prerequisite.
        requires: TechId,
    },

    /// An enforced storage cap leaves no room for what the command returns.
    #[error("storage is full of {kind}")]
    StorageFull {
        /// The resource that would not fit.
        kind: ResourceKind,
    },

    /// The reward code does not match.
    #[error("invalid reward code")]
    InvalidCode,

    /// The reward code was already redeemed in this colony.
    #[error("reward code already redeemed")]
    CodeAlreadyRedeemed,

    /// No trader is visiting.
    #[error("no trader is visiting")]
    NoTrader,

    /// The trader has no offer at that index.
    #[error("trader has no offer {index}")]
    UnknownOffer {
        /// The index requested.
        index: usize,
    },

    /// More passengers than villagers not yet aboard.
    #[error("cannot board {requested}, only {available} villagers remain")]
    TooManyPassengers {
        /// Passengers requested.
        requested: u32,
        /// Villagers not yet aboard.
        available: u32,
    },

    /// Launch requires the whole colony aboard.
    #[error("only {boarded} of {population} villagers are aboard")]
    CrewIncomplete {
        /// Villagers aboard.
        boarded: u32,
        /// Total population.
        population: u32,
    },

    /// The rocket's launch has already started.
    #[error("{building} is already launching")]
    AlreadyLaunching {
        /// The rocket.
        building: BuildingId,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A time setting was rejected.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

impl Colony {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Pay for and place a new level-1 building.
    pub fn place_building(
        &mut self,
        kind: BuildingKind,
        position: GridPos,
    ) -> Result<BuildingId, CommandError> {
        let tech = blueprint(kind).required_tech;
        if !self.techs.is_unlocked(tech) {
            return Err(CommandError::TechLocked { kind, tech });
        }
        if self.buildings.is_occupied(position) {
            return Err(WorldError::PositionOccupied(position).into());
        }
        let cost = base_cost(kind);
        self.ensure_affordable(&cost)?;

        let id = self.buildings.place(kind, position)?;
        self.ledger.deduct(&cost);
        self.refresh_derived();
        info!(%id, %kind, %position, "Building placed");
        Ok(id)
    }

    /// Demolish a building.
    ///
    /// Its workers become unemployed, its robots return to the robot pool,
    /// and its base cost is refunded up to any enforced cap. Returns what
    /// the refund actually credited. Refused while the robots would not fit
    /// back in the pool.
    pub fn remove_building(&mut self, id: BuildingId) -> Result<ResourceCost, CommandError> {
        let building = self.buildings.require(id)?;
        let kind = building.kind();
        let seated = ResourceCost::new()
            .with(ResourceKind::Robots, Decimal::from(building.robots_assigned()));
        self.ensure_room(&seated)?;

        let released = assignment::release_building(&mut self.buildings, &mut self.workforce, id)?;
        let robots = self.buildings.require_mut(id)?.take_robots();
        self.buildings.remove(id)?;

        self.ledger.add(ResourceKind::Robots, Decimal::from(robots));
        let refund = self.ledger.refund(&base_cost(kind));
        self.refresh_derived();
        info!(%id, %kind, released = released.len(), robots, "Building removed");
        Ok(refund)
    }

    /// Pay for and apply one level.
    ///
    /// The price is the upgrade cost times the current level. Returns the
    /// new level.
    pub fn upgrade_building(&mut self, id: BuildingId) -> Result<u32, CommandError> {
        let building = self.buildings.require(id)?;
        if !building.can_upgrade() {
            return Err(WorldError::LevelCapReached {
                building: id,
                level: building.level(),
            }
            .into());
        }
        let cost = cost_of_next_level(building);
        self.ensure_affordable(&cost)?;

        let level = self.buildings.require_mut(id)?.upgrade()?;
        self.ledger.deduct(&cost);
        info!(%id, level, "Building upgraded");
        Ok(level)
    }

    // -----------------------------------------------------------------------
    // Operation
    // -----------------------------------------------------------------------

    /// Move whole units from a building's buffers into the ledger.
    ///
    /// Fractions stay behind, as does anything an enforced cap has no room
    /// for. Returns what was collected.
    pub fn collect(&mut self, id: BuildingId) -> Result<ResourceCost, CommandError> {
        let ledger = &self.ledger;
        let building = self.buildings.require_mut(id)?;
        let single = recipe(building.kind()).buffered_output();
        let drained = building.drain_whole_units(single, |kind| ledger.headroom(kind));
        let credited = self.ledger.refund(&drained);
        debug_assert_eq!(credited, drained, "collect drained more than the ledger took");
        debug!(%id, resources = drained.len(), "Collected buffer");
        Ok(drained)
    }

    /// Flip a building's power switch.
    pub fn set_power(&mut self, id: BuildingId, on: bool) -> Result<(), CommandError> {
        let building = self.buildings.require_mut(id)?;
        let kind = building.kind();
        if !blueprint(kind).has_power_toggle {
            return Err(CommandError::NoPowerToggle { kind });
        }
        building.set_powered(on);
        debug!(%id, on, "Power toggled");
        Ok(())
    }

    /// Set the worker target for a job kind.
    ///
    /// `-1` means fill every slot. The target keeps applying as buildings
    /// of the kind are placed or upgraded. Returns the target clamped to
    /// `[-1, capacity]` as it applies right now.
    pub fn set_job_target(&mut self, kind: BuildingKind, target: i64) -> Result<i64, CommandError> {
        if !kind.is_job_kind() {
            return Err(WorldError::NotAJobKind(kind).into());
        }
        let stored = self.targets.set(kind, target);
        let applied = self.targets.effective(kind, capacity_of(&self.buildings, kind));
        debug!(%kind, requested = target, stored, applied, "Job target set");
        Ok(applied)
    }

    /// Seat one robot from the pool in a building.
    pub fn assign_robot(&mut self, id: BuildingId) -> Result<(), CommandError> {
        let one = ResourceCost::from_units(&[(ResourceKind::Robots, 1)]);
        self.ensure_affordable(&one)?;
        self.buildings.require_mut(id)?.add_robot()?;
        self.ledger.deduct(&one);
        debug!(%id, "Robot assigned");
        Ok(())
    }

    /// Return one robot from a building to the pool.
    pub fn recall_robot(&mut self, id: BuildingId) -> Result<(), CommandError> {
        self.ensure_room(&ResourceCost::from_units(&[(ResourceKind::Robots, 1)]))?;
        self.buildings.require_mut(id)?.remove_robot()?;
        self.ledger.add(ResourceKind::Robots, Decimal::ONE);
        debug!(%id, "Robot recalled");
        Ok(())
    }

    /// Change the simulation speed (1 or 10).
    pub fn set_time_scale(&mut self, time_scale: u32) -> Result<(), CommandError> {
        self.scheduler.set_time_scale(time_scale)?;
        info!(time_scale, "Time scale changed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Research and trade
    // -----------------------------------------------------------------------

    /// Spend science points on a technology.
    pub fn research(&mut self, tech: TechId) -> Result<(), CommandError> {
        if self.techs.is_unlocked(tech) {
            return Err(CommandError::AlreadyResearched { tech });
        }
        if let Some(requires) = prerequisite(tech).filter(|&p| !self.techs.is_unlocked(p)) {
            return Err(CommandError::ResearchLocked { tech, requires });
        }
        let cost = ResourceCost::new().with(ResourceKind::Science, research_cost(tech));
        self.ensure_affordable(&cost)?;

        self.ledger.deduct(&cost);
        self.techs.unlock(tech);
        info!(?tech, "Technology researched");
        Ok(())
    }

    /// Accept one of the visiting trader's offers.
    pub fn accept_trade(&mut self, index: usize) -> Result<(), CommandError> {
        let trader = self.trader.as_ref().ok_or(CommandError::NoTrader)?;
        let offer = trader
            .offers
            .get(index)
            .ok_or(CommandError::UnknownOffer { index })?;
        self.ensure_affordable(&offer.give)?;
        if let Some((kind, _)) = offer.receive.iter().find(|&(kind, amount)| {
            self.ledger
                .headroom(kind)
                .is_some_and(|room| room.saturating_add(offer.give.get(kind)) < amount)
        }) {
            return Err(CommandError::StorageFull { kind });
        }

        let offer = match self.trader.as_mut() {
            Some(trader) => trader.offers.remove(index),
            None => return Err(CommandError::NoTrader),
        };
        self.ledger.deduct(&offer.give);
        let received = self.ledger.refund(&offer.receive);
        debug_assert_eq!(received, offer.receive, "trade goods clipped by the cap");
        info!(index, "Trade accepted");
        Ok(())
    }

    /// Redeem the one-time reward code. Returns what was credited.
    pub fn redeem_code(&mut self, code: &str) -> Result<ResourceCost, CommandError> {
        if self.code_redeemed {
            return Err(CommandError::CodeAlreadyRedeemed);
        }
        if code.trim() != self.config.rewards.code {
            return Err(CommandError::InvalidCode);
        }
        let credited = self.ledger.refund(&self.config.rewards.grant());
        self.code_redeemed = true;
        info!(resources = credited.len(), "Reward code redeemed");
        Ok(credited)
    }

    // -----------------------------------------------------------------------
    // Rocket
    // -----------------------------------------------------------------------

    /// Board `count` more villagers, paying the per-passenger cost for each.
    ///
    /// Returns the number now aboard.
    pub fn board_rocket(&mut self, id: BuildingId, count: u32) -> Result<u32, CommandError> {
        let rocket = self.require_rocket(id)?;
        let boarded = rocket.rocket().boarded;
        let available = self.population_u32().saturating_sub(boarded);
        if count > available {
            return Err(CommandError::TooManyPassengers {
                requested: count,
                available,
            });
        }
        let cost = self.config.rocket.passenger_cost().scaled(Decimal::from(count));
        self.ensure_affordable(&cost)?;

        self.ledger.deduct(&cost);
        let state = self.buildings.require_mut(id)?.rocket_mut();
        state.boarded = state.boarded.saturating_add(count);
        info!(%id, boarded = state.boarded, "Passengers boarded");
        Ok(state.boarded)
    }

    /// Start the launch countdown. Everyone must be aboard.
    pub fn launch_rocket(&mut self, id: BuildingId) -> Result<(), CommandError> {
        let rocket = self.require_rocket(id)?;
        let state = *rocket.rocket();
        if state.is_launching {
            return Err(CommandError::AlreadyLaunching { building: id });
        }
        let population = self.population_u32();
        if population == 0 || state.boarded < population {
            return Err(CommandError::CrewIncomplete {
                boarded: state.boarded,
                population,
            });
        }

        self.buildings.require_mut(id)?.rocket_mut().is_launching = true;
        info!(%id, population, "Launch sequence started");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn ensure_affordable(&self, cost: &ResourceCost) -> Result<(), CommandError> {
        if self.ledger.has(cost) {
            return Ok(());
        }
        let missing = cost
            .iter()
            .map(|(kind, amount)| (kind, amount.saturating_sub(self.ledger.quantity(kind))))
            .collect();
        Err(CommandError::InsufficientResources { missing })
    }

    fn ensure_room(&self, credit: &ResourceCost) -> Result<(), CommandError> {
        match credit
            .iter()
            .find(|&(kind, amount)| self.ledger.headroom(kind).is_some_and(|room| room < amount))
        {
            Some((kind, _)) => Err(CommandError::StorageFull { kind }),
            None => Ok(()),
        }
    }

    fn require_rocket(&self, id: BuildingId) -> Result<&Building, CommandError> {
        let building = self.buildings.require(id)?;
        if building.kind() == BuildingKind::Rocket {
            Ok(building)
        } else {
            Err(CommandError::WrongKind {
                building: id,
                expected: BuildingKind::Rocket,
                actual: building.kind(),
            })
        }
    }

    fn population_u32(&self) -> u32 {
        u32::try_from(self.workforce.len()).unwrap_or(u32::MAX)
    }
}
