//! The production engine.
//!
//! Runs once per tick over every building in registration order and
//! dispatches on the building's [`Recipe`]:
//!
//! - **Housing** overwrites its history with current occupancy.
//! - **Simple / Knowledge** produce
//!   `per_worker * level * staff * multiplier / divisor`, where `staff`
//!   counts workers scaled by food efficiency plus robots at full strength.
//!   Output goes to the ledger or, for manual collection, the building's
//!   buffer. Science goes straight to the ledger.
//! - **Conversion** stages run at
//!   `efficiency = staff / capacity * multiplier`, producing up to
//!   `output_per_level * level * efficiency`, clamped by every input's
//!   stock and, under an enforced cap, by the output's headroom. Output is truncated to [`OUTPUT_DP`] places so consumption
//!   (`produced * ratio`) is exact and never exceeds stock. Each stage is
//!   checked with [`verify_conversion`].
//! - **Chance** rolls each byproduct with `p * staff / capacity`; a hit
//!   adds one unit to that resource's buffer and series.
//! - **Passive**, **Amenity** record zero; their effect lives in
//!   [`crate::modifiers`].
//! - **Launchpad** advances an ignited rocket's countdown.
//!
//! Scarcity never errors: a building that cannot run records zero and
//! reports [`ProductionState::Blocked`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use colony_ledger::{ConversionRecord, ResourceLedger, verify_conversion};
use colony_types::{BlockReason, BuildingId, Collection, ProductionState, ResourceCost, ResourceKind};
use colony_world::{
    Building, BuildingRegistry, ChanceOutput, ConversionStage, Recipe, SimpleRecipe,
    TechUnlockRegistry, blueprint, recipe,
};

use crate::config::SimulationConfig;
use crate::dice::Dice;
use crate::modifiers::{GlobalModifiers, qualifying_warehouses, warehouse_bonus};

/// Decimal places kept on conversion output.
pub const OUTPUT_DP: u32 = 6;

/// Read-only inputs shared by every building in a tick.
#[derive(Debug, Clone, Copy)]
pub struct ProductionContext<'a> {
    /// Happiness and food efficiency.
    pub modifiers: &'a GlobalModifiers,
    /// Unlocked technologies (gates recipe stages).
    pub techs: &'a TechUnlockRegistry,
    /// Tuning.
    pub config: &'a SimulationConfig,
}

/// What production did during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionReport {
    /// Buildings that ran.
    pub active: u32,
    /// Buildings that were staffed but could not run.
    pub blocked: Vec<(BuildingId, BlockReason)>,
    /// Conversions whose consumption did not match their ratios.
    pub anomalies: u32,
    /// A rocket that completed its launch this tick.
    pub launched: Option<BuildingId>,
}

/// Run every building once.
pub fn run_production(
    buildings: &mut BuildingRegistry,
    ledger: &mut ResourceLedger,
    ctx: &ProductionContext<'_>,
    dice: &mut dyn Dice,
) -> ProductionReport {
    let happiness = ctx.modifiers.happiness_multiplier(&ctx.config.modifiers);
    let warehouses = qualifying_warehouses(buildings, &ctx.config.warehouse);
    let food = ctx.modifiers.food_efficiency;
    let mut report = ProductionReport::default();

    for building in buildings.iter_mut() {
        let multiplier = happiness.saturating_mul(warehouse_bonus(
            building.position(),
            &warehouses,
            &ctx.config.warehouse,
        ));

        let state = match recipe(building.kind()) {
            Recipe::Housing => produce_housing(building),
            Recipe::Amenity => {
                building.record_idle();
                ProductionState::Idle
            }
            Recipe::Passive => produce_passive(building),
            Recipe::Simple(simple) | Recipe::Knowledge(simple) => {
                produce_simple(building, ledger, &simple, food, multiplier)
            }
            Recipe::Conversion { stages } => {
                produce_conversion(building, ledger, &stages, ctx.techs, food, multiplier, &mut report)
            }
            Recipe::Chance { outputs } => produce_chance(building, &outputs, dice),
            Recipe::Launchpad => advance_launch(building, ctx.config.rocket.launch_ticks, &mut report),
        };

        building.set_state(state);
        match state {
            ProductionState::Active => report.active = report.active.saturating_add(1),
            ProductionState::Blocked(reason) => {
                debug!(building = %building.id(), kind = %building.kind(), ?reason, "Production blocked");
                report.blocked.push((building.id(), reason));
            }
            ProductionState::Idle => {}
        }
    }

    report
}

/// Workers scaled by food efficiency (unless exempt) plus robots.
fn effective_staff(building: &Building, food: Decimal, food_exempt: bool) -> Decimal {
    let workers = Decimal::from(building.worker_count());
    let workers = if food_exempt {
        workers
    } else {
        workers.saturating_mul(food)
    };
    workers.saturating_add(Decimal::from(building.robots_assigned()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn produce_housing(building: &mut Building) -> ProductionState {
    let occupancy = building.housing_occupancy();
    building.history_mut().overwrite(Decimal::from(occupancy));
    if occupancy > 0 {
        ProductionState::Active
    } else {
        ProductionState::Idle
    }
}

fn produce_passive(building: &mut Building) -> ProductionState {
    building.record_idle();
    if building.staff() > 0 {
        ProductionState::Active
    } else {
        ProductionState::Idle
    }
}

fn produce_simple(
    building: &mut Building,
    ledger: &mut ResourceLedger,
    simple: &SimpleRecipe,
    food: Decimal,
    multiplier: Decimal,
) -> ProductionState {
    if building.staff() == 0 {
        building.record_idle();
        return ProductionState::Idle;
    }

    // Multiply first, divide last: keeps 0.1 * 3 / 3 exact.
    let amount = simple
        .per_worker
        .saturating_mul(Decimal::from(building.level()))
        .saturating_mul(effective_staff(building, food, simple.food_exempt))
        .saturating_mul(multiplier)
        .checked_div(simple.divisor)
        .unwrap_or(Decimal::ZERO);

    let recorded = match simple.collection {
        Collection::Automatic => ledger.add(simple.output, amount),
        Collection::Manual => {
            building.accrue(amount);
            amount
        }
    };
    building.history_mut().record(recorded);
    ProductionState::Active
}

fn produce_conversion(
    building: &mut Building,
    ledger: &mut ResourceLedger,
    stages: &[ConversionStage],
    techs: &TechUnlockRegistry,
    food: Decimal,
    multiplier: Decimal,
    report: &mut ProductionReport,
) -> ProductionState {
    if building.staff() == 0 {
        building.record_idle();
        return ProductionState::Idle;
    }
    if blueprint(building.kind()).has_power_toggle && !building.is_powered_on() {
        building.record_idle();
        return ProductionState::Blocked(BlockReason::Unpowered);
    }

    let efficiency = effective_staff(building, food, false)
        .saturating_mul(multiplier)
        .checked_div(Decimal::from(building.capacity()))
        .unwrap_or(Decimal::ZERO);
    let level = Decimal::from(building.level());
    let per_resource = stages.len() > 1;
    let mut total = Decimal::ZERO;
    let mut blocked: Option<BlockReason> = None;

    for stage in stages {
        if stage.requires_tech.is_some_and(|tech| !techs.is_unlocked(tech)) {
            continue;
        }

        let desired = stage.output_per_level.saturating_mul(level).saturating_mul(efficiency);
        let (limit, short) = input_limit(ledger, &stage.inputs, desired);
        if let Some(kind) = short {
            blocked.get_or_insert(BlockReason::MissingInput(kind));
        }
        let room = ledger.headroom(stage.output).unwrap_or(Decimal::MAX);
        if room < desired {
            blocked.get_or_insert(BlockReason::StorageFull(stage.output));
        }
        let produced = desired
            .min(limit)
            .min(room)
            .round_dp_with_strategy(OUTPUT_DP, RoundingStrategy::ToZero);

        let produced = if produced > Decimal::ZERO {
            convert(building.id(), ledger, stage, produced, report)
        } else {
            Decimal::ZERO
        };
        if per_resource {
            building.multi_history_mut(stage.output).record(produced);
        }
        total = total.saturating_add(produced);
    }

    building.history_mut().record(total);
    match blocked {
        Some(reason) if total.is_zero() => ProductionState::Blocked(reason),
        _ => ProductionState::Active,
    }
}

/// The most output the ledger's stock allows, and the first input that
/// falls short of `desired`.
fn input_limit(
    ledger: &ResourceLedger,
    inputs: &[(ResourceKind, Decimal)],
    desired: Decimal,
) -> (Decimal, Option<ResourceKind>) {
    let mut limit = Decimal::MAX;
    let mut short = None;
    for &(kind, ratio) in inputs {
        let Some(allowed) = ledger.quantity(kind).checked_div(ratio) else {
            continue;
        };
        if allowed < desired && short.is_none() {
            short = Some(kind);
        }
        limit = limit.min(allowed);
    }
    (limit, short)
}

/// Consume inputs and credit output for one stage. Returns the quantity
/// credited (zero if the deduction was refused).
fn convert(
    building: BuildingId,
    ledger: &mut ResourceLedger,
    stage: &ConversionStage,
    produced: Decimal,
    report: &mut ProductionReport,
) -> Decimal {
    let consumed: ResourceCost = stage
        .inputs
        .iter()
        .map(|&(kind, ratio)| (kind, produced.saturating_mul(ratio)))
        .collect();

    if !ledger.deduct(&consumed) {
        warn!(%building, output = %stage.output, %produced, "Conversion inputs vanished mid-tick");
        return Decimal::ZERO;
    }
    let credited = ledger.add(stage.output, produced);

    let record = ConversionRecord {
        output: stage.output,
        produced: credited,
        consumed,
    };
    let check = verify_conversion(&record, &stage.inputs);
    if !check.is_balanced() {
        warn!(%building, ?check, "Conversion did not conserve inputs");
        report.anomalies = report.anomalies.saturating_add(1);
    }
    credited
}

fn produce_chance(
    building: &mut Building,
    outputs: &[ChanceOutput],
    dice: &mut dyn Dice,
) -> ProductionState {
    let staff = building.staff();
    if staff == 0 {
        building.record_idle();
        return ProductionState::Idle;
    }

    let scale = (f64::from(staff) / f64::from(building.capacity().max(1))).clamp(0.0, 1.0);
    let mut found = Decimal::ZERO;
    for output in outputs {
        let amount = if dice.chance(output.probability * scale) {
            building.accrue_multi(output.resource, Decimal::ONE);
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        building.multi_history_mut(output.resource).record(amount);
        found = found.saturating_add(amount);
    }
    building.history_mut().record(found);
    ProductionState::Active
}

fn advance_launch(building: &mut Building, launch_ticks: u32, report: &mut ProductionReport) -> ProductionState {
    let id = building.id();
    let rocket = building.rocket_mut();
    let launching = rocket.is_launching;
    if launching && rocket.launch_progress < launch_ticks {
        rocket.launch_progress = rocket.launch_progress.saturating_add(1);
        if rocket.launch_progress == launch_ticks {
            info!(building = %id, boarded = rocket.boarded, "Rocket launched");
            report.launched = Some(id);
        }
    }
    let boarded = Decimal::from(rocket.boarded);
    building.history_mut().overwrite(boarded);
    if launching {
        ProductionState::Active
    } else {
        ProductionState::Idle
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use colony_types::{BuildingKind, GridPos, TechId};
    use colony_world::{WorkforcePool, assignment};

    use super::*;
    use crate::dice::{FixedDice, ScriptedDice};

    struct Fixture {
        buildings: BuildingRegistry,
        workforce: WorkforcePool,
        ledger: ResourceLedger,
        modifiers: GlobalModifiers,
        techs: TechUnlockRegistry,
        config: SimulationConfig,
    }

    impl Fixture {
        fn new(stock: &[(ResourceKind, u32)]) -> Self {
            Self {
                buildings: BuildingRegistry::new(),
                workforce: WorkforcePool::new(),
                ledger: ResourceLedger::with_stock(&ResourceCost::from_units(stock)),
                modifiers: GlobalModifiers::default(),
                techs: TechUnlockRegistry::all(),
                config: SimulationConfig::default(),
            }
        }

        fn staffed(&mut self, kind: BuildingKind, x: i32, workers: usize) -> BuildingId {
            let id = self.buildings.place(kind, GridPos::new(x, 0)).unwrap();
            for _ in 0..workers {
                let w = self.workforce.spawn(GridPos::new(x, 0)).unwrap();
                assignment::hire(&mut self.buildings, &mut self.workforce, w, id).unwrap();
            }
            id
        }

        fn run(&mut self, dice: &mut dyn Dice) -> ProductionReport {
            let ctx = ProductionContext {
                modifiers: &self.modifiers,
                techs: &self.techs,
                config: &self.config,
            };
            run_production(&mut self.buildings, &mut self.ledger, &ctx, dice)
        }

        fn building(&self, id: BuildingId) -> &Building {
            self.buildings.get(id).unwrap()
        }
    }

    #[test]
    fn logging_workshop_adds_a_tenth() {
        let mut f = Fixture::new(&[(ResourceKind::Wood, 10)]);
        let shop = f.staffed(BuildingKind::LoggingWorkshop, 0, 3);
        let report = f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Wood), dec!(10.1));
        assert_eq!(f.building(shop).history().today(), dec!(0.1));
        assert_eq!(report.active, 1);
    }

    #[test]
    fn hunger_scales_workers_but_not_robots() {
        let mut f = Fixture::new(&[]);
        let mine = f.staffed(BuildingKind::Mine, 0, 2);
        f.buildings.get_mut(mine).unwrap().add_robot().unwrap();
        f.modifiers.food_efficiency = dec!(0.5);
        f.run(&mut FixedDice::never());
        // 0.1 * 1 * (2 * 0.5 + 1) / 3
        assert_eq!(
            f.ledger.quantity(ResourceKind::Iron),
            dec!(0.2).checked_div(dec!(3)).unwrap()
        );
    }

    #[test]
    fn farms_ignore_hunger() {
        let mut f = Fixture::new(&[]);
        f.staffed(BuildingKind::Farm, 0, 3);
        f.modifiers.food_efficiency = Decimal::ZERO;
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Food), dec!(0.2));
    }

    #[test]
    fn happiness_multiplies_output() {
        let mut f = Fixture::new(&[]);
        f.staffed(BuildingKind::LoggingWorkshop, 0, 3);
        f.modifiers.happiness_percent = 5;
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Wood), dec!(0.11));
    }

    #[test]
    fn staffed_warehouse_boosts_neighbours() {
        let mut f = Fixture::new(&[]);
        f.staffed(BuildingKind::Warehouse, 0, 3);
        f.staffed(BuildingKind::LoggingWorkshop, 2, 3);
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Wood), dec!(0.11));
    }

    #[test]
    fn coal_waits_in_the_buffer() {
        let mut f = Fixture::new(&[]);
        let mine = f.staffed(BuildingKind::CoalMine, 0, 3);
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Coal), Decimal::ZERO);
        assert_eq!(f.building(mine).production_buffer(), dec!(0.1));
    }

    #[test]
    fn laboratory_feeds_science() {
        let mut f = Fixture::new(&[]);
        f.staffed(BuildingKind::Laboratory, 0, 3);
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Science), dec!(0.1));
    }

    #[test]
    fn furnace_converts_proportionally() {
        let mut f = Fixture::new(&[
            (ResourceKind::Iron, 10),
            (ResourceKind::Coal, 10),
            (ResourceKind::Power, 10),
        ]);
        let furnace = f.staffed(BuildingKind::BlastFurnace, 0, 3);
        let report = f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Steel), dec!(0.1));
        assert_eq!(f.ledger.quantity(ResourceKind::Iron), dec!(9.8));
        assert_eq!(f.ledger.quantity(ResourceKind::Coal), dec!(9.9));
        assert_eq!(f.ledger.quantity(ResourceKind::Power), dec!(9.9));
        assert_eq!(report.anomalies, 0);
        assert_eq!(f.building(furnace).state(), ProductionState::Active);
    }

    #[test]
    fn unpowered_furnace_is_blocked() {
        let mut f = Fixture::new(&[
            (ResourceKind::Iron, 10),
            (ResourceKind::Coal, 10),
            (ResourceKind::Power, 10),
        ]);
        let furnace = f.staffed(BuildingKind::BlastFurnace, 0, 3);
        f.buildings.get_mut(furnace).unwrap().set_powered(false);
        let before = f.ledger.quantities().clone();
        let report = f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantities(), &before);
        assert_eq!(report.blocked, vec![(furnace, BlockReason::Unpowered)]);
    }

    #[test]
    fn missing_input_blocks() {
        let mut f = Fixture::new(&[(ResourceKind::Iron, 10), (ResourceKind::Power, 10)]);
        let furnace = f.staffed(BuildingKind::BlastFurnace, 0, 3);
        f.run(&mut FixedDice::never());
        assert_eq!(
            f.building(furnace).state(),
            ProductionState::Blocked(BlockReason::MissingInput(ResourceKind::Coal))
        );
        assert_eq!(f.ledger.quantity(ResourceKind::Iron), dec!(10));
    }

    #[test]
    fn full_output_store_consumes_nothing() {
        let mut f = Fixture::new(&[(ResourceKind::Coal, 10), (ResourceKind::Power, 500)]);
        f.ledger.set_storage_cap(dec!(500));
        f.ledger.set_cap_enforced(true);
        let plant = f.staffed(BuildingKind::PowerPlant, 0, 3);
        let report = f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Coal), dec!(10));
        assert_eq!(f.ledger.quantity(ResourceKind::Power), dec!(500));
        assert_eq!(f.building(plant).history().today(), Decimal::ZERO);
        assert_eq!(report.blocked, vec![(plant, BlockReason::StorageFull(ResourceKind::Power))]);
    }

    #[test]
    fn output_is_clamped_to_headroom() {
        let mut f = Fixture::new(&[(ResourceKind::Coal, 10), (ResourceKind::Power, 500)]);
        assert!(f.ledger.remove(ResourceKind::Power, dec!(0.05)));
        f.ledger.set_storage_cap(dec!(500));
        f.ledger.set_cap_enforced(true);
        let plant = f.staffed(BuildingKind::PowerPlant, 0, 3);
        let report = f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Power), dec!(500));
        assert_eq!(f.ledger.quantity(ResourceKind::Coal), dec!(9.99));
        assert_eq!(f.building(plant).history().today(), dec!(0.05));
        assert_eq!(f.building(plant).state(), ProductionState::Active);
        assert_eq!(report.anomalies, 0);
    }

    #[test]
    fn partial_staff_truncates_output() {
        let mut f = Fixture::new(&[(ResourceKind::Coal, 10)]);
        f.staffed(BuildingKind::PowerPlant, 0, 2);
        let report = f.run(&mut FixedDice::never());
        // 0.1 * 2/3 truncated to six places, coal at 0.2 per unit.
        assert_eq!(f.ledger.quantity(ResourceKind::Power), dec!(0.066666));
        assert_eq!(f.ledger.quantity(ResourceKind::Coal), dec!(9.9866668));
        assert_eq!(report.anomalies, 0);
    }

    #[test]
    fn wiring_needs_electronics() {
        let mut f = Fixture::new(&[(ResourceKind::Stone, 10), (ResourceKind::Copper, 10)]);
        f.techs = TechUnlockRegistry::new();
        let factory = f.staffed(BuildingKind::Factory, 0, 3);
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Concrete), dec!(0.1));
        assert_eq!(f.ledger.quantity(ResourceKind::Wiring), Decimal::ZERO);

        f.techs.unlock(TechId::Electronics);
        f.run(&mut FixedDice::never());
        assert_eq!(f.ledger.quantity(ResourceKind::Wiring), dec!(0.1));
        assert_eq!(f.ledger.quantity(ResourceKind::Copper), dec!(9.95));
        let series = f.building(factory).multi_history();
        assert_eq!(series.get(&ResourceKind::Concrete).map(|s| s.today()), Some(dec!(0.2)));
    }

    #[test]
    fn smelter_rolls_each_output() {
        let mut f = Fixture::new(&[]);
        let smelter = f.staffed(BuildingKind::Smelter, 0, 3);
        let mut dice = ScriptedDice::new([true, false, true, false]);
        f.run(&mut dice);
        let buffers = f.building(smelter).multi_buffers();
        assert_eq!(buffers.get(&ResourceKind::Copper).copied(), Some(Decimal::ONE));
        assert_eq!(buffers.get(&ResourceKind::Gold), None);
        assert_eq!(buffers.get(&ResourceKind::Emerald).copied(), Some(Decimal::ONE));
        assert_eq!(f.building(smelter).history().today(), dec!(2));
        assert_eq!(f.building(smelter).multi_history().len(), 4);
    }

    #[test]
    fn idle_buildings_record_zero() {
        let mut f = Fixture::new(&[(ResourceKind::Wood, 10)]);
        let shop = f.staffed(BuildingKind::LoggingWorkshop, 0, 0);
        for _ in 0..5 {
            f.run(&mut FixedDice::always());
        }
        let building = f.building(shop);
        assert_eq!(building.state(), ProductionState::Idle);
        assert_eq!(building.history().samples().len(), 5);
        assert!(building.history().samples().all(|s| s.is_zero()));
        assert_eq!(f.ledger.quantity(ResourceKind::Wood), dec!(10));
    }

    #[test]
    fn housing_tracks_occupancy() {
        let mut f = Fixture::new(&[]);
        let house = f.buildings.place(BuildingKind::House, GridPos::new(0, 0)).unwrap();
        f.buildings.get_mut(house).unwrap().add_resident();
        f.buildings.get_mut(house).unwrap().add_resident();
        f.run(&mut FixedDice::never());
        f.run(&mut FixedDice::never());
        assert_eq!(f.building(house).history().today(), dec!(2));
    }

    #[test]
    fn launch_completes_after_countdown() {
        let mut f = Fixture::new(&[]);
        f.config.rocket.launch_ticks = 3;
        let rocket = f.buildings.place(BuildingKind::Rocket, GridPos::new(0, 0)).unwrap();
        f.buildings.get_mut(rocket).unwrap().rocket_mut().is_launching = true;
        assert_eq!(f.run(&mut FixedDice::never()).launched, None);
        assert_eq!(f.run(&mut FixedDice::never()).launched, None);
        assert_eq!(f.run(&mut FixedDice::never()).launched, Some(rocket));
        assert_eq!(f.run(&mut FixedDice::never()).launched, None);
        assert_eq!(f.building(rocket).rocket().launch_progress, 3);
    }
}
