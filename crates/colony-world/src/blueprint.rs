//! Static building blueprints.
//!
//! [`blueprint`] returns, for each [`BuildingKind`], the base cost paid on
//! placement (and refunded on removal), the per-level upgrade cost, the
//! technology that unlocks it, and a handful of flags the tick engine
//! reads: happiness contribution, robot support, and the power toggle.

use colony_types::{BuildingKind, ResourceCost, ResourceKind, TechId};

use crate::building::Building;

/// The static description of a building kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    /// The kind described.
    pub kind: BuildingKind,
    /// Paid on placement, refunded in full on removal.
    pub base_cost: ResourceCost,
    /// Upgrade cost per current level: going from level `n` to `n + 1`
    /// costs `upgrade_cost * n`.
    pub upgrade_cost: ResourceCost,
    /// Technology required to place this kind.
    pub required_tech: TechId,
    /// Happiness percent contributed by each building of this kind.
    pub happiness: u32,
    /// Whether robots may occupy slots in this kind.
    pub supports_robots: bool,
    /// Whether this kind has a power toggle that halts production when off.
    pub has_power_toggle: bool,
}

/// Return the canonical blueprint for `kind`.
#[allow(clippy::too_many_lines)] // One arm per building kind; splitting would obscure the table.
pub fn blueprint(kind: BuildingKind) -> Blueprint {
    use ResourceKind::{Concrete, Copper, Food, Iron, Steel, Stone, Wiring, Wood};

    let cost = ResourceCost::from_units;
    let (base_cost, upgrade_cost, required_tech) = match kind {
        // ---- Starting kit ----
        BuildingKind::House => (
            cost(&[(Wood, 5), (Stone, 5), (Iron, 5)]),
            cost(&[(Wood, 10), (Stone, 10)]),
            TechId::Woodworking,
        ),
        BuildingKind::LoggingWorkshop => (cost(&[(Wood, 5)]), cost(&[(Wood, 10)]), TechId::Woodworking),
        BuildingKind::StoneRefinery => (cost(&[(Stone, 5)]), cost(&[(Stone, 10)]), TechId::Woodworking),
        BuildingKind::Mine => (cost(&[(Iron, 5)]), cost(&[(Iron, 10)]), TechId::Woodworking),
        BuildingKind::Garden => (
            cost(&[(Wood, 15), (Stone, 15), (Iron, 15), (Food, 15)]),
            cost(&[(Wood, 10), (Food, 5)]),
            TechId::Woodworking,
        ),
        BuildingKind::Park => (
            cost(&[(Wood, 20), (Stone, 20)]),
            cost(&[(Wood, 15), (Stone, 15)]),
            TechId::Woodworking,
        ),
        BuildingKind::Laboratory => (
            cost(&[(Wood, 20), (Stone, 20), (Iron, 10)]),
            cost(&[(Wood, 10), (Stone, 10), (Iron, 10)]),
            TechId::Woodworking,
        ),
        BuildingKind::Warehouse => (
            cost(&[(Wood, 30), (Stone, 30)]),
            cost(&[(Wood, 15), (Stone, 15)]),
            TechId::Woodworking,
        ),

        // ---- Agriculture ----
        BuildingKind::Farm => (
            cost(&[(Wood, 5), (Stone, 5), (Iron, 5)]),
            cost(&[(Wood, 10), (Stone, 10), (Iron, 10)]),
            TechId::Agriculture,
        ),
        BuildingKind::Fishery => (
            cost(&[(Wood, 15), (Stone, 5)]),
            cost(&[(Wood, 10), (Stone, 5)]),
            TechId::Agriculture,
        ),

        // ---- Metallurgy ----
        BuildingKind::CoalMine => (
            cost(&[(Wood, 10), (Iron, 10)]),
            cost(&[(Iron, 10), (Wood, 5)]),
            TechId::Metallurgy,
        ),
        BuildingKind::BlastFurnace => (
            cost(&[(Iron, 20), (Stone, 20), (Wood, 10)]),
            cost(&[(Iron, 15), (Stone, 15)]),
            TechId::Metallurgy,
        ),
        BuildingKind::Smelter => (
            cost(&[(Stone, 30), (Iron, 20)]),
            cost(&[(Stone, 15), (Iron, 10)]),
            TechId::Metallurgy,
        ),
        BuildingKind::Factory => (
            cost(&[(Stone, 40), (Iron, 30), (Wood, 20)]),
            cost(&[(Stone, 20), (Iron, 15)]),
            TechId::Metallurgy,
        ),

        // ---- Electricity ----
        BuildingKind::CopperMine => (
            cost(&[(Stone, 15), (Iron, 15)]),
            cost(&[(Stone, 10), (Iron, 10)]),
            TechId::Electricity,
        ),
        BuildingKind::Oxygenator => (
            cost(&[(Iron, 20), (Copper, 10)]),
            cost(&[(Iron, 10), (Copper, 5)]),
            TechId::Electricity,
        ),
        BuildingKind::PowerPlant => (
            cost(&[(Stone, 30), (Iron, 30)]),
            cost(&[(Iron, 15), (Stone, 15)]),
            TechId::Electricity,
        ),

        // ---- Late game ----
        BuildingKind::RobotFactory => (
            cost(&[(Steel, 30), (Wiring, 20), (Concrete, 20)]),
            cost(&[(Steel, 15), (Wiring, 10)]),
            TechId::Robotics,
        ),
        BuildingKind::Rocket => (
            cost(&[(Wood, 1000), (Stone, 1000), (Iron, 1000)]),
            cost(&[(Wood, 200), (Stone, 200), (Iron, 200)]),
            TechId::Rocketry,
        ),
    };

    Blueprint {
        kind,
        base_cost,
        upgrade_cost,
        required_tech,
        happiness: match kind {
            BuildingKind::Garden => 1,
            BuildingKind::Park => 2,
            _ => 0,
        },
        supports_robots: matches!(
            kind,
            BuildingKind::LoggingWorkshop
                | BuildingKind::StoneRefinery
                | BuildingKind::Mine
                | BuildingKind::CoalMine
                | BuildingKind::CopperMine
                | BuildingKind::BlastFurnace
                | BuildingKind::Smelter
                | BuildingKind::PowerPlant
                | BuildingKind::Factory
                | BuildingKind::RobotFactory
        ),
        has_power_toggle: matches!(
            kind,
            BuildingKind::Oxygenator
                | BuildingKind::BlastFurnace
                | BuildingKind::PowerPlant
                | BuildingKind::RobotFactory
        ),
    }
}

/// Base cost of placing a building of `kind`.
pub fn base_cost(kind: BuildingKind) -> ResourceCost {
    blueprint(kind).base_cost
}

/// Cost of taking `building` from its current level to the next.
pub fn cost_of_next_level(building: &Building) -> ResourceCost {
    blueprint(building.kind())
        .upgrade_cost
        .scaled(rust_decimal::Decimal::from(building.level()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use colony_types::{BuildingId, GridPos};

    use super::*;

    #[test]
    fn every_kind_has_a_blueprint() {
        for kind in BuildingKind::ALL {
            let bp = blueprint(kind);
            assert_eq!(bp.kind, kind);
            assert!(!bp.base_cost.is_empty());
            assert!(!bp.upgrade_cost.is_empty());
        }
    }

    #[test]
    fn logging_workshop_costs_five_wood() {
        let cost = base_cost(BuildingKind::LoggingWorkshop);
        assert_eq!(cost.len(), 1);
        assert_eq!(cost.get(ResourceKind::Wood), dec!(5));
    }

    #[test]
    fn upgrade_cost_scales_with_level() {
        let mut mine = Building::new(BuildingId(1), BuildingKind::Mine, GridPos::new(0, 0));
        assert_eq!(cost_of_next_level(&mine).get(ResourceKind::Iron), dec!(10));
        mine.set_level(4);
        assert_eq!(cost_of_next_level(&mine).get(ResourceKind::Iron), dec!(40));
    }

    #[test]
    fn happiness_sources() {
        assert_eq!(blueprint(BuildingKind::Garden).happiness, 1);
        assert_eq!(blueprint(BuildingKind::Park).happiness, 2);
        assert_eq!(blueprint(BuildingKind::Mine).happiness, 0);
    }

    #[test]
    fn starting_kit_needs_no_research() {
        for kind in [
            BuildingKind::House,
            BuildingKind::LoggingWorkshop,
            BuildingKind::StoneRefinery,
            BuildingKind::Mine,
        ] {
            assert_eq!(blueprint(kind).required_tech, TechId::Woodworking);
        }
    }
}
