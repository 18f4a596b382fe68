//! Enumeration types for the colony simulation.
//!
//! Resources, building kinds, and technologies are closed sets. Each enum
//! exposes an `ALL` table in declaration order; that order is the stable
//! iteration order used by the ledger and the job allocator.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource tracked by the colony ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    // --- Raw materials ---
    /// Lumber from logging workshops.
    Wood,
    /// Stone from refineries.
    Stone,
    /// Iron from mines.
    Iron,
    /// Coal dug from coal mines; fuel for furnaces and power plants.
    Coal,
    /// Copper ore from copper mines or smelter byproducts.
    Copper,

    // --- Sustenance ---
    /// Food eaten by the population.
    Food,
    /// Oxygen from oxygenators.
    Oxygen,

    // --- Processed ---
    /// Electrical power generated by power plants.
    Power,
    /// Steel from blast furnaces.
    Steel,
    /// Concrete from factories.
    Concrete,
    /// Wiring from factories once electronics is researched.
    Wiring,

    // --- Rare byproducts ---
    /// Gold from smelting.
    Gold,
    /// Emeralds from smelting.
    Emerald,
    /// Diamonds from smelting.
    Diamond,

    // --- Special ---
    /// Idle robots available for assignment to buildings.
    Robots,
    /// Global science points produced by laboratories.
    Science,
}

impl ResourceKind {
    /// Every resource in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Wood,
        Self::Stone,
        Self::Iron,
        Self::Coal,
        Self::Copper,
        Self::Food,
        Self::Oxygen,
        Self::Power,
        Self::Steel,
        Self::Concrete,
        Self::Wiring,
        Self::Gold,
        Self::Emerald,
        Self::Diamond,
        Self::Robots,
        Self::Science,
    ];

    /// Lower-case display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Iron => "iron",
            Self::Coal => "coal",
            Self::Copper => "copper",
            Self::Food => "food",
            Self::Oxygen => "oxygen",
            Self::Power => "power",
            Self::Steel => "steel",
            Self::Concrete => "concrete",
            Self::Wiring => "wiring",
            Self::Gold => "gold",
            Self::Emerald => "emerald",
            Self::Diamond => "diamond",
            Self::Robots => "robots",
            Self::Science => "science",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Building kinds
// ---------------------------------------------------------------------------

/// A kind of building that can be placed in the colony.
///
/// Every kind that employs workers doubles as a *job kind*: a worker
/// assigned to a building carries that building's kind as its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Housing that spawns villagers.
    House,
    /// Produces wood.
    LoggingWorkshop,
    /// Produces stone.
    StoneRefinery,
    /// Produces iron.
    Mine,
    /// Produces coal into a buffer collected by hand.
    CoalMine,
    /// Produces copper into a buffer collected by hand.
    CopperMine,
    /// Produces food; exempt from the food-efficiency penalty.
    Farm,
    /// Produces food.
    Fishery,
    /// Produces a little food and raises happiness.
    Garden,
    /// Raises happiness; employs nobody.
    Park,
    /// Converts power into oxygen.
    Oxygenator,
    /// Produces science points.
    Laboratory,
    /// Smelts iron and coal into steel.
    BlastFurnace,
    /// Refines ore into chance-based byproducts.
    Smelter,
    /// Burns coal into power.
    PowerPlant,
    /// Raw-material factory: concrete, and wiring once electronics is known.
    Factory,
    /// Assembles robots.
    RobotFactory,
    /// Boosts nearby production and raises the storage cap.
    Warehouse,
    /// The rocket ship; boarding and launching it wins the game.
    Rocket,
}

impl BuildingKind {
    /// Every building kind in declaration order.
    pub const ALL: [Self; 19] = [
        Self::House,
        Self::LoggingWorkshop,
        Self::StoneRefinery,
        Self::Mine,
        Self::CoalMine,
        Self::CopperMine,
        Self::Farm,
        Self::Fishery,
        Self::Garden,
        Self::Park,
        Self::Oxygenator,
        Self::Laboratory,
        Self::BlastFurnace,
        Self::Smelter,
        Self::PowerPlant,
        Self::Factory,
        Self::RobotFactory,
        Self::Warehouse,
        Self::Rocket,
    ];

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::LoggingWorkshop => "Logging Workshop",
            Self::StoneRefinery => "Stone Refinery",
            Self::Mine => "Mine",
            Self::CoalMine => "Coal Mine",
            Self::CopperMine => "Copper Mine",
            Self::Farm => "Farm",
            Self::Fishery => "Fishery",
            Self::Garden => "Garden",
            Self::Park => "Park",
            Self::Oxygenator => "Oxygenator",
            Self::Laboratory => "Laboratory",
            Self::BlastFurnace => "Blast Furnace",
            Self::Smelter => "Smelter",
            Self::PowerPlant => "Power Plant",
            Self::Factory => "Factory",
            Self::RobotFactory => "Robot Factory",
            Self::Warehouse => "Warehouse",
            Self::Rocket => "Rocket Ship",
        }
    }

    /// Whether buildings of this kind employ workers.
    pub const fn is_job_kind(self) -> bool {
        !matches!(self, Self::House | Self::Park | Self::Rocket)
    }
}

impl core::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Technologies
// ---------------------------------------------------------------------------

/// A technology that can be researched with science points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TechId {
    /// Known from the start.
    Woodworking,
    /// Farms and fisheries.
    Agriculture,
    /// Coal mining, furnaces, smelting, factories.
    Metallurgy,
    /// Power plants, oxygenators, copper mining.
    Electricity,
    /// Unlocks the factory wiring recipe.
    Electronics,
    /// Robot factories.
    Robotics,
    /// The rocket ship.
    Rocketry,
}

impl TechId {
    /// Every technology in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Woodworking,
        Self::Agriculture,
        Self::Metallurgy,
        Self::Electricity,
        Self::Electronics,
        Self::Robotics,
        Self::Rocketry,
    ];
}

// ---------------------------------------------------------------------------
// Production
// ---------------------------------------------------------------------------

/// How a producer's output reaches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collection {
    /// Output goes straight into the ledger every tick.
    Automatic,
    /// Output accumulates in the building's buffer until collected.
    Manual,
}

/// Why a staffed building produced nothing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// The building's power toggle is off.
    Unpowered,
    /// An upstream resource is missing from the ledger.
    MissingInput(ResourceKind),
    /// The output resource is at an enforced storage cap.
    StorageFull(ResourceKind),
}

/// Production eligibility of a building, evaluated fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionState {
    /// Nobody is working here.
    Idle,
    /// Staffed and all preconditions met.
    Active,
    /// Staffed but a precondition failed.
    Blocked(BlockReason),
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_are_sorted_and_complete() {
        assert!(ResourceKind::ALL.windows(2).all(|w| w[0] < w[1]));
        assert!(BuildingKind::ALL.windows(2).all(|w| w[0] < w[1]));
        assert!(TechId::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn non_job_kinds() {
        assert!(!BuildingKind::House.is_job_kind());
        assert!(!BuildingKind::Park.is_job_kind());
        assert!(!BuildingKind::Rocket.is_job_kind());
        assert!(BuildingKind::Warehouse.is_job_kind());
        assert!(BuildingKind::LoggingWorkshop.is_job_kind());
    }

    #[test]
    fn resource_serializes_as_variant_name() {
        let json = serde_json::to_string(&ResourceKind::Wood).unwrap_or_default();
        assert_eq!(json, "\"Wood\"");
    }

    #[test]
    fn display_names() {
        assert_eq!(ResourceKind::Science.to_string(), "science");
        assert_eq!(BuildingKind::LoggingWorkshop.to_string(), "Logging Workshop");
    }
}
