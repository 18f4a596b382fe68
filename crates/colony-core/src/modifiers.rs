//! Global production modifiers.
//!
//! Recomputed every tick before allocation and production:
//!
//! - **Happiness**: the sum of each building's happiness contribution
//!   (gardens +1, parks +2). Production is multiplied by
//!   `1 + happiness * happiness_bonus_per_percent`.
//! - **Food efficiency**: once per simulated minute the population eats,
//!   then efficiency steps toward 0 if the food stock is empty and toward 1
//!   otherwise. Workers (not robots) are scaled by it.
//! - **Warehouse bonus**: `1 + bonus * n`, where `n` counts warehouses with
//!   enough staff within the configured Chebyshev radius. Qualifying
//!   warehouses stack without limit.
//! - **Storage cap**: `base + per_warehouse * warehouses`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use colony_ledger::ResourceLedger;
use colony_types::{BuildingKind, GridPos, ResourceKind};
use colony_world::{BuildingRegistry, blueprint};

use crate::config::{ModifiersConfig, StorageConfig, WarehouseConfig};

/// Colony-wide scalars shared by every building in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalModifiers {
    /// Happiness percent from the building census.
    pub happiness_percent: u32,
    /// Hunger scale in `[0, 1]`.
    pub food_efficiency: Decimal,
}

impl Default for GlobalModifiers {
    fn default() -> Self {
        Self {
            happiness_percent: 0,
            food_efficiency: Decimal::ONE,
        }
    }
}

impl GlobalModifiers {
    /// `1 + happiness * bonus`.
    pub fn happiness_multiplier(&self, config: &ModifiersConfig) -> Decimal {
        Decimal::ONE.saturating_add(
            Decimal::from(self.happiness_percent).saturating_mul(config.happiness_bonus_per_percent),
        )
    }

    /// Recompute happiness from the building census.
    pub fn recompute_happiness(&mut self, buildings: &BuildingRegistry) {
        self.happiness_percent = buildings
            .iter()
            .map(|b| blueprint(b.kind()).happiness)
            .fold(0_u32, u32::saturating_add);
    }

    /// Feed the population if `tick` closes a simulated minute.
    ///
    /// Returns the food eaten (zero on other ticks). Consumption is clamped
    /// to the stock on hand, so feeding never fails.
    pub fn feed(
        &mut self,
        tick: u64,
        population: usize,
        ledger: &mut ResourceLedger,
        config: &ModifiersConfig,
    ) -> Decimal {
        if tick.checked_rem(config.ticks_per_minute) != Some(0) {
            return Decimal::ZERO;
        }

        let demand = Decimal::from(population).saturating_mul(config.food_per_worker_per_minute);
        let eaten = demand.min(ledger.quantity(ResourceKind::Food));
        let removed = ledger.remove(ResourceKind::Food, eaten);
        debug_assert!(removed, "clamped food removal failed");

        let step = config.food_efficiency_step;
        self.food_efficiency = if ledger.quantity(ResourceKind::Food).is_zero() {
            self.food_efficiency.saturating_sub(step).max(Decimal::ZERO)
        } else {
            self.food_efficiency.saturating_add(step).min(Decimal::ONE)
        };
        debug!(tick, %eaten, food_efficiency = %self.food_efficiency, "Population fed");
        eaten
    }
}

/// Storage cap for the current census.
pub fn storage_cap(buildings: &BuildingRegistry, config: &StorageConfig) -> Decimal {
    let warehouses = Decimal::from(buildings.count_of_kind(BuildingKind::Warehouse));
    config
        .base_cap
        .saturating_add(config.per_warehouse.saturating_mul(warehouses))
}

/// Positions of warehouses staffed enough to give a bonus.
pub fn qualifying_warehouses(buildings: &BuildingRegistry, config: &WarehouseConfig) -> Vec<GridPos> {
    buildings
        .of_kind(BuildingKind::Warehouse)
        .filter(|w| w.staff() >= config.staff_threshold)
        .map(colony_world::Building::position)
        .collect()
}

/// `1 + bonus * n` for a building at `position`.
pub fn warehouse_bonus(position: GridPos, warehouses: &[GridPos], config: &WarehouseConfig) -> Decimal {
    let nearby = warehouses
        .iter()
        .filter(|&&w| w.chebyshev_distance(position) <= config.radius)
        .count();
    Decimal::ONE.saturating_add(config.bonus.saturating_mul(Decimal::from(nearby)))
}
