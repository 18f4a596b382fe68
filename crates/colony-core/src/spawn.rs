//! Population growth from housing.
//!
//! Each tick, every house below capacity (`20 * level`) rolls the spawn
//! probability once. A hit adds a resident and creates an unemployed
//! worker standing at the house. The only population ceiling is the sum
//! of housing capacity.

use tracing::debug;

use colony_types::{BuildingId, BuildingKind, GridPos, WorkerId};
use colony_world::{BuildingRegistry, WorkforcePool, WorldError};

use crate::dice::Dice;

/// Roll every house once. Returns the workers created, in house order.
pub fn run_spawns(
    buildings: &mut BuildingRegistry,
    workforce: &mut WorkforcePool,
    probability: f64,
    dice: &mut dyn Dice,
) -> Result<Vec<WorkerId>, WorldError> {
    let houses: Vec<(BuildingId, GridPos)> = buildings
        .of_kind(BuildingKind::House)
        .filter(|h| h.housing_occupancy() < h.housing_capacity())
        .map(|h| (h.id(), h.position()))
        .collect();

    let mut spawned = Vec::new();
    for (house, position) in houses {
        if !dice.chance(probability) {
            continue;
        }
        let worker = workforce.spawn(position)?;
        buildings.require_mut(house)?.add_resident();
        debug!(%worker, %house, "Villager moved in");
        spawned.push(worker);
    }
    Ok(spawned)
}
