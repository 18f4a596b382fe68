//! Hiring and firing.
//!
//! These functions are the only code that changes who works where. Each
//! updates the building's ordered worker list and the worker's
//! [`Employment`] together, so that
//!
//! ```text
//! building.assigned_workers().contains(w)  <=>  w.building() == Some(building.id())
//! ```
//!
//! holds after every call.

use tracing::debug;

use colony_types::{BuildingId, WorkerId};

use crate::error::WorldError;
use crate::registry::BuildingRegistry;
use crate::workforce::{Employment, WorkforcePool};

/// Assign an unemployed worker to a building with a free slot.
pub fn hire(
    buildings: &mut BuildingRegistry,
    workforce: &mut WorkforcePool,
    worker: WorkerId,
    building: BuildingId,
) -> Result<(), WorldError> {
    let target = buildings.require(building)?;
    let kind = target.kind();
    if !kind.is_job_kind() {
        return Err(WorldError::NotAJobKind(kind));
    }
    if !target.has_free_slot() {
        return Err(WorldError::BuildingFull {
            building,
            capacity: target.capacity(),
        });
    }
    let current = workforce
        .get(worker)
        .ok_or(WorldError::WorkerNotFound(worker))?;
    if let Some(existing) = current.building() {
        return Err(WorldError::AlreadyAssigned {
            worker,
            building: existing,
        });
    }

    let hired_seq = workforce.take_hire_seq()?;
    buildings.require_mut(building)?.push_worker(worker);
    if let Some(w) = workforce.get_mut(worker) {
        w.set_employment(Employment::Assigned {
            building,
            kind,
            hired_seq,
        });
    }
    debug!(%worker, %building, %kind, hired_seq, "Hired worker");
    Ok(())
}

/// Release an employed worker back to the unemployed pool.
///
/// Returns the building it left.
pub fn fire(
    buildings: &mut BuildingRegistry,
    workforce: &mut WorkforcePool,
    worker: WorkerId,
) -> Result<BuildingId, WorldError> {
    let building = workforce
        .get(worker)
        .ok_or(WorldError::WorkerNotFound(worker))?
        .building()
        .ok_or(WorldError::NotAssigned(worker))?;

    let listed = buildings
        .get_mut(building)
        .is_some_and(|b| b.remove_worker(worker));
    debug_assert!(listed, "{worker} pointed at {building} but was not listed there");

    if let Some(w) = workforce.get_mut(worker) {
        w.set_employment(Employment::Unemployed);
    }
    debug!(%worker, %building, "Fired worker");
    Ok(building)
}

/// Release every worker from a building ahead of its removal.
///
/// Returns the released workers in their former hiring order.
pub fn release_building(
    buildings: &mut BuildingRegistry,
    workforce: &mut WorkforcePool,
    building: BuildingId,
) -> Result<Vec<WorkerId>, WorldError> {
    let released = buildings.require_mut(building)?.take_workers();
    for &worker in &released {
        if let Some(w) = workforce.get_mut(worker) {
            debug_assert_eq!(w.building(), Some(building));
            w.set_employment(Employment::Unemployed);
        }
    }
    Ok(released)
}

/// Check the two-sided relation between buildings and workers.
///
/// Returns the first worker found on only one side.
pub fn find_broken_link(buildings: &BuildingRegistry, workforce: &WorkforcePool) -> Option<WorkerId> {
    for building in buildings.iter() {
        for &worker in building.assigned_workers() {
            let linked = workforce
                .get(worker)
                .is_some_and(|w| w.building() == Some(building.id()));
            if !linked {
                return Some(worker);
            }
        }
    }
    workforce.iter().find_map(|w| {
        let building = w.building()?;
        let listed = buildings
            .get(building)
            .is_some_and(|b| b.assigned_workers().contains(&w.id()));
        (!listed).then_some(w.id())
    })
}
