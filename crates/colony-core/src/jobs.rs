//! The job allocator.
//!
//! Every tick, for each job kind in [`BuildingKind`] order, the allocator
//! moves the kind's headcount to its target in a single pass:
//!
//! 1. `effective = sum(3 * level) - sum(robots)` over buildings of the kind.
//! 2. `desired = effective` for a target of `-1`, else `min(target, effective)`.
//! 3. While over: fire the most recently hired worker of the kind.
//! 4. While under: take unemployed workers in pool order and seat each in
//!    the first building of the kind (registration order) with a free slot.
//!
//! The greedy order is deliberate; tests depend on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use colony_types::{BuildingId, BuildingKind, WorkerId};
use colony_world::{BuildingRegistry, WorkforcePool, WorldError, assignment};

/// Target value meaning "fill every slot".
pub const FILL: i64 = -1;

/// Desired headcount per job kind.
///
/// Kinds without an explicit entry default to [`FILL`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTargets {
    targets: BTreeMap<BuildingKind, i64>,
}

impl JobTargets {
    /// All kinds set to fill.
    pub const fn new() -> Self {
        Self {
            targets: BTreeMap::new(),
        }
    }

    /// Current target for `kind`.
    pub fn get(&self, kind: BuildingKind) -> i64 {
        self.targets.get(&kind).copied().unwrap_or(FILL)
    }

    /// Set the target for `kind`. Values below `-1` become [`FILL`].
    ///
    /// The upper bound is not stored: capacity changes as buildings come
    /// and go, so the allocator clamps against capacity every tick.
    /// Returns the stored value.
    pub fn set(&mut self, kind: BuildingKind, target: i64) -> i64 {
        let stored = target.max(FILL);
        self.targets.insert(kind, stored);
        stored
    }

    /// The target for `kind` clamped to `[-1, capacity]`.
    pub fn effective(&self, kind: BuildingKind, capacity: u32) -> i64 {
        self.get(kind).min(i64::from(capacity))
    }

    /// Explicit targets in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (BuildingKind, i64)> + '_ {
        self.targets.iter().map(|(&kind, &target)| (kind, target))
    }
}

/// Who was hired and fired during one allocation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// `(worker, building)` in hiring order.
    pub hired: Vec<(WorkerId, BuildingId)>,
    /// `(worker, building)` in firing order.
    pub fired: Vec<(WorkerId, BuildingId)>,
}

impl AllocationReport {
    fn absorb(&mut self, other: Self) {
        self.hired.extend(other.hired);
        self.fired.extend(other.fired);
    }
}

/// Sum of `3 * level` over buildings of `kind`.
pub fn capacity_of(buildings: &BuildingRegistry, kind: BuildingKind) -> u32 {
    buildings
        .of_kind(kind)
        .map(colony_world::Building::capacity)
        .fold(0, u32::saturating_add)
}

/// Reconcile every job kind against its target.
pub fn allocate(
    buildings: &mut BuildingRegistry,
    workforce: &mut WorkforcePool,
    targets: &JobTargets,
) -> Result<AllocationReport, WorldError> {
    let mut report = AllocationReport::default();
    for kind in BuildingKind::ALL {
        if kind.is_job_kind() {
            report.absorb(allocate_kind(buildings, workforce, kind, targets.get(kind))?);
        }
    }
    Ok(report)
}

/// Reconcile one job kind against `target`.
pub fn allocate_kind(
    buildings: &mut BuildingRegistry,
    workforce: &mut WorkforcePool,
    kind: BuildingKind,
    target: i64,
) -> Result<AllocationReport, WorldError> {
    let mut report = AllocationReport::default();
    let ids = buildings.ids_of_kind(kind);
    if ids.is_empty() {
        return Ok(report);
    }

    let effective: u32 = buildings
        .of_kind(kind)
        .map(colony_world::Building::effective_capacity)
        .fold(0, u32::saturating_add);
    let desired = u32::try_from(target).map_or(effective, |t| t.min(effective));
    let mut current: u32 = buildings
        .of_kind(kind)
        .map(colony_world::Building::worker_count)
        .fold(0, u32::saturating_add);

    // Fire: most recently hired first.
    while current > desired {
        let Some(worker) = most_recent_hire(buildings, workforce, &ids) else {
            break;
        };
        let building = assignment::fire(buildings, workforce, worker)?;
        report.fired.push((worker, building));
        current = current.saturating_sub(1);
    }

    // Hire: unemployed in pool order, first building with a free slot.
    if current < desired {
        let candidates: Vec<WorkerId> = workforce.unemployed().collect();
        for worker in candidates {
            if current >= desired {
                break;
            }
            let Some(building) = ids
                .iter()
                .copied()
                .find(|&id| buildings.get(id).is_some_and(colony_world::Building::has_free_slot))
            else {
                break;
            };
            assignment::hire(buildings, workforce, worker, building)?;
            report.hired.push((worker, building));
            current = current.saturating_add(1);
        }
    }

    if !report.hired.is_empty() || !report.fired.is_empty() {
        debug!(
            %kind,
            target,
            desired,
            current,
            hired = report.hired.len(),
            fired = report.fired.len(),
            "Reconciled job kind"
        );
    }
    Ok(report)
}

fn most_recent_hire(
    buildings: &BuildingRegistry,
    workforce: &WorkforcePool,
    ids: &[BuildingId],
) -> Option<WorkerId> {
    ids.iter()
        .filter_map(|&id| buildings.get(id))
        .flat_map(|b| b.assigned_workers().iter().copied())
        .filter_map(|w| Some((workforce.get(w)?.hired_seq()?, w)))
        .max_by_key(|&(seq, _)| seq)
        .map(|(_, w)| w)
}
