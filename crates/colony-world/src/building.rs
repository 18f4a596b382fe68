//! A placed building.
//!
//! A [`Building`] owns its ordered list of assigned workers, its robot
//! count, its production buffers, and its history. The worker list is only
//! changed through [`crate::assignment`], which keeps it consistent with
//! each worker's employment record.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use colony_types::{BuildingId, BuildingKind, GridPos, ProductionState, ResourceCost, ResourceKind, WorkerId};

use crate::blueprint::blueprint;
use crate::error::WorldError;
use crate::history::HistorySeries;

/// Worker-or-robot slots per building level.
pub const SLOTS_PER_LEVEL: u32 = 3;

/// Villagers housed per house level.
pub const HOUSING_PER_LEVEL: u32 = 20;

/// Highest level a building can reach.
pub const MAX_LEVEL: u32 = 100;

/// Boarding and launch progress of a rocket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocketState {
    /// Villagers aboard.
    pub boarded: u32,
    /// Whether the launch sequence has started.
    pub is_launching: bool,
    /// Ticks of launch progress so far.
    pub launch_progress: u32,
}

/// A placed production unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    id: BuildingId,
    kind: BuildingKind,
    position: GridPos,
    level: u32,
    assigned_workers: Vec<WorkerId>,
    robots_assigned: u32,
    production_buffer: Decimal,
    multi_buffers: BTreeMap<ResourceKind, Decimal>,
    history: HistorySeries,
    multi_history: BTreeMap<ResourceKind, HistorySeries>,
    is_powered_on: bool,
    housing_occupancy: u32,
    rocket: RocketState,
    state: ProductionState,
}

impl Building {
    /// A fresh level-1 building with no staff, powered on.
    pub fn new(id: BuildingId, kind: BuildingKind, position: GridPos) -> Self {
        Self {
            id,
            kind,
            position,
            level: 1,
            assigned_workers: Vec::new(),
            robots_assigned: 0,
            production_buffer: Decimal::ZERO,
            multi_buffers: BTreeMap::new(),
            history: HistorySeries::new(),
            multi_history: BTreeMap::new(),
            is_powered_on: true,
            housing_occupancy: 0,
            rocket: RocketState::default(),
            state: ProductionState::Idle,
        }
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Unique id.
    pub const fn id(&self) -> BuildingId {
        self.id
    }

    /// Building kind.
    pub const fn kind(&self) -> BuildingKind {
        self.kind
    }

    /// Tile position.
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Current level (1..=100).
    pub const fn level(&self) -> u32 {
        self.level
    }

    // -----------------------------------------------------------------------
    // Staffing
    // -----------------------------------------------------------------------

    /// Total slots for workers and robots: `3 * level`.
    pub const fn capacity(&self) -> u32 {
        self.level.saturating_mul(SLOTS_PER_LEVEL)
    }

    /// Slots available to villagers once robots are seated.
    pub const fn effective_capacity(&self) -> u32 {
        self.capacity().saturating_sub(self.robots_assigned)
    }

    /// Workers in hiring order.
    pub fn assigned_workers(&self) -> &[WorkerId] {
        &self.assigned_workers
    }

    /// Number of assigned workers.
    pub fn worker_count(&self) -> u32 {
        u32::try_from(self.assigned_workers.len()).unwrap_or(u32::MAX)
    }

    /// Robots occupying slots.
    pub const fn robots_assigned(&self) -> u32 {
        self.robots_assigned
    }

    /// Workers plus robots.
    pub fn staff(&self) -> u32 {
        self.worker_count().saturating_add(self.robots_assigned)
    }

    /// Whether a worker or robot could take another slot.
    pub fn has_free_slot(&self) -> bool {
        self.staff() < self.capacity()
    }

    /// Whether this building can run production at all this tick.
    pub fn can_produce(&self) -> bool {
        self.staff() > 0 && (!blueprint(self.kind).has_power_toggle || self.is_powered_on)
    }

    pub(crate) fn push_worker(&mut self, worker: WorkerId) {
        debug_assert!(self.has_free_slot(), "{} over capacity", self.id);
        debug_assert!(
            !self.assigned_workers.contains(&worker),
            "{worker} listed twice at {}",
            self.id
        );
        self.assigned_workers.push(worker);
    }

    pub(crate) fn remove_worker(&mut self, worker: WorkerId) -> bool {
        let before = self.assigned_workers.len();
        self.assigned_workers.retain(|&w| w != worker);
        self.assigned_workers.len() != before
    }

    pub(crate) fn take_workers(&mut self) -> Vec<WorkerId> {
        core::mem::take(&mut self.assigned_workers)
    }

    /// Seat one robot in a free slot.
    pub fn add_robot(&mut self) -> Result<(), WorldError> {
        if !blueprint(self.kind).supports_robots {
            return Err(WorldError::RobotsUnsupported(self.kind));
        }
        if !self.has_free_slot() {
            return Err(WorldError::BuildingFull {
                building: self.id,
                capacity: self.capacity(),
            });
        }
        self.robots_assigned = self.robots_assigned.saturating_add(1);
        Ok(())
    }

    /// Remove one robot from its slot.
    pub const fn remove_robot(&mut self) -> Result<(), WorldError> {
        if self.robots_assigned == 0 {
            return Err(WorldError::NoRobots(self.id));
        }
        self.robots_assigned = self.robots_assigned.saturating_sub(1);
        Ok(())
    }

    /// Remove every robot, returning how many there were.
    pub const fn take_robots(&mut self) -> u32 {
        let robots = self.robots_assigned;
        self.robots_assigned = 0;
        robots
    }

    // -----------------------------------------------------------------------
    // Levels
    // -----------------------------------------------------------------------

    /// Whether another level is allowed.
    pub const fn can_upgrade(&self) -> bool {
        self.level < MAX_LEVEL
    }

    /// Raise the level by one.
    pub const fn upgrade(&mut self) -> Result<u32, WorldError> {
        if !self.can_upgrade() {
            return Err(WorldError::LevelCapReached {
                building: self.id,
                level: self.level,
            });
        }
        self.level = self.level.saturating_add(1);
        Ok(self.level)
    }

    /// Set the level directly, clamped to `1..=MAX_LEVEL`.
    pub fn set_level(&mut self, level: u32) {
        self.level = level.clamp(1, MAX_LEVEL);
    }

    // -----------------------------------------------------------------------
    // Buffers and history
    // -----------------------------------------------------------------------

    /// Uncollected single-resource output.
    pub const fn production_buffer(&self) -> Decimal {
        self.production_buffer
    }

    /// Add to the single-resource buffer.
    pub fn accrue(&mut self, amount: Decimal) {
        self.production_buffer = self.production_buffer.saturating_add(amount);
    }

    /// Uncollected chance-based outputs.
    pub const fn multi_buffers(&self) -> &BTreeMap<ResourceKind, Decimal> {
        &self.multi_buffers
    }

    /// Add to one resource's multi-output buffer.
    pub fn accrue_multi(&mut self, kind: ResourceKind, amount: Decimal) {
        let entry = self.multi_buffers.entry(kind).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Remove the whole units from every buffer, leaving fractions behind.
    ///
    /// `single` names the resource the single buffer holds, if any. `room`
    /// bounds how much of each resource may leave (`None` is unbounded);
    /// whatever does not fit stays buffered.
    pub fn drain_whole_units(
        &mut self,
        single: Option<ResourceKind>,
        room: impl Fn(ResourceKind) -> Option<Decimal>,
    ) -> ResourceCost {
        let take = |kind: ResourceKind, amount: Decimal| {
            let whole = amount.trunc();
            room(kind).map_or(whole, |room| whole.min(room.trunc()))
        };

        let mut drained = ResourceCost::new();
        if let Some(kind) = single {
            let taken = take(kind, self.production_buffer);
            self.production_buffer = self.production_buffer.saturating_sub(taken);
            drained.add(kind, taken);
        }
        for (&kind, amount) in &mut self.multi_buffers {
            let taken = take(kind, *amount);
            *amount = amount.saturating_sub(taken);
            drained.add(kind, taken);
        }
        drained
    }

    /// The main history series.
    pub const fn history(&self) -> &HistorySeries {
        &self.history
    }

    /// Mutable access to the main history series.
    pub const fn history_mut(&mut self) -> &mut HistorySeries {
        &mut self.history
    }

    /// Per-resource history for multi-output buildings.
    pub const fn multi_history(&self) -> &BTreeMap<ResourceKind, HistorySeries> {
        &self.multi_history
    }

    /// History series for one output of a multi-output building.
    pub fn multi_history_mut(&mut self, kind: ResourceKind) -> &mut HistorySeries {
        self.multi_history.entry(kind).or_default()
    }

    /// Record a zero sample on every series this building keeps.
    pub fn record_idle(&mut self) {
        self.history.record(Decimal::ZERO);
        for series in self.multi_history.values_mut() {
            series.record(Decimal::ZERO);
        }
    }

    /// Start a new day on every series this building keeps.
    pub fn roll_history(&mut self) {
        self.history.roll_day();
        for series in self.multi_history.values_mut() {
            series.roll_day();
        }
    }

    // -----------------------------------------------------------------------
    // Power, housing, rocket, state
    // -----------------------------------------------------------------------

    /// Whether the power toggle is on.
    pub const fn is_powered_on(&self) -> bool {
        self.is_powered_on
    }

    /// Flip the power toggle.
    pub const fn set_powered(&mut self, on: bool) {
        self.is_powered_on = on;
    }

    /// Villagers living here (houses only).
    pub const fn housing_occupancy(&self) -> u32 {
        self.housing_occupancy
    }

    /// Villagers this house can hold.
    pub const fn housing_capacity(&self) -> u32 {
        if matches!(self.kind, BuildingKind::House) {
            self.level.saturating_mul(HOUSING_PER_LEVEL)
        } else {
            0
        }
    }

    /// Record one more resident.
    pub const fn add_resident(&mut self) {
        self.housing_occupancy = self.housing_occupancy.saturating_add(1);
    }

    /// Rocket boarding and launch state.
    pub const fn rocket(&self) -> &RocketState {
        &self.rocket
    }

    /// Mutable rocket state.
    pub const fn rocket_mut(&mut self) -> &mut RocketState {
        &mut self.rocket
    }

    /// Production state evaluated on the last tick.
    pub const fn state(&self) -> ProductionState {
        self.state
    }

    /// Record this tick's production state.
    pub const fn set_state(&mut self, state: ProductionState) {
        self.state = state;
    }

    /// Restore persisted fields onto a freshly placed building.
    #[allow(clippy::too_many_arguments)] // Mirrors the persisted record field for field.
    pub fn restore(
        &mut self,
        level: u32,
        robots: u32,
        production_buffer: Decimal,
        multi_buffers: BTreeMap<ResourceKind, Decimal>,
        history: HistorySeries,
        multi_history: BTreeMap<ResourceKind, HistorySeries>,
        is_powered_on: bool,
        housing_occupancy: u32,
        rocket: RocketState,
    ) {
        self.set_level(level);
        self.robots_assigned = robots.min(self.capacity());
        self.production_buffer = production_buffer.max(Decimal::ZERO);
        self.multi_buffers = multi_buffers;
        self.history = history;
        self.multi_history = multi_history;
        self.is_powered_on = is_powered_on;
        self.housing_occupancy = housing_occupancy;
        self.rocket = rocket;
    }
}
