//! Whole-colony snapshots.
//!
//! A [`ColonySnapshot`] is a plain serde record of everything needed to
//! resume a colony: stock, research, buildings, villagers, clock, and
//! modifiers. Identifiers are not persisted; buildings are re-registered
//! in their saved order and workers are re-linked to the first building of
//! their job kind with a free slot. A worker whose job can no longer be
//! seated is restored unemployed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use colony_ledger::LedgerError;
use colony_types::{BuildingKind, GridPos, ResourceKind, TechId};
use colony_world::{HistorySeries, RocketState, WorldError, assignment};

use crate::clock::{ClockError, WorldClock};
use crate::colony::Colony;
use crate::config::SimulationConfig;
use crate::events::Trader;
use crate::jobs::JobTargets;
use crate::modifiers::GlobalModifiers;
use crate::tick::TickError;

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur when saving or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot is not valid JSON for this format.
    #[error("snapshot encoding error: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot was written by an unknown format version.
    #[error("unsupported snapshot version {found}, expected {SNAPSHOT_VERSION}")]
    UnsupportedVersion {
        /// The version found in the snapshot.
        found: u32,
    },

    /// A stored quantity is invalid.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// The stored clock is invalid.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A building or worker could not be recreated.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The configuration could not found a colony.
    #[error("colony error: {source}")]
    Colony {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// One persisted building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Kind.
    pub kind: BuildingKind,
    /// Tile.
    pub position: GridPos,
    /// Level.
    pub level: u32,
    /// Workers assigned when saved (informational; workers carry their job).
    pub worker_count: u32,
    /// Robots seated.
    pub robots: u32,
    /// Uncollected single-resource output.
    pub production_buffer: Decimal,
    /// Uncollected chance-based outputs.
    pub multi_buffers: BTreeMap<ResourceKind, Decimal>,
    /// Main history series.
    pub history: HistorySeries,
    /// Per-output history series.
    pub multi_history: BTreeMap<ResourceKind, HistorySeries>,
    /// Power switch.
    pub is_powered_on: bool,
    /// Residents (houses only).
    pub housing_occupancy: u32,
    /// Boarding and launch progress (rockets only).
    pub rocket: RocketState,
}

/// One persisted villager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Where the villager stands.
    pub position: GridPos,
    /// Job kind, if employed.
    pub job: Option<BuildingKind>,
}

/// A complete, serializable picture of a colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    /// Format version.
    pub version: u32,
    /// Wall-clock time the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Ticks run.
    pub tick: u64,
    /// Current day.
    pub day: u64,
    /// Position within the day/night cycle.
    pub time_of_day: u64,
    /// Speed multiplier.
    pub time_scale: u32,
    /// Ledger contents.
    pub resources: BTreeMap<ResourceKind, Decimal>,
    /// Researched technologies.
    pub techs: Vec<TechId>,
    /// Buildings in registration order.
    pub buildings: Vec<BuildingRecord>,
    /// Villagers in pool order.
    pub workers: Vec<WorkerRecord>,
    /// Happiness and food efficiency.
    pub modifiers: GlobalModifiers,
    /// Job targets.
    pub job_targets: JobTargets,
    /// Visiting trader.
    pub trader: Option<Trader>,
    /// Whether a rocket has launched.
    pub launched: bool,
    /// Whether the reward code has been redeemed.
    #[serde(default)]
    pub code_redeemed: bool,
}

impl ColonySnapshot {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }
}

impl Colony {
    /// Capture the colony's state.
    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot {
            version: SNAPSHOT_VERSION,
            taken_at: Utc::now(),
            tick: self.clock.tick(),
            day: self.clock.day(),
            time_of_day: self.clock.time_of_day(),
            time_scale: self.scheduler.time_scale(),
            resources: self.ledger.quantities().clone(),
            techs: self.techs.iter().collect(),
            buildings: self
                .buildings
                .iter()
                .map(|b| BuildingRecord {
                    kind: b.kind(),
                    position: b.position(),
                    level: b.level(),
                    worker_count: b.worker_count(),
                    robots: b.robots_assigned(),
                    production_buffer: b.production_buffer(),
                    multi_buffers: b.multi_buffers().clone(),
                    history: b.history().clone(),
                    multi_history: b.multi_history().clone(),
                    is_powered_on: b.is_powered_on(),
                    housing_occupancy: b.housing_occupancy(),
                    rocket: *b.rocket(),
                })
                .collect(),
            workers: self
                .workforce
                .iter()
                .map(|w| WorkerRecord {
                    position: w.position(),
                    job: w.job_kind(),
                })
                .collect(),
            modifiers: self.modifiers,
            job_targets: self.targets.clone(),
            trader: self.trader.clone(),
            launched: self.launched,
            code_redeemed: self.code_redeemed,
        }
    }

    /// Rebuild a colony from a snapshot under `config`.
    ///
    /// Starting resources, buildings, and workers in `config` are ignored;
    /// timing and tuning come from `config`.
    pub fn restore(
        config: SimulationConfig,
        snapshot: &ColonySnapshot,
    ) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        config.validate().map_err(TickError::from)?;
        let mut colony = Self::empty(config)?;

        colony.clock = WorldClock::from_parts(
            snapshot.tick,
            snapshot.time_of_day,
            snapshot.day,
            colony.clock.cycle_length(),
        )?;
        colony.scheduler.set_time_scale(snapshot.time_scale)?;

        for (&kind, &quantity) in &snapshot.resources {
            colony.ledger.restore_quantity(kind, quantity)?;
        }
        colony.techs = snapshot.techs.iter().copied().collect();

        for record in &snapshot.buildings {
            let id = colony.buildings.place(record.kind, record.position)?;
            colony.buildings.require_mut(id)?.restore(
                record.level,
                record.robots,
                record.production_buffer,
                record.multi_buffers.clone(),
                record.history.clone(),
                record.multi_history.clone(),
                record.is_powered_on,
                record.housing_occupancy,
                record.rocket,
            );
        }

        let mut unseated = 0_usize;
        for record in &snapshot.workers {
            let worker = colony.workforce.spawn(record.position)?;
            let Some(kind) = record.job else {
                continue;
            };
            let seat = colony
                .buildings
                .of_kind(kind)
                .find(|b| b.has_free_slot())
                .map(colony_world::Building::id);
            match seat {
                Some(building) => {
                    assignment::hire(&mut colony.buildings, &mut colony.workforce, worker, building)?;
                }
                None => {
                    unseated = unseated.saturating_add(1);
                    warn!(%worker, %kind, "No free slot for restored worker, leaving unemployed");
                }
            }
        }

        colony.modifiers = snapshot.modifiers;
        colony.targets = snapshot.job_targets.clone();
        colony.trader = snapshot.trader.clone();
        colony.launched = snapshot.launched;
        colony.code_redeemed = snapshot.code_redeemed;
        colony.refresh_derived();

        info!(
            tick = snapshot.tick,
            buildings = colony.buildings.len(),
            population = colony.workforce.len(),
            unseated,
            "Colony restored"
        );
        Ok(colony)
    }
}
