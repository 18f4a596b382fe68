//! Error types for the `colony-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use colony_types::{BuildingId, BuildingKind, GridPos, WorkerId};

/// Errors that can occur during world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No building with this id is registered.
    #[error("building not found: {0}")]
    BuildingNotFound(BuildingId),

    /// No worker with this id exists.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    /// Another building already stands on this tile.
    #[error("position {0} is already occupied")]
    PositionOccupied(GridPos),

    /// The building is already at the maximum level.
    #[error("building {building} is already at the maximum level {level}")]
    LevelCapReached {
        /// The building.
        building: BuildingId,
        /// Its current level.
        level: u32,
    },

    /// The building has no free slot for another worker or robot.
    #[error("building {building} is full ({capacity} slots)")]
    BuildingFull {
        /// The building.
        building: BuildingId,
        /// Its total slot count.
        capacity: u32,
    },

    /// The worker already holds a job.
    #[error("worker {worker} is already assigned to {building}")]
    AlreadyAssigned {
        /// The worker.
        worker: WorkerId,
        /// The building it works at.
        building: BuildingId,
    },

    /// The worker is not assigned anywhere.
    #[error("worker {0} is not assigned to any building")]
    NotAssigned(WorkerId),

    /// Buildings of this kind do not employ anyone.
    #[error("{0} does not employ workers")]
    NotAJobKind(BuildingKind),

    /// Buildings of this kind cannot host robots.
    #[error("{0} does not support robots")]
    RobotsUnsupported(BuildingKind),

    /// The building has no robots to recall.
    #[error("building {0} has no robots assigned")]
    NoRobots(BuildingId),

    /// A building still has staff and cannot be removed.
    #[error("building {0} still has staff assigned")]
    BuildingStaffed(BuildingId),

    /// An identifier or sequence counter would overflow.
    #[error("identifier space exhausted")]
    IdOverflow,
}
