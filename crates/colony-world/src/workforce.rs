//! Workers and the workforce pool.
//!
//! A [`Worker`] carries its employment as an [`Employment`] value: either
//! unemployed, or assigned to a building together with the job kind it
//! mirrors and a global hiring sequence number. The building reference is
//! a lookup key, not ownership; the building's ordered worker list owns
//! the relation. Both sides change together in [`crate::assignment`].

use serde::{Deserialize, Serialize};

use colony_types::{BuildingId, BuildingKind, GridPos, WorkerId};

use crate::error::WorldError;

/// Employment state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Employment {
    /// Waiting for a job.
    Unemployed,
    /// Working at a building.
    Assigned {
        /// The building worked at.
        building: BuildingId,
        /// The building's kind (the worker's job).
        kind: BuildingKind,
        /// Position in the global hiring order; higher is more recent.
        hired_seq: u64,
    },
}

/// A villager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    id: WorkerId,
    position: GridPos,
    employment: Employment,
}

impl Worker {
    /// Unique id.
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Where the worker was last placed.
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Current employment.
    pub const fn employment(&self) -> Employment {
        self.employment
    }

    /// Whether the worker has no job.
    pub const fn is_unemployed(&self) -> bool {
        matches!(self.employment, Employment::Unemployed)
    }

    /// The job kind, if employed.
    pub const fn job_kind(&self) -> Option<BuildingKind> {
        match self.employment {
            Employment::Assigned { kind, .. } => Some(kind),
            Employment::Unemployed => None,
        }
    }

    /// The building worked at, if employed.
    pub const fn building(&self) -> Option<BuildingId> {
        match self.employment {
            Employment::Assigned { building, .. } => Some(building),
            Employment::Unemployed => None,
        }
    }

    /// Hiring sequence number, if employed.
    pub const fn hired_seq(&self) -> Option<u64> {
        match self.employment {
            Employment::Assigned { hired_seq, .. } => Some(hired_seq),
            Employment::Unemployed => None,
        }
    }

    pub(crate) const fn set_employment(&mut self, employment: Employment) {
        self.employment = employment;
    }
}

/// Every worker in the colony, in spawn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkforcePool {
    workers: Vec<Worker>,
    next_id: WorkerId,
    next_hire_seq: u64,
}

impl Default for WorkforcePool {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkforcePool {
    /// An empty pool. The first worker gets id 1.
    pub const fn new() -> Self {
        Self {
            workers: Vec::new(),
            next_id: WorkerId(1),
            next_hire_seq: 0,
        }
    }

    /// Create an unemployed worker at `position`.
    pub fn spawn(&mut self, position: GridPos) -> Result<WorkerId, WorldError> {
        let id = self.next_id;
        self.next_id = id.next().ok_or(WorldError::IdOverflow)?;
        self.workers.push(Worker {
            id,
            position,
            employment: Employment::Unemployed,
        });
        Ok(id)
    }

    /// Look up a worker.
    pub fn get(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: WorkerId) -> Option<&mut Worker> {
        self.workers.iter_mut().find(|w| w.id == id)
    }

    /// All workers in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter()
    }

    /// Unemployed workers in pool order.
    pub fn unemployed(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.workers.iter().filter(|w| w.is_unemployed()).map(Worker::id)
    }

    /// Number of workers without a job.
    pub fn unemployed_count(&self) -> usize {
        self.workers.iter().filter(|w| w.is_unemployed()).count()
    }

    /// Total population.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether nobody lives here yet.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub(crate) fn take_hire_seq(&mut self) -> Result<u64, WorldError> {
        let seq = self.next_hire_seq;
        self.next_hire_seq = seq.checked_add(1).ok_or(WorldError::IdOverflow)?;
        Ok(seq)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn spawned_workers_start_unemployed() {
        let mut pool = WorkforcePool::new();
        let a = pool.spawn(GridPos::new(1, 1)).unwrap();
        let b = pool.spawn(GridPos::new(2, 1)).unwrap();
        assert_eq!(a, WorkerId(1));
        assert_eq!(b, WorkerId(2));
        assert_eq!(pool.unemployed().collect::<Vec<_>>(), vec![a, b]);
        assert!(pool.get(a).unwrap().job_kind().is_none());
        assert_eq!(pool.get(b).unwrap().position(), GridPos::new(2, 1));
    }

    #[test]
    fn hire_sequence_is_monotonic() {
        let mut pool = WorkforcePool::new();
        let first = pool.take_hire_seq().unwrap();
        let second = pool.take_hire_seq().unwrap();
        assert!(second > first);
    }
}
