//! The building registry.
//!
//! Buildings are kept in registration order. That order is the tie-break
//! the job allocator and the production engine rely on, so the registry
//! never reorders: removal shifts later buildings down but preserves their
//! relative order.

use colony_types::{BuildingId, BuildingKind, GridPos};

use crate::building::Building;
use crate::error::WorldError;

/// Every placed building, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    next_id: BuildingId,
}

impl Default for BuildingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildingRegistry {
    /// An empty registry. The first building gets id 1.
    pub const fn new() -> Self {
        Self {
            buildings: Vec::new(),
            next_id: BuildingId(1),
        }
    }

    /// Register a new level-1 building at `position`.
    ///
    /// Affordability and tech gating are checked by the caller; the
    /// registry only enforces that the tile is free.
    pub fn place(&mut self, kind: BuildingKind, position: GridPos) -> Result<BuildingId, WorldError> {
        if self.is_occupied(position) {
            return Err(WorldError::PositionOccupied(position));
        }
        let id = self.next_id;
        self.next_id = id.next().ok_or(WorldError::IdOverflow)?;
        self.buildings.push(Building::new(id, kind, position));
        Ok(id)
    }

    /// Unregister a building.
    ///
    /// Fails with [`WorldError::BuildingStaffed`] while workers are still
    /// assigned; release them through [`crate::assignment::release_building`]
    /// first.
    pub fn remove(&mut self, id: BuildingId) -> Result<Building, WorldError> {
        let index = self
            .buildings
            .iter()
            .position(|b| b.id() == id)
            .ok_or(WorldError::BuildingNotFound(id))?;
        if self.buildings.get(index).is_some_and(|b| !b.assigned_workers().is_empty()) {
            return Err(WorldError::BuildingStaffed(id));
        }
        Ok(self.buildings.remove(index))
    }

    /// Look up a building.
    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id() == id)
    }

    /// Look up a building mutably.
    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id() == id)
    }

    /// Look up a building or fail with [`WorldError::BuildingNotFound`].
    pub fn require(&self, id: BuildingId) -> Result<&Building, WorldError> {
        self.get(id).ok_or(WorldError::BuildingNotFound(id))
    }

    /// Mutable variant of [`Self::require`].
    pub fn require_mut(&mut self, id: BuildingId) -> Result<&mut Building, WorldError> {
        self.get_mut(id).ok_or(WorldError::BuildingNotFound(id))
    }

    /// The building standing on `position`, if any.
    pub fn at(&self, position: GridPos) -> Option<&Building> {
        self.buildings.iter().find(|b| b.position() == position)
    }

    /// Whether a building stands on `position`.
    pub fn is_occupied(&self, position: GridPos) -> bool {
        self.at(position).is_some()
    }

    /// All buildings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    /// All buildings in registration order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Building> {
        self.buildings.iter_mut()
    }

    /// Buildings of one kind, in registration order.
    pub fn of_kind(&self, kind: BuildingKind) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(move |b| b.kind() == kind)
    }

    /// Ids of buildings of one kind, in registration order.
    pub fn ids_of_kind(&self, kind: BuildingKind) -> Vec<BuildingId> {
        self.of_kind(kind).map(Building::id).collect()
    }

    /// How many buildings of `kind` exist.
    pub fn count_of_kind(&self, kind: BuildingKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Number of buildings.
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut registry = BuildingRegistry::new();
        let a = registry.place(BuildingKind::House, GridPos::new(0, 0)).unwrap();
        let b = registry.place(BuildingKind::Mine, GridPos::new(1, 0)).unwrap();
        assert_eq!(a, BuildingId(1));
        assert_eq!(b, BuildingId(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn occupied_tile_is_rejected() {
        let mut registry = BuildingRegistry::new();
        registry.place(BuildingKind::House, GridPos::new(4, 4)).unwrap();
        assert!(matches!(
            registry.place(BuildingKind::Mine, GridPos::new(4, 4)),
            Err(WorldError::PositionOccupied(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removal_preserves_order() {
        let mut registry = BuildingRegistry::new();
        let a = registry.place(BuildingKind::Mine, GridPos::new(0, 0)).unwrap();
        let b = registry.place(BuildingKind::Mine, GridPos::new(1, 0)).unwrap();
        let c = registry.place(BuildingKind::Mine, GridPos::new(2, 0)).unwrap();
        registry.remove(b).unwrap();
        assert_eq!(registry.ids_of_kind(BuildingKind::Mine), vec![a, c]);
        assert!(!registry.is_occupied(GridPos::new(1, 0)));
        assert!(matches!(registry.remove(b), Err(WorldError::BuildingNotFound(_))));
    }

    #[test]
    fn of_kind_filters() {
        let mut registry = BuildingRegistry::new();
        registry.place(BuildingKind::Mine, GridPos::new(0, 0)).unwrap();
        registry.place(BuildingKind::House, GridPos::new(1, 0)).unwrap();
        registry.place(BuildingKind::Mine, GridPos::new(2, 0)).unwrap();
        assert_eq!(registry.count_of_kind(BuildingKind::Mine), 2);
        assert_eq!(registry.count_of_kind(BuildingKind::Farm), 0);
    }
}
