//! Small value types shared across the workspace.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::ResourceKind;

// ---------------------------------------------------------------------------
// GridPos
// ---------------------------------------------------------------------------

/// An integer tile position in the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column.
    pub x: i32,
    /// Row (grows downward).
    pub y: i32,
}

impl GridPos {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance to another position.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

impl core::fmt::Display for GridPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// ResourceCost
// ---------------------------------------------------------------------------

/// A bundle of resource quantities: a building price, an upgrade price, a
/// refund, or a trade leg.
///
/// Entries with a zero quantity are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    entries: BTreeMap<ResourceKind, Decimal>,
}

impl ResourceCost {
    /// Create an empty cost.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a cost from whole-unit pairs.
    pub fn from_units(pairs: &[(ResourceKind, u32)]) -> Self {
        pairs
            .iter()
            .map(|&(kind, units)| (kind, Decimal::from(units)))
            .collect()
    }

    /// Return this cost with `amount` more of `kind`.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, amount: Decimal) -> Self {
        self.add(kind, amount);
        self
    }

    /// Add `amount` of `kind` to this cost. Non-positive amounts are ignored.
    pub fn add(&mut self, kind: ResourceKind, amount: Decimal) {
        if amount <= Decimal::ZERO {
            return;
        }
        let entry = self.entries.entry(kind).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Quantity of `kind` in this cost (zero when absent).
    pub fn get(&self, kind: ResourceKind) -> Decimal {
        self.entries.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    /// Iterate over `(resource, quantity)` pairs in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Decimal)> + '_ {
        self.entries.iter().map(|(&kind, &amount)| (kind, amount))
    }

    /// Whether the cost is free.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct resources in the cost.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Multiply every entry by `factor`, saturating on overflow.
    #[must_use]
    pub fn scaled(&self, factor: Decimal) -> Self {
        self.iter()
            .map(|(kind, amount)| (kind, amount.saturating_mul(factor)))
            .collect()
    }
}

impl FromIterator<(ResourceKind, Decimal)> for ResourceCost {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, Decimal)>>(iter: I) -> Self {
        let mut cost = Self::new();
        for (kind, amount) in iter {
            cost.add(kind, amount);
        }
        cost
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn chebyshev_distance_takes_larger_axis() {
        let a = GridPos::new(0, 0);
        assert_eq!(a.chebyshev_distance(GridPos::new(3, -5)), 5);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn from_units_skips_zero() {
        let cost = ResourceCost::from_units(&[(ResourceKind::Wood, 5), (ResourceKind::Stone, 0)]);
        assert_eq!(cost.len(), 1);
        assert_eq!(cost.get(ResourceKind::Wood), dec!(5));
        assert_eq!(cost.get(ResourceKind::Stone), Decimal::ZERO);
    }

    #[test]
    fn scaled_multiplies_every_entry() {
        let cost = ResourceCost::from_units(&[(ResourceKind::Wood, 10), (ResourceKind::Iron, 3)]);
        let scaled = cost.scaled(dec!(4));
        assert_eq!(scaled.get(ResourceKind::Wood), dec!(40));
        assert_eq!(scaled.get(ResourceKind::Iron), dec!(12));
    }

    #[test]
    fn with_accumulates() {
        let cost = ResourceCost::new()
            .with(ResourceKind::Food, dec!(1.5))
            .with(ResourceKind::Food, dec!(2));
        assert_eq!(cost.get(ResourceKind::Food), dec!(3.5));
    }
}
