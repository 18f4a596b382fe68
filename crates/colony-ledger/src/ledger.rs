//! The colony's resource ledger.
//!
//! # Design
//!
//! - **Complete keys**: every [`ResourceKind`] has an entry from creation,
//!   defaulting to zero, so recipe lookups never miss.
//! - **Never negative**: removals that would go below zero are refused.
//! - **Atomic deduction**: a multi-resource cost is either paid in full or
//!   not at all.
//! - **Precision**: all quantities use [`Decimal`] -- production accrues
//!   fractionally without floating-point drift.
//! - **Storage cap**: recomputed by the tick engine from the building census.
//!   It is advisory unless enforcement is switched on, in which case `add`
//!   credits at most the headroom below the cap.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use colony_types::{ResourceCost, ResourceKind};

use crate::LedgerError;
use crate::flow::FlowJournal;

/// Named resource quantities plus the derived storage cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    /// Quantity held per resource. Contains every resource kind.
    quantities: BTreeMap<ResourceKind, Decimal>,

    /// Storage cap derived from the building census.
    storage_cap: Decimal,

    /// Whether `add` clamps to the storage cap.
    enforce_cap: bool,

    /// Credits and debits since the journal was last taken.
    flows: FlowJournal,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLedger {
    /// Create a ledger holding zero of every resource, with an advisory
    /// cap of zero.
    pub fn new() -> Self {
        Self {
            quantities: ResourceKind::ALL
                .iter()
                .map(|&kind| (kind, Decimal::ZERO))
                .collect(),
            storage_cap: Decimal::ZERO,
            enforce_cap: false,
            flows: FlowJournal::new(),
        }
    }

    /// Create a ledger seeded with starting stock.
    pub fn with_stock(stock: &ResourceCost) -> Self {
        let mut ledger = Self::new();
        for (kind, amount) in stock.iter() {
            ledger.quantities.insert(kind, amount);
        }
        ledger
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Quantity currently held of `kind`.
    pub fn quantity(&self, kind: ResourceKind) -> Decimal {
        self.quantities.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    /// All quantities in resource order.
    pub const fn quantities(&self) -> &BTreeMap<ResourceKind, Decimal> {
        &self.quantities
    }

    /// Whether every entry of `cost` is covered by current stock.
    pub fn has(&self, cost: &ResourceCost) -> bool {
        cost.iter()
            .all(|(kind, amount)| self.quantity(kind) >= amount)
    }

    /// The current storage cap.
    pub const fn storage_cap(&self) -> Decimal {
        self.storage_cap
    }

    /// Whether `add` clamps to the storage cap.
    pub const fn is_cap_enforced(&self) -> bool {
        self.enforce_cap
    }

    /// Whether the stock of `kind` exceeds the storage cap (display hint).
    pub fn is_over_cap(&self, kind: ResourceKind) -> bool {
        self.quantity(kind) > self.storage_cap
    }

    /// How much more of `kind` an `add` would credit, or `None` when the
    /// cap is advisory.
    pub fn headroom(&self, kind: ResourceKind) -> Option<Decimal> {
        self.enforce_cap.then(|| {
            self.storage_cap
                .saturating_sub(self.quantity(kind))
                .max(Decimal::ZERO)
        })
    }

    /// Credits and debits recorded since the journal was last taken.
    pub const fn flows(&self) -> &FlowJournal {
        &self.flows
    }

    // -----------------------------------------------------------------------
    // Mutation primitives
    // -----------------------------------------------------------------------

    /// Add `amount` of `kind`, returning the quantity actually credited.
    ///
    /// Non-positive amounts credit nothing. With cap enforcement on, the
    /// credit is limited to the headroom below the storage cap.
    pub fn add(&mut self, kind: ResourceKind, amount: Decimal) -> Decimal {
        if amount <= Decimal::ZERO {
            if amount < Decimal::ZERO {
                warn!(%kind, %amount, "Ignoring negative ledger credit");
            }
            return Decimal::ZERO;
        }

        let current = self.quantity(kind);
        let credited = self
            .headroom(kind)
            .map_or(amount, |headroom| amount.min(headroom));

        if credited > Decimal::ZERO {
            self.quantities.insert(kind, current.saturating_add(credited));
            self.flows.credit(kind, credited);
        }
        credited
    }

    /// Remove `amount` of `kind`.
    ///
    /// Returns `false` and changes nothing if the stock is insufficient or
    /// the amount is negative.
    pub fn remove(&mut self, kind: ResourceKind, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        let current = self.quantity(kind);
        if current < amount {
            return false;
        }
        if amount > Decimal::ZERO {
            self.quantities.insert(kind, current.saturating_sub(amount));
            self.flows.debit(kind, amount);
        }
        true
    }

    /// Pay `cost` in full, or not at all.
    pub fn deduct(&mut self, cost: &ResourceCost) -> bool {
        if !self.has(cost) {
            return false;
        }
        for (kind, amount) in cost.iter() {
            // Cannot fail: `has` checked every entry and entries are distinct.
            let removed = self.remove(kind, amount);
            debug_assert!(removed, "deduct lost atomicity on {kind}");
        }
        true
    }

    /// Credit every entry of `cost` (refunds, trades, collected buffers).
    ///
    /// Returns what was actually credited, which falls short of `cost`
    /// only under an enforced cap.
    pub fn refund(&mut self, cost: &ResourceCost) -> ResourceCost {
        cost.iter()
            .map(|(kind, amount)| (kind, self.add(kind, amount)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Cap and restoration
    // -----------------------------------------------------------------------

    /// Set the storage cap (recomputed every tick from the census).
    pub const fn set_storage_cap(&mut self, cap: Decimal) {
        self.storage_cap = cap;
    }

    /// Switch hard cap enforcement on or off.
    pub const fn set_cap_enforced(&mut self, enforce: bool) {
        self.enforce_cap = enforce;
    }

    /// Overwrite the stock of `kind` when restoring a snapshot.
    ///
    /// Bypasses the flow journal and the cap.
    pub fn restore_quantity(
        &mut self,
        kind: ResourceKind,
        quantity: Decimal,
    ) -> Result<(), LedgerError> {
        if quantity < Decimal::ZERO {
            return Err(LedgerError::NegativeQuantity { kind, quantity });
        }
        self.quantities.insert(kind, quantity);
        Ok(())
    }

    /// Take the flow journal, leaving an empty one in its place.
    pub fn take_flows(&mut self) -> FlowJournal {
        core::mem::take(&mut self.flows)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn starting_ledger() -> ResourceLedger {
        ResourceLedger::with_stock(&ResourceCost::from_units(&[
            (ResourceKind::Wood, 10),
            (ResourceKind::Stone, 10),
            (ResourceKind::Iron, 10),
        ]))
    }

    #[test]
    fn new_ledger_has_every_key() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.quantities().len(), ResourceKind::ALL.len());
        assert!(ledger.quantities().values().all(|q| q.is_zero()));
    }

    #[test]
    fn add_accumulates_fractions() {
        let mut ledger = ResourceLedger::new();
        ledger.add(ResourceKind::Wood, dec!(0.1));
        ledger.add(ResourceKind::Wood, dec!(0.2));
        assert_eq!(ledger.quantity(ResourceKind::Wood), dec!(0.3));
    }

    #[test]
    fn add_negative_is_ignored() {
        let mut ledger = starting_ledger();
        assert_eq!(ledger.add(ResourceKind::Wood, dec!(-4)), Decimal::ZERO);
        assert_eq!(ledger.quantity(ResourceKind::Wood), dec!(10));
    }

    #[test]
    fn remove_insufficient_changes_nothing() {
        let mut ledger = starting_ledger();
        assert!(!ledger.remove(ResourceKind::Wood, dec!(10.5)));
        assert_eq!(ledger.quantity(ResourceKind::Wood), dec!(10));
        assert!(ledger.flows().is_empty());
    }

    #[test]
    fn remove_exact_reaches_zero() {
        let mut ledger = starting_ledger();
        assert!(ledger.remove(ResourceKind::Stone, dec!(10)));
        assert_eq!(ledger.quantity(ResourceKind::Stone), Decimal::ZERO);
    }

    #[test]
    fn deduct_is_atomic() {
        let mut ledger = starting_ledger();
        let cost = ResourceCost::from_units(&[
            (ResourceKind::Wood, 5),
            (ResourceKind::Food, 1),
        ]);
        assert!(!ledger.has(&cost));
        assert!(!ledger.deduct(&cost));
        assert_eq!(ledger.quantity(ResourceKind::Wood), dec!(10));

        let affordable = ResourceCost::from_units(&[
            (ResourceKind::Wood, 5),
            (ResourceKind::Iron, 10),
        ]);
        assert!(ledger.deduct(&affordable));
        assert_eq!(ledger.quantity(ResourceKind::Wood), dec!(5));
        assert_eq!(ledger.quantity(ResourceKind::Iron), Decimal::ZERO);
    }

    #[test]
    fn cap_is_advisory_by_default() {
        let mut ledger = starting_ledger();
        ledger.set_storage_cap(dec!(12));
        assert_eq!(ledger.add(ResourceKind::Wood, dec!(5)), dec!(5));
        assert!(ledger.is_over_cap(ResourceKind::Wood));
    }

    #[test]
    fn enforced_cap_limits_credit() {
        let mut ledger = starting_ledger();
        ledger.set_storage_cap(dec!(12));
        ledger.set_cap_enforced(true);
        assert_eq!(ledger.add(ResourceKind::Wood, dec!(5)), dec!(2));
        assert_eq!(ledger.quantity(ResourceKind::Wood), dec!(12));
        assert_eq!(ledger.add(ResourceKind::Wood, dec!(1)), Decimal::ZERO);
    }

    #[test]
    fn headroom_only_under_enforced_cap() {
        let mut ledger = starting_ledger();
        ledger.set_storage_cap(dec!(12));
        assert_eq!(ledger.headroom(ResourceKind::Wood), None);
        ledger.set_cap_enforced(true);
        assert_eq!(ledger.headroom(ResourceKind::Wood), Some(dec!(2)));
        ledger.set_storage_cap(dec!(8));
        assert_eq!(ledger.headroom(ResourceKind::Wood), Some(Decimal::ZERO));
    }

    #[test]
    fn refund_reports_clipped_credit() {
        let mut ledger = starting_ledger();
        ledger.set_storage_cap(dec!(12));
        ledger.set_cap_enforced(true);
        let cost = ResourceCost::from_units(&[(ResourceKind::Wood, 5), (ResourceKind::Gold, 1)]);
        let credited = ledger.refund(&cost);
        assert_eq!(credited.get(ResourceKind::Wood), dec!(2));
        assert_eq!(credited.get(ResourceKind::Gold), dec!(1));
        assert_eq!(ledger.headroom(ResourceKind::Gold), Some(dec!(11)));
    }

    #[test]
    fn flows_track_credits_and_debits() {
        let mut ledger = starting_ledger();
        ledger.add(ResourceKind::Steel, dec!(2));
        assert!(ledger.remove(ResourceKind::Iron, dec!(4)));
        let flows = ledger.take_flows();
        assert_eq!(flows.get(ResourceKind::Steel).credited, dec!(2));
        assert_eq!(flows.get(ResourceKind::Iron).debited, dec!(4));
        assert!(ledger.flows().is_empty());
    }

    #[test]
    fn restore_rejects_negative() {
        let mut ledger = ResourceLedger::new();
        assert!(ledger.restore_quantity(ResourceKind::Gold, dec!(-1)).is_err());
        assert!(ledger.restore_quantity(ResourceKind::Gold, dec!(3)).is_ok());
        assert_eq!(ledger.quantity(ResourceKind::Gold), dec!(3));
        assert!(ledger.flows().is_empty());
    }
}
