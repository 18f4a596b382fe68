//! Resource ledger and conservation checks for the colony simulation.
//!
//! Every resource unit in the colony lives in one [`ResourceLedger`].
//! Production, consumption, upgrades, refunds, and trades all move
//! quantities through the same four primitives -- `add`, `remove`, `has`,
//! and `deduct` -- so the "never more than available" invariant holds no
//! matter how the greedy allocator and production order interleave.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`ResourceLedger`] struct and its guarded mutations.
//! - [`flow`] -- Per-tick credit/debit journal kept by the ledger.
//! - [`conservation`] -- Verification that a conversion consumed exactly
//!   its recipe ratio of inputs.
//!
//! # Scarcity is not an error
//!
//! Running out of inputs is the steady state of the game. A removal or
//! deduction that cannot be satisfied returns `false` and leaves the ledger
//! untouched; callers branch on it. [`LedgerError`] is reserved for data
//! that can never be valid, such as restoring a negative quantity.
//!
//! # Usage
//!
//! ```
//! use colony_ledger::ResourceLedger;
//! use colony_types::{ResourceCost, ResourceKind};
//! use rust_decimal::Decimal;
//!
//! let mut ledger = ResourceLedger::new();
//! ledger.add(ResourceKind::Wood, Decimal::new(10, 0));
//!
//! let cost = ResourceCost::from_units(&[(ResourceKind::Wood, 5)]);
//! assert!(ledger.deduct(&cost));
//! assert_eq!(ledger.quantity(ResourceKind::Wood), Decimal::new(5, 0));
//! ```

pub mod conservation;
pub mod flow;
pub mod ledger;

// Re-export primary types at crate root.
pub use conservation::{ConservationResult, ConversionRecord, verify_conversion};
pub use flow::{Flow, FlowJournal};
pub use ledger::ResourceLedger;

use rust_decimal::Decimal;

use colony_types::ResourceKind;

/// Errors that can occur when loading quantities into the ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Quantities are never negative.
    #[error("resource {kind} cannot hold a negative quantity, got {quantity}")]
    NegativeQuantity {
        /// The resource being restored.
        kind: ResourceKind,
        /// The invalid quantity.
        quantity: Decimal,
    },
}
