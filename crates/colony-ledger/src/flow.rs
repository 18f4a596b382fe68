//! Per-tick flow journal.
//!
//! The ledger records how much of each resource was credited and debited
//! since the journal was last taken. The tick engine takes the journal at
//! the end of every tick and reports it in the tick summary.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use colony_types::ResourceKind;

/// Credits and debits of a single resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    /// Total quantity added.
    pub credited: Decimal,
    /// Total quantity removed.
    pub debited: Decimal,
}

impl Flow {
    /// Credits minus debits.
    pub fn net(&self) -> Decimal {
        self.credited.saturating_sub(self.debited)
    }
}

/// Credits and debits per resource over one accounting window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowJournal {
    entries: BTreeMap<ResourceKind, Flow>,
}

impl FlowJournal {
    /// Create an empty journal.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record a credit.
    pub fn credit(&mut self, kind: ResourceKind, amount: Decimal) {
        let flow = self.entries.entry(kind).or_default();
        flow.credited = flow.credited.saturating_add(amount);
    }

    /// Record a debit.
    pub fn debit(&mut self, kind: ResourceKind, amount: Decimal) {
        let flow = self.entries.entry(kind).or_default();
        flow.debited = flow.debited.saturating_add(amount);
    }

    /// Flow of one resource (zero when untouched).
    pub fn get(&self, kind: ResourceKind) -> Flow {
        self.entries.get(&kind).copied().unwrap_or_default()
    }

    /// Iterate over touched resources in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Flow)> + '_ {
        self.entries.iter().map(|(&kind, &flow)| (kind, flow))
    }

    /// Whether nothing moved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
