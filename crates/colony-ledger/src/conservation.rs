//! Conservation checks for resource conversions.
//!
//! A conversion (smelting, power generation, manufacturing) consumes its
//! inputs strictly in proportion to what it produces:
//!
//! ```text
//! consumed(input) == produced * ratio(input)      for every input
//! ```
//!
//! Nothing is created from nothing. The production engine builds a
//! [`ConversionRecord`] for every conversion it performs and verifies it
//! here; a violation is logged as an anomaly rather than halting the tick.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use colony_types::{ResourceCost, ResourceKind};

/// What one conversion stage did during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// The resource produced.
    pub output: ResourceKind,
    /// Quantity produced.
    pub produced: Decimal,
    /// Quantities consumed.
    pub consumed: ResourceCost,
}

/// Result of a conservation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// Every input matched the recipe ratio exactly.
    Balanced,
    /// At least one input did not match.
    Imbalanced {
        /// The first mismatching input.
        resource: ResourceKind,
        /// `produced * ratio`.
        expected: Decimal,
        /// What was actually consumed.
        actual: Decimal,
    },
}

impl ConservationResult {
    /// Whether the conversion balanced.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Verify that `record` consumed exactly `produced * ratio` of every input,
/// and nothing that is not an input.
pub fn verify_conversion(
    record: &ConversionRecord,
    inputs: &[(ResourceKind, Decimal)],
) -> ConservationResult {
    for &(resource, ratio) in inputs {
        let expected = record.produced.saturating_mul(ratio);
        let actual = record.consumed.get(resource);
        if expected != actual {
            return ConservationResult::Imbalanced {
                resource,
                expected,
                actual,
            };
        }
    }

    for (resource, actual) in record.consumed.iter() {
        if !inputs.iter().any(|&(input, _)| input == resource) {
            return ConservationResult::Imbalanced {
                resource,
                expected: Decimal::ZERO,
                actual,
            };
        }
    }

    ConservationResult::Balanced
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    const FURNACE: [(ResourceKind, Decimal); 2] = [
        (ResourceKind::Iron, Decimal::TWO),
        (ResourceKind::Coal, Decimal::ONE),
    ];

    #[test]
    fn proportional_consumption_balances() {
        let record = ConversionRecord {
            output: ResourceKind::Steel,
            produced: dec!(0.5),
            consumed: ResourceCost::new()
                .with(ResourceKind::Iron, dec!(1))
                .with(ResourceKind::Coal, dec!(0.5)),
        };
        assert!(verify_conversion(&record, &FURNACE).is_balanced());
    }

    #[test]
    fn over_consumption_is_flagged() {
        let record = ConversionRecord {
            output: ResourceKind::Steel,
            produced: dec!(0.5),
            consumed: ResourceCost::new()
                .with(ResourceKind::Iron, dec!(2))
                .with(ResourceKind::Coal, dec!(0.5)),
        };
        assert_eq!(
            verify_conversion(&record, &FURNACE),
            ConservationResult::Imbalanced {
                resource: ResourceKind::Iron,
                expected: dec!(1.0),
                actual: dec!(2),
            }
        );
    }

    #[test]
    fn stray_input_is_flagged() {
        let record = ConversionRecord {
            output: ResourceKind::Steel,
            produced: Decimal::ZERO,
            consumed: ResourceCost::new().with(ResourceKind::Wood, dec!(1)),
        };
        assert!(!verify_conversion(&record, &FURNACE).is_balanced());
    }

    #[test]
    fn idle_conversion_balances() {
        let record = ConversionRecord {
            output: ResourceKind::Steel,
            produced: Decimal::ZERO,
            consumed: ResourceCost::new(),
        };
        assert!(verify_conversion(&record, &FURNACE).is_balanced());
    }
}
