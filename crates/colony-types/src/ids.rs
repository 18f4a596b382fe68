//! Type-safe identifier wrappers around `u64`.
//!
//! Workers and buildings get strongly-typed IDs so they cannot be mixed up
//! at compile time. IDs are allocated sequentially by their owning
//! collection, which keeps iteration order (and therefore the greedy job
//! allocator) deterministic across runs and restores.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Return the raw numeric value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }

            /// Return the identifier that follows this one, or `None` on overflow.
            pub const fn next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a worker (villager).
    WorkerId, "worker"
);

define_id!(
    /// Unique identifier for a placed building.
    BuildingId, "building"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_increments() {
        assert_eq!(WorkerId(4).next(), Some(WorkerId(5)));
        assert_eq!(BuildingId(u64::MAX).next(), None);
    }

    #[test]
    fn display_includes_prefix() {
        assert_eq!(WorkerId(7).to_string(), "worker-7");
        assert_eq!(BuildingId(2).to_string(), "building-2");
    }

    #[test]
    fn ids_order_by_allocation() {
        assert!(WorkerId(1) < WorkerId(2));
    }
}
