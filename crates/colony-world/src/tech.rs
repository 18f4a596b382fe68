//! Technology unlocks and the research tree.
//!
//! The registry is a set of unlocked [`TechId`]s. It gates which building
//! kinds may be placed and, for [`TechId::Electronics`], which factory
//! recipe stages run. Research spends science points from the ledger; the
//! command layer in `colony-core` performs that deduction and then calls
//! [`TechUnlockRegistry::unlock`].

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use colony_types::TechId;

/// Science cost of researching `tech`.
pub fn research_cost(tech: TechId) -> Decimal {
    match tech {
        TechId::Woodworking => Decimal::ZERO,
        TechId::Agriculture => Decimal::from(10),
        TechId::Metallurgy => Decimal::from(25),
        TechId::Electricity => Decimal::from(50),
        TechId::Electronics => Decimal::from(75),
        TechId::Robotics => Decimal::from(120),
        TechId::Rocketry => Decimal::from(200),
    }
}

/// The technology that must be known before `tech` can be researched.
pub const fn prerequisite(tech: TechId) -> Option<TechId> {
    match tech {
        TechId::Woodworking => None,
        TechId::Agriculture | TechId::Metallurgy => Some(TechId::Woodworking),
        TechId::Electricity => Some(TechId::Metallurgy),
        TechId::Electronics => Some(TechId::Electricity),
        TechId::Robotics => Some(TechId::Electronics),
        TechId::Rocketry => Some(TechId::Robotics),
    }
}

/// The set of technologies the colony has unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechUnlockRegistry {
    unlocked: BTreeSet<TechId>,
}

impl Default for TechUnlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TechUnlockRegistry {
    /// A fresh registry knowing only [`TechId::Woodworking`].
    pub fn new() -> Self {
        Self {
            unlocked: BTreeSet::from([TechId::Woodworking]),
        }
    }

    /// A registry with every technology unlocked.
    pub fn all() -> Self {
        Self {
            unlocked: TechId::ALL.into_iter().collect(),
        }
    }

    /// Whether `tech` is unlocked.
    pub fn is_unlocked(&self, tech: TechId) -> bool {
        self.unlocked.contains(&tech)
    }

    /// Whether `tech` is still locked and its prerequisite is known.
    pub fn can_research(&self, tech: TechId) -> bool {
        !self.is_unlocked(tech) && prerequisite(tech).is_none_or(|pre| self.is_unlocked(pre))
    }

    /// Unlock `tech`. Returns `true` if it was not already unlocked.
    pub fn unlock(&mut self, tech: TechId) -> bool {
        self.unlocked.insert(tech)
    }

    /// Unlocked technologies in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = TechId> + '_ {
        self.unlocked.iter().copied()
    }
}

impl FromIterator<TechId> for TechUnlockRegistry {
    fn from_iter<I: IntoIterator<Item = TechId>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.unlocked.extend(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_knows_woodworking_only() {
        let registry = TechUnlockRegistry::new();
        assert!(registry.is_unlocked(TechId::Woodworking));
        assert!(!registry.is_unlocked(TechId::Electronics));
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn research_requires_prerequisite() {
        let mut registry = TechUnlockRegistry::new();
        assert!(registry.can_research(TechId::Metallurgy));
        assert!(!registry.can_research(TechId::Electricity));
        assert!(registry.unlock(TechId::Metallurgy));
        assert!(registry.can_research(TechId::Electricity));
        assert!(!registry.can_research(TechId::Metallurgy));
    }

    #[test]
    fn unlock_twice_reports_no_change() {
        let mut registry = TechUnlockRegistry::new();
        assert!(!registry.unlock(TechId::Woodworking));
    }

    #[test]
    fn every_chain_reaches_woodworking() {
        for tech in TechId::ALL {
            let mut current = tech;
            let mut steps = 0;
            while let Some(pre) = prerequisite(current) {
                current = pre;
                steps += 1;
                assert!(steps < TechId::ALL.len());
            }
            assert_eq!(current, TechId::Woodworking);
        }
    }
}
