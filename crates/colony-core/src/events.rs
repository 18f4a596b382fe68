//! Random day events and the per-tick event log.
//!
//! At every day rollover a travelling trader may arrive with a few offers
//! drawn from a fixed table. The trader stays until the next rollover.

use serde::{Deserialize, Serialize};

use colony_types::{BuildingId, ResourceCost, ResourceKind};

use crate::dice::Dice;

/// Offers a trader brings.
pub const OFFERS_PER_VISIT: usize = 3;

/// Something notable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    /// A new day began.
    DayStarted {
        /// The day that began.
        day: u64,
    },
    /// A trader arrived.
    TraderArrived {
        /// Offers on the table.
        offers: usize,
    },
    /// The trader left without further trades.
    TraderDeparted,
    /// A rocket finished its launch.
    RocketLaunched {
        /// The rocket.
        building: BuildingId,
    },
}

/// One exchange a trader will make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// What the colony pays.
    pub give: ResourceCost,
    /// What the colony receives.
    pub receive: ResourceCost,
}

impl TradeOffer {
    fn swap(give: (ResourceKind, u32), receive: (ResourceKind, u32)) -> Self {
        Self {
            give: ResourceCost::from_units(&[give]),
            receive: ResourceCost::from_units(&[receive]),
        }
    }
}

/// A trader visiting the colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trader {
    /// Day of arrival.
    pub arrived_on_day: u64,
    /// Remaining offers. Each can be accepted once.
    pub offers: Vec<TradeOffer>,
}

/// Every offer a trader can bring.
pub fn offer_table() -> Vec<TradeOffer> {
    use ResourceKind::{Coal, Copper, Food, Gold, Iron, Science, Steel, Stone, Wiring, Wood};
    vec![
        TradeOffer::swap((Wood, 20), (Iron, 10)),
        TradeOffer::swap((Stone, 20), (Coal, 10)),
        TradeOffer::swap((Iron, 15), (Copper, 8)),
        TradeOffer::swap((Wood, 30), (Food, 20)),
        TradeOffer::swap((Food, 25), (Science, 5)),
        TradeOffer::swap((Steel, 5), (Gold, 1)),
        TradeOffer::swap((Coal, 15), (Stone, 25)),
        TradeOffer::swap((Copper, 10), (Wiring, 4)),
    ]
}

/// Roll for a trader arriving on `day`.
///
/// On success, draws [`OFFERS_PER_VISIT`] distinct offers from
/// [`offer_table`].
pub fn roll_trader(dice: &mut dyn Dice, chance: f64, day: u64) -> Option<Trader> {
    if !dice.chance(chance) {
        return None;
    }
    let mut table = offer_table();
    let mut offers = Vec::with_capacity(OFFERS_PER_VISIT);
    while offers.len() < OFFERS_PER_VISIT && !table.is_empty() {
        let index = dice.pick(table.len()).min(table.len().saturating_sub(1));
        offers.push(table.remove(index));
    }
    Some(Trader {
        arrived_on_day: day,
        offers,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dice::{FixedDice, ScriptedDice};

    #[test]
    fn no_trader_on_failed_roll() {
        assert!(roll_trader(&mut FixedDice::never(), 0.25, 3).is_none());
    }

    #[test]
    fn trader_brings_distinct_offers() {
        let mut dice = ScriptedDice::new([true]).with_picks([7, 0, 0]);
        let trader = roll_trader(&mut dice, 0.25, 3).unwrap();
        let table = offer_table();
        assert_eq!(trader.arrived_on_day, 3);
        assert_eq!(trader.offers.len(), OFFERS_PER_VISIT);
        assert_eq!(trader.offers.first(), table.get(7));
        assert_eq!(trader.offers.get(1), table.first());
        assert_eq!(trader.offers.get(2), table.get(1));
    }
}
