//! Production recipes.
//!
//! Each [`BuildingKind`] maps to exactly one [`Recipe`] variant through
//! [`recipe`]. The production engine in `colony-core` dispatches on the
//! variant; adding a kind means adding an arm here and, for a new shape,
//! a handler there.
//!
//! Tuning:
//!
//! | Kind | Shape |
//! |------|-------|
//! | Logging, stone, mine | 0.1 per worker-level / 3, auto-collected |
//! | Coal mine | 0.1 / 3 into a manual buffer |
//! | Copper mine | 0.05 / 3 into a manual buffer |
//! | Farm | 0.2 / 3 food, immune to hunger |
//! | Conversions | 0.1 x level per stage at full efficiency |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use colony_types::{BuildingKind, Collection, ResourceKind, TechId};

/// A single-output producer whose rate scales with staff.
///
/// `rate = per_worker * level * staff * food * multiplier / divisor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRecipe {
    /// Resource produced.
    pub output: ResourceKind,
    /// Base units per worker per level.
    pub per_worker: Decimal,
    /// Capacity divisor.
    pub divisor: Decimal,
    /// Where the output goes.
    pub collection: Collection,
    /// Whether hunger (food efficiency) is ignored.
    pub food_exempt: bool,
}

/// One stage of a conversion: inputs consumed per unit of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStage {
    /// Resource produced.
    pub output: ResourceKind,
    /// `(input, units consumed per unit of output)`.
    pub inputs: Vec<(ResourceKind, Decimal)>,
    /// Output per tick per level at full efficiency.
    pub output_per_level: Decimal,
    /// Technology gating this stage, if any.
    pub requires_tech: Option<TechId>,
}

/// A chance-rolled byproduct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanceOutput {
    /// Resource found.
    pub resource: ResourceKind,
    /// Probability per tick at full staff.
    pub probability: f64,
}

/// What a building does on each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Recipe {
    /// Houses villagers; records occupancy as history.
    Housing,
    /// Contributes happiness only.
    Amenity,
    /// Produces one resource from staff.
    Simple(SimpleRecipe),
    /// Produces global science points from staff.
    Knowledge(SimpleRecipe),
    /// Converts ledger inputs into outputs, stage by stage.
    Conversion {
        /// Stages run in order each tick.
        stages: Vec<ConversionStage>,
    },
    /// Rolls each byproduct independently into per-resource buffers.
    Chance {
        /// Candidate outputs.
        outputs: Vec<ChanceOutput>,
    },
    /// Produces nothing; boosts nearby buildings once staffed.
    Passive,
    /// The rocket's boarding and launch sequence.
    Launchpad,
}

impl Recipe {
    /// The resource held in the building's single buffer, if the recipe
    /// uses one.
    pub const fn buffered_output(&self) -> Option<ResourceKind> {
        match self {
            Self::Simple(simple) => Some(simple.output),
            _ => None,
        }
    }
}

fn auto(output: ResourceKind, per_worker: Decimal) -> SimpleRecipe {
    SimpleRecipe {
        output,
        per_worker,
        divisor: Decimal::from(3),
        collection: Collection::Automatic,
        food_exempt: false,
    }
}

fn stage(
    output: ResourceKind,
    inputs: &[(ResourceKind, Decimal)],
    requires_tech: Option<TechId>,
) -> ConversionStage {
    ConversionStage {
        output,
        inputs: inputs.to_vec(),
        output_per_level: Decimal::new(1, 1), // 0.1
        requires_tech,
    }
}

/// Return the recipe for `kind`.
pub fn recipe(kind: BuildingKind) -> Recipe {
    use ResourceKind::{
        Coal, Concrete, Copper, Diamond, Emerald, Food, Gold, Iron, Oxygen, Power, Robots, Science,
        Steel, Stone, Wiring, Wood,
    };

    let tenth = Decimal::new(1, 1);
    let half = Decimal::new(5, 1);
    let fifth = Decimal::new(2, 1);

    match kind {
        BuildingKind::House => Recipe::Housing,
        BuildingKind::Park => Recipe::Amenity,
        BuildingKind::Warehouse => Recipe::Passive,
        BuildingKind::Rocket => Recipe::Launchpad,

        // ---- Raw materials ----
        BuildingKind::LoggingWorkshop => Recipe::Simple(auto(Wood, tenth)),
        BuildingKind::StoneRefinery => Recipe::Simple(auto(Stone, tenth)),
        BuildingKind::Mine => Recipe::Simple(auto(Iron, tenth)),
        BuildingKind::CoalMine => Recipe::Simple(SimpleRecipe {
            collection: Collection::Manual,
            ..auto(Coal, tenth)
        }),
        BuildingKind::CopperMine => Recipe::Simple(SimpleRecipe {
            collection: Collection::Manual,
            ..auto(Copper, Decimal::new(5, 2)) // 0.05
        }),

        // ---- Food ----
        BuildingKind::Farm => Recipe::Simple(SimpleRecipe {
            food_exempt: true,
            ..auto(Food, fifth)
        }),
        BuildingKind::Fishery => Recipe::Simple(auto(Food, Decimal::new(15, 2))), // 0.15
        BuildingKind::Garden => Recipe::Simple(auto(Food, Decimal::new(5, 2))),   // 0.05

        BuildingKind::Laboratory => Recipe::Knowledge(auto(Science, tenth)),

        // ---- Conversions ----
        BuildingKind::Oxygenator => Recipe::Conversion {
            stages: vec![stage(Oxygen, &[(Power, half)], None)],
        },
        BuildingKind::BlastFurnace => Recipe::Conversion {
            stages: vec![stage(
                Steel,
                &[(Iron, Decimal::TWO), (Coal, Decimal::ONE), (Power, Decimal::ONE)],
                None,
            )],
        },
        BuildingKind::PowerPlant => Recipe::Conversion {
            stages: vec![stage(Power, &[(Coal, fifth)], None)],
        },
        BuildingKind::Factory => Recipe::Conversion {
            stages: vec![
                stage(Concrete, &[(Stone, Decimal::TWO)], None),
                stage(Wiring, &[(Copper, half)], Some(TechId::Electronics)),
            ],
        },
        BuildingKind::RobotFactory => Recipe::Conversion {
            stages: vec![stage(
                Robots,
                &[(Steel, Decimal::TWO), (Wiring, Decimal::TWO), (Power, Decimal::ONE)],
                None,
            )],
        },

        BuildingKind::Smelter => Recipe::Chance {
            outputs: vec![
                ChanceOutput { resource: Copper, probability: 0.30 },
                ChanceOutput { resource: Gold, probability: 0.10 },
                ChanceOutput { resource: Emerald, probability: 0.03 },
                ChanceOutput { resource: Diamond, probability: 0.01 },
            ],
        },
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn logging_workshop_tuning() {
        let Recipe::Simple(simple) = recipe(BuildingKind::LoggingWorkshop) else {
            panic!("logging workshop should be a simple producer");
        };
        assert_eq!(simple.output, ResourceKind::Wood);
        assert_eq!(simple.per_worker, dec!(0.1));
        assert_eq!(simple.divisor, dec!(3));
        assert_eq!(simple.collection, Collection::Automatic);
    }

    #[test]
    fn coal_is_collected_by_hand() {
        let r = recipe(BuildingKind::CoalMine);
        assert_eq!(r.buffered_output(), Some(ResourceKind::Coal));
        assert!(matches!(
            r,
            Recipe::Simple(SimpleRecipe { collection: Collection::Manual, .. })
        ));
    }

    #[test]
    fn only_farms_ignore_hunger() {
        for kind in BuildingKind::ALL {
            if let Recipe::Simple(simple) = recipe(kind) {
                assert_eq!(simple.food_exempt, kind == BuildingKind::Farm, "{kind}");
            }
        }
    }

    #[test]
    fn wiring_stage_needs_electronics() {
        let Recipe::Conversion { stages } = recipe(BuildingKind::Factory) else {
            panic!("factory should be a conversion");
        };
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].requires_tech, None);
        assert_eq!(stages[1].output, ResourceKind::Wiring);
        assert_eq!(stages[1].requires_tech, Some(TechId::Electronics));
    }

    #[test]
    fn oxygenator_makes_two_oxygen_per_power() {
        let Recipe::Conversion { stages } = recipe(BuildingKind::Oxygenator) else {
            panic!("oxygenator should be a conversion");
        };
        assert_eq!(stages[0].inputs, vec![(ResourceKind::Power, dec!(0.5))]);
    }

    #[test]
    fn smelter_probabilities_are_valid() {
        let Recipe::Chance { outputs } = recipe(BuildingKind::Smelter) else {
            panic!("smelter should be chance-based");
        };
        assert_eq!(outputs.len(), 4);
        assert!(outputs.iter().all(|o| (0.0..=1.0).contains(&o.probability)));
    }
}
