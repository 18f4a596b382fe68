//! Injectable randomness.
//!
//! Every random decision in a tick (housing spawns, smelter byproducts,
//! trader visits) goes through a [`Dice`] passed into the tick. The engine
//! uses [`SeededDice`]; tests script outcomes with [`FixedDice`] or
//! [`ScriptedDice`] so they can assert exact results.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of random decisions.
pub trait Dice {
    /// Return `true` with probability `p`. Values outside `[0, 1]` clamp.
    fn chance(&mut self, p: f64) -> bool;

    /// A uniform index in `0..upper`, or 0 when `upper` is 0.
    fn pick(&mut self, upper: usize) -> usize;
}

/// Deterministic pseudo-random dice backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Dice seeded for reproducible runs.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.random_bool(p)
    }

    fn pick(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }
}

/// Dice whose every chance roll has the same outcome.
///
/// `pick` always returns 0.
#[derive(Debug, Clone, Copy)]
pub struct FixedDice {
    outcome: bool,
}

impl FixedDice {
    /// Every roll succeeds, whatever its probability.
    pub const fn always() -> Self {
        Self { outcome: true }
    }

    /// Every roll fails.
    pub const fn never() -> Self {
        Self { outcome: false }
    }
}

impl Dice for FixedDice {
    fn chance(&mut self, _p: f64) -> bool {
        self.outcome
    }

    fn pick(&mut self, _upper: usize) -> usize {
        0
    }
}

/// Dice that replay a fixed sequence of chance outcomes, then fail.
///
/// Picks are taken from a separate sequence and reduced modulo `upper`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    /// Replay `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = bool>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            picks: VecDeque::new(),
        }
    }

    /// Also replay `picks` in order.
    #[must_use]
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks = picks.into_iter().collect();
        self
    }

    /// Chance outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn chance(&mut self, _p: f64) -> bool {
        self.rolls.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, upper: usize) -> usize {
        let raw = self.picks.pop_front().unwrap_or(0);
        raw.checked_rem(upper).unwrap_or(0)
    }
}
