//! World clock: tick counter, time of day, and day counter.
//!
//! # Design Principles
//!
//! - All counters use checked arithmetic (no silent overflow).
//! - `time_of_day` cycles through `[0, cycle_length)`. Wrapping back to
//!   zero starts a new day; that rollover is the only daily boundary the
//!   tick engine observes.
//! - The first half of the cycle is daytime.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick or day counter would overflow.
    #[error("clock counter overflow: cannot advance beyond u64::MAX")]
    Overflow,

    /// Invalid time configuration.
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// The result of advancing the clock by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStep {
    /// The tick just entered.
    pub tick: u64,
    /// Whether this tick started a new day.
    pub new_day: bool,
}

/// Simulated time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClock {
    /// Ticks run since the colony was founded.
    tick: u64,

    /// Position within the current day/night cycle.
    time_of_day: u64,

    /// Current day, starting at 1.
    day: u64,

    /// Ticks per day/night cycle.
    cycle_length: u64,
}

impl WorldClock {
    /// A clock at tick 0, day 1, dawn.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `cycle_length` is below 2.
    pub fn new(cycle_length: u64) -> Result<Self, ClockError> {
        Self::from_parts(0, 0, 1, cycle_length)
    }

    /// Create a clock from explicit parameters (state restoration).
    pub fn from_parts(
        tick: u64,
        time_of_day: u64,
        day: u64,
        cycle_length: u64,
    ) -> Result<Self, ClockError> {
        if cycle_length < 2 {
            return Err(ClockError::InvalidConfig {
                reason: "cycle_length must be at least 2".to_owned(),
            });
        }
        if time_of_day >= cycle_length {
            return Err(ClockError::InvalidConfig {
                reason: format!("time_of_day {time_of_day} outside cycle of {cycle_length}"),
            });
        }
        if day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "day counter starts at 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            time_of_day,
            day,
            cycle_length,
        })
    }

    /// Advance by one tick.
    pub fn advance(&mut self) -> Result<ClockStep, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::Overflow)?;
        let next = self.time_of_day.checked_add(1).ok_or(ClockError::Overflow)?;
        let (time_of_day, day, new_day) = if next >= self.cycle_length {
            (0, self.day.checked_add(1).ok_or(ClockError::Overflow)?, true)
        } else {
            (next, self.day, false)
        };
        self.tick = tick;
        self.time_of_day = time_of_day;
        self.day = day;
        Ok(ClockStep { tick, new_day })
    }

    /// Ticks run so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Position within the current cycle.
    pub const fn time_of_day(&self) -> u64 {
        self.time_of_day
    }

    /// Current day (1-based).
    pub const fn day(&self) -> u64 {
        self.day
    }

    /// Ticks per cycle.
    pub const fn cycle_length(&self) -> u64 {
        self.cycle_length
    }

    /// Whether it is currently daytime.
    pub const fn is_day(&self) -> bool {
        self.time_of_day < self.cycle_length / 2
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_dawn_of_day_one() {
        let clock = WorldClock::new(1200).unwrap();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.time_of_day(), 0);
        assert!(clock.is_day());
    }

    #[test]
    fn short_cycle_is_rejected() {
        assert!(WorldClock::new(1).is_err());
        assert!(WorldClock::from_parts(0, 5, 1, 5).is_err());
        assert!(WorldClock::from_parts(0, 0, 0, 5).is_err());
    }

    #[test]
    fn one_cycle_is_one_day() {
        let mut clock = WorldClock::new(4).unwrap();
        let rollovers: Vec<bool> = (0..4).map(|_| clock.advance().unwrap().new_day).collect();
        assert_eq!(rollovers, vec![false, false, false, true]);
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.tick(), 4);
        assert_eq!(clock.time_of_day(), 0);
    }

    #[test]
    fn second_half_is_night() {
        let mut clock = WorldClock::new(4).unwrap();
        clock.advance().unwrap();
        assert!(clock.is_day());
        clock.advance().unwrap();
        assert!(!clock.is_day());
    }

    #[test]
    fn tick_overflow_is_an_error() {
        let mut clock = WorldClock::from_parts(u64::MAX, 0, 1, 10).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::Overflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }
}
