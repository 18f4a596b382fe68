//! Real-time to simulated-time pacing.
//!
//! The host calls [`TickScheduler::advance`] once per frame with the real
//! milliseconds elapsed. Once the accumulated time reaches
//! `tick_interval_ms / time_scale`, the call reports that exactly one tick
//! is due. There is no catch-up: a long frame still fires a single tick,
//! and the leftover carried into the next frame is kept below one
//! threshold.

use crate::clock::ClockError;

/// Frame-driven tick pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickScheduler {
    tick_interval_ms: u64,
    time_scale: u32,
    accumulated_ms: u64,
}

impl TickScheduler {
    /// A scheduler with nothing accumulated.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the interval is zero or the
    /// scale is not 1 or 10.
    pub fn new(tick_interval_ms: u64, time_scale: u32) -> Result<Self, ClockError> {
        if tick_interval_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "tick_interval_ms must be at least 1".to_owned(),
            });
        }
        validate_scale(time_scale)?;
        Ok(Self {
            tick_interval_ms,
            time_scale,
            accumulated_ms: 0,
        })
    }

    /// Real milliseconds per tick at the current scale (at least 1).
    pub fn threshold_ms(&self) -> u64 {
        self.tick_interval_ms
            .checked_div(u64::from(self.time_scale))
            .unwrap_or(self.tick_interval_ms)
            .max(1)
    }

    /// Account for `elapsed_ms` of real time. Returns `true` when a tick
    /// should run now.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        let threshold = self.threshold_ms();
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        if self.accumulated_ms < threshold {
            return false;
        }
        let leftover = self.accumulated_ms.saturating_sub(threshold);
        self.accumulated_ms = leftover.min(threshold.saturating_sub(1));
        true
    }

    /// Current speed multiplier.
    pub const fn time_scale(&self) -> u32 {
        self.time_scale
    }

    /// Switch between 1x and 10x.
    pub fn set_time_scale(&mut self, time_scale: u32) -> Result<(), ClockError> {
        validate_scale(time_scale)?;
        self.time_scale = time_scale;
        Ok(())
    }

    /// Milliseconds carried towards the next tick.
    pub const fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }
}

fn validate_scale(time_scale: u32) -> Result<(), ClockError> {
    if matches!(time_scale, 1 | 10) {
        Ok(())
    } else {
        Err(ClockError::InvalidConfig {
            reason: format!("time_scale must be 1 or 10, got {time_scale}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_threshold_is_reached() {
        let mut scheduler = TickScheduler::new(1000, 1).unwrap();
        assert!(!scheduler.advance(400));
        assert!(!scheduler.advance(400));
        assert!(scheduler.advance(400));
        assert_eq!(scheduler.accumulated_ms(), 200);
    }

    #[test]
    fn long_frame_fires_a_single_tick() {
        let mut scheduler = TickScheduler::new(1000, 1).unwrap();
        assert!(scheduler.advance(5000));
        assert_eq!(scheduler.accumulated_ms(), 999);
        assert!(scheduler.advance(1));
        assert!(!scheduler.advance(1));
    }

    #[test]
    fn ten_x_divides_interval() {
        let mut scheduler = TickScheduler::new(1000, 10).unwrap();
        assert_eq!(scheduler.threshold_ms(), 100);
        let fired = (0..10).filter(|_| scheduler.advance(100)).count();
        assert_eq!(fired, 10);
    }

    #[test]
    fn only_one_and_ten_are_valid_scales() {
        assert!(TickScheduler::new(1000, 2).is_err());
        let mut scheduler = TickScheduler::new(1000, 1).unwrap();
        assert!(scheduler.set_time_scale(10).is_ok());
        assert!(scheduler.set_time_scale(5).is_err());
        assert_eq!(scheduler.time_scale(), 10);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(TickScheduler::new(0, 1).is_err());
    }
}
