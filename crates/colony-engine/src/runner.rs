//! The real-time frame loop.
//!
//! The runner wakes once per frame, feeds the elapsed wall-clock time to
//! [`Colony::frame`], and stops when a tick limit is reached, a rocket
//! launches, or the process receives Ctrl-C.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use colony_core::{Colony, Dice, TickEvent, TickSummary};
use colony_types::ResourceKind;

use crate::error::EngineError;

/// Wall-clock time between frames.
pub const FRAME: Duration = Duration::from_millis(16);

/// Why the frame loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// A rocket launched: the colony is won.
    RocketLaunched,
    /// The process was interrupted.
    Interrupted,
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunResult {
    /// Why the loop stopped.
    pub end_reason: EndReason,
    /// Ticks executed during this run.
    pub total_ticks: u64,
    /// The last tick summary, if any tick ran.
    pub final_summary: Option<TickSummary>,
}

/// Drive `colony` in real time until a stop condition is met.
pub async fn run(
    colony: &mut Colony,
    dice: &mut dyn Dice,
    max_ticks: Option<u64>,
    frame: Duration,
) -> Result<RunResult, EngineError> {
    let mut interval = tokio::time::interval(frame);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let started = Instant::now();
    let mut fed_ms: u64 = 0;
    let mut total_ticks: u64 = 0;
    let mut final_summary = None;

    info!(
        max_ticks,
        tick_interval_ms = colony.config().world.tick_interval_ms,
        time_scale = colony.scheduler().time_scale(),
        "Simulation starting"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            signal = &mut shutdown => {
                signal?;
                info!("Interrupted");
                return Ok(RunResult {
                    end_reason: EndReason::Interrupted,
                    total_ticks,
                    final_summary,
                });
            }
        }

        // Feed whole milliseconds since start so sub-millisecond remainders
        // carry into the next frame.
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let delta = elapsed_ms.saturating_sub(fed_ms);
        fed_ms = elapsed_ms;

        let Some(summary) = colony.frame(delta, dice)? else {
            continue;
        };
        total_ticks = total_ticks.saturating_add(1);
        if summary.events.iter().any(|e| matches!(e, TickEvent::DayStarted { .. })) {
            log_day(colony, &summary);
        }

        let end_reason = if colony.has_launched() {
            Some(EndReason::RocketLaunched)
        } else if max_ticks.is_some_and(|max| summary.tick >= max) {
            Some(EndReason::MaxTicksReached)
        } else {
            None
        };
        final_summary = Some(summary);
        if let Some(end_reason) = end_reason {
            return Ok(RunResult {
                end_reason,
                total_ticks,
                final_summary,
            });
        }
    }
}

/// Daily stock report.
fn log_day(colony: &Colony, summary: &TickSummary) {
    let ledger = colony.ledger();
    info!(
        day = summary.day,
        tick = summary.tick,
        population = summary.population,
        unemployed = summary.unemployed,
        wood = %ledger.quantity(ResourceKind::Wood),
        stone = %ledger.quantity(ResourceKind::Stone),
        iron = %ledger.quantity(ResourceKind::Iron),
        food = %ledger.quantity(ResourceKind::Food),
        science = %ledger.quantity(ResourceKind::Science),
        storage_cap = %ledger.storage_cap(),
        "Daily report"
    );
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_population = result.final_summary.as_ref().map(|s| s.population),
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use colony_core::{FixedDice, SimulationConfig};

    use super::*;

    fn fast_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.tick_interval_ms = 1;
        config
    }

    #[tokio::test]
    async fn stops_at_tick_limit() {
        let mut colony = Colony::new(fast_config()).unwrap();
        let mut dice = FixedDice::never();
        let result = run(&mut colony, &mut dice, Some(5), Duration::from_millis(2))
            .await
            .unwrap();
        assert_eq!(result.end_reason, EndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(5));
        assert_eq!(colony.clock().tick(), 5);
    }

    #[tokio::test]
    async fn stops_when_rocket_launches() {
        let mut config = fast_config();
        config.world.starting_buildings = vec![colony_core::config::StartingBuilding {
            kind: colony_types::BuildingKind::Rocket,
            x: 0,
            y: 0,
            level: 1,
        }];
        config.population.initial_workers = 1;
        config.rocket.launch_ticks = 2;
        let mut colony = Colony::new(config).unwrap();
        let rocket = colony.buildings().ids_of_kind(colony_types::BuildingKind::Rocket)[0];
        colony.board_rocket(rocket, 1).unwrap();
        colony.launch_rocket(rocket).unwrap();

        let mut dice = FixedDice::never();
        let result = run(&mut colony, &mut dice, Some(100), Duration::from_millis(2))
            .await
            .unwrap();
        assert_eq!(result.end_reason, EndReason::RocketLaunched);
        assert_eq!(result.total_ticks, 2);
    }
}
