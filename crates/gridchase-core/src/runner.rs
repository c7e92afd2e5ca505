//! Bounded simulation loop.
//!
//! [`run_simulation`] wraps the single-tick [`run_tick`] function and adds
//! the control plane around it:
//!
//! - **Bounded run**: stop after `max_ticks` ticks or `max_episodes`
//!   completed episodes (0 = unlimited for either)
//! - **Pacing**: optional real-time sleep between ticks
//! - **Rendering**: a frame is handed to the [`Renderer`] after every tick
//!
//! [`run_tick`]: crate::tick::run_tick

use std::time::Duration;

use tracing::info;

use crate::decision::PolicyProvider;
use crate::episode::{EpisodeManager, EpisodeState};
use crate::render::{Frame, Renderer};
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// When to stop and how fast to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunBounds {
    /// Stop after this many ticks (0 = unlimited).
    pub max_ticks: u64,
    /// Stop after this many completed episodes (0 = unlimited).
    pub max_episodes: u64,
    /// Real-time pause between ticks.
    pub tick_interval: Duration,
}

impl RunBounds {
    /// Bounds with no pacing.
    pub const fn new(max_ticks: u64, max_episodes: u64) -> Self {
        Self {
            max_ticks,
            max_episodes,
            tick_interval: Duration::ZERO,
        }
    }

    /// Sleep this long between ticks.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    const fn tick_limit_reached(&self, ticks: u64) -> bool {
        self.max_ticks > 0 && ticks >= self.max_ticks
    }

    const fn episode_limit_reached(&self, episodes: u64) -> bool {
        self.max_episodes > 0 && episodes >= self.max_episodes
    }
}

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// `max_ticks` ticks were executed.
    MaxTicksReached,
    /// `max_episodes` episodes were completed.
    MaxEpisodesReached,
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Episodes that ended (capture or cleared board) during this run.
    pub episodes_completed: u64,
    /// Rewards collected across all episodes.
    pub rewards_collected: u64,
    /// Policy actions the engine rejected.
    pub invalid_moves: u64,
    /// Scoreboard at the end of the run.
    pub final_state: EpisodeState,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
}

/// Run ticks until a bound is hit.
///
/// With both bounds at 0 the loop never returns on its own.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub fn run_simulation(
    manager: &mut EpisodeManager,
    policy: &mut dyn PolicyProvider,
    bounds: RunBounds,
    renderer: &mut dyn Renderer,
) -> Result<SimulationResult, RunnerError> {
    let mut total_ticks: u64 = 0;
    let mut episodes_completed: u64 = 0;
    let mut rewards_collected: u64 = 0;
    let mut invalid_moves: u64 = 0;

    info!(
        max_ticks = bounds.max_ticks,
        max_episodes = bounds.max_episodes,
        tick_interval = ?bounds.tick_interval,
        "Simulation starting"
    );

    loop {
        let summary = tick::run_tick(manager, policy)?;
        total_ticks = total_ticks.saturating_add(1);
        rewards_collected = rewards_collected.saturating_add(summary.rewards_collected);
        invalid_moves =
            invalid_moves.saturating_add(u64::try_from(summary.invalid_moves.len()).unwrap_or(u64::MAX));
        if summary.terminal.is_some() {
            episodes_completed = episodes_completed.saturating_add(1);
        }

        renderer.render(&Frame::of(manager, total_ticks));

        let end_reason = if bounds.episode_limit_reached(episodes_completed) {
            Some(SimulationEndReason::MaxEpisodesReached)
        } else if bounds.tick_limit_reached(total_ticks) {
            Some(SimulationEndReason::MaxTicksReached)
        } else {
            None
        };

        if let Some(end_reason) = end_reason {
            return Ok(SimulationResult {
                end_reason,
                total_ticks,
                episodes_completed,
                rewards_collected,
                invalid_moves,
                final_state: *manager.state(),
                final_summary: Some(summary),
            });
        }

        if !bounds.tick_interval.is_zero() {
            std::thread::sleep(bounds.tick_interval);
        }
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        episodes = result.episodes_completed,
        rewards = result.rewards_collected,
        invalid_moves = result.invalid_moves,
        high_score = result.final_state.high_score,
        "Simulation ended"
    );
}
