//! Tick: one pass over every agent in registry order.
//!
//! For each agent the tick assembles an observation, asks the policy for an
//! action, and hands it to [`EpisodeManager::step`]. An action the engine
//! rejects costs the agent its turn and is recorded; the tick moves on. A
//! turn that ends the episode ends the tick immediately, because the world
//! has just been reset and the remaining agents would be acting in a new
//! episode.

use gridchase_types::{Action, AgentId};
use tracing::{debug, info};

use crate::decision::PolicyProvider;
use crate::episode::{EndReason, EpisodeEnd, EpisodeManager};
use crate::turn::{TurnError, TurnOutcome};

/// Errors that can occur during tick execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    /// A turn failed for a reason other than an invalid move.
    #[error("turn error: {source}")]
    Turn {
        /// The underlying turn error.
        #[from]
        source: TurnError,
    },
}

/// A policy action the engine refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedAction {
    /// The agent whose turn was lost.
    pub agent: AgentId,
    /// What it asked for.
    pub action: Action,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Successful turns in execution order.
    pub turns: Vec<TurnOutcome>,
    /// Rewards picked up this tick.
    pub rewards_collected: u64,
    /// Actions rejected as invalid.
    pub invalid_moves: Vec<RejectedAction>,
    /// Set when the episode ended during this tick.
    pub terminal: Option<EpisodeEnd>,
}

/// Execute one tick.
///
/// # Errors
///
/// Returns [`TickError`] if a turn fails for any reason other than
/// [`TurnError::InvalidMove`].
pub fn run_tick(
    manager: &mut EpisodeManager,
    policy: &mut dyn PolicyProvider,
) -> Result<TickSummary, TickError> {
    let mut summary = TickSummary::default();

    for index in 0..manager.agents().len() {
        let observation = manager.observe(index)?;
        let Some(agent) = manager.agents().get(index).cloned() else {
            continue;
        };
        let action = policy.choose_action(&agent, &observation);

        match manager.step(index, action) {
            Ok(report) => {
                if report.outcome.reward_collected {
                    summary.rewards_collected = summary.rewards_collected.saturating_add(1);
                }
                summary.turns.push(report.outcome);
                if let Some(end) = report.terminal {
                    match end.reason {
                        EndReason::Capture(capture) => info!(
                            iteration = end.iteration,
                            final_score = end.final_score,
                            pursuer = %capture.pursuer,
                            target = %capture.target,
                            "Target captured, episode reset"
                        ),
                        EndReason::RewardsExhausted => info!(
                            iteration = end.iteration,
                            final_score = end.final_score,
                            "Board cleared, episode reset"
                        ),
                    }
                    summary.terminal = Some(end);
                    break;
                }
            }
            Err(TurnError::InvalidMove { agent, action, position }) => {
                debug!(%agent, ?action, %position, "Invalid move rejected");
                summary.invalid_moves.push(RejectedAction { agent, action });
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}
