//! Per-agent observation assembly.
//!
//! The observation is built fresh for each agent-turn from the current
//! terrain and roster, so a policy always sees the effects of every move
//! made earlier in the same tick.

use gridchase_agents::AgentRegistry;
use gridchase_types::{AgentView, Observation};
use gridchase_world::GridWorld;

use crate::turn::{TurnError, valid_actions};

/// Assemble the observation for the agent at roster `index`.
///
/// # Errors
///
/// Returns [`TurnError::UnknownAgent`] if no agent exists at `index`.
pub fn assemble_observation(
    grid: &GridWorld,
    registry: &AgentRegistry,
    index: usize,
) -> Result<Observation, TurnError> {
    let me = registry.get(index).ok_or(TurnError::UnknownAgent(index))?;

    let agents = registry
        .agents()
        .iter()
        .map(|a| AgentView {
            id: a.id,
            position: a.position,
            role: a.role,
        })
        .collect();

    Ok(Observation {
        size: grid.size(),
        cells: grid.encode(),
        agents,
        self_index: index,
        valid_actions: valid_actions(grid, me.position),
    })
}
