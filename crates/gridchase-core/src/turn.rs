//! Single-agent turn: validate, apply, resolve.
//!
//! Every agent-turn walks the same small state machine:
//!
//! 1. **Validating** -- the requested action must be in the agent's
//!    valid-action set ([`valid_actions`]). A rejected action leaves the
//!    world untouched. Scripted pursuers are then re-targeted: their action
//!    is replaced with the first step of the shortest A* path to the
//!    nearest target.
//! 2. **Applying** -- the position delta is written through the registry,
//!    which updates its occupancy index in the same call.
//! 3. **Resolved** -- a target stepping onto a reward collects it; then, if
//!    the mover shares its cell with any agent of the opposite role, the
//!    turn reports a [`Capture`].
//!
//! Capture detection is symmetric: a pursuer walking onto a target and a
//! target walking onto a pursuer are the same event.

use gridchase_agents::{AgentError, AgentRegistry};
use gridchase_types::{Action, AgentId, Cell, Position, Role};
use gridchase_world::{GridWorld, WorldError, astar};
use tracing::{debug, trace};

/// Errors that can occur while executing a turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// The requested action is not in the agent's valid-action set.
    #[error("agent {agent} cannot move {action:?} from {position}")]
    InvalidMove {
        /// The agent that asked.
        agent: AgentId,
        /// The rejected action.
        action: Action,
        /// Where the agent stands.
        position: Position,
    },

    /// No agent exists at the given roster index.
    #[error("no agent at index {0}")]
    UnknownAgent(usize),

    /// A registry operation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A terrain operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Where the turn automaton currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    /// No turn in flight; also the state after a rejected action.
    #[default]
    Idle,
    /// Checking the requested action.
    Validating,
    /// Writing the new position.
    Applying,
    /// Rewards and captures settled.
    Resolved,
}

/// A pursuer and a target standing on the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// The catching pursuer.
    pub pursuer: AgentId,
    /// The caught target.
    pub target: AgentId,
    /// The shared cell.
    pub position: Position,
}

/// Everything that happened during one agent-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The agent that moved.
    pub agent: AgentId,
    /// The action the policy asked for.
    pub requested: Action,
    /// The action actually applied (differs for scripted pursuers).
    pub applied: Action,
    /// Cell before the move.
    pub from: Position,
    /// Cell after the move.
    pub to: Position,
    /// Whether a reward was picked up.
    pub reward_collected: bool,
    /// Set when the move ended the episode.
    pub capture: Option<Capture>,
}

/// Actions an agent standing on `position` may take.
///
/// [`Action::Stay`] is always first; a direction is included iff its
/// destination is in bounds and passable.
pub fn valid_actions(grid: &GridWorld, position: Position) -> Vec<Action> {
    let mut actions = vec![Action::Stay];
    actions.extend(
        Action::DIRECTIONS
            .into_iter()
            .filter(|&dir| position.offset(dir).is_some_and(|next| grid.is_passable(next))),
    );
    actions
}

/// First step of the shortest path from `from` to any target.
///
/// Targets are tried in registry order and the first strictly shortest
/// path wins. Returns [`Action::Stay`] when no target is reachable or the
/// pursuer already stands on one.
pub fn pursuit_step(grid: &GridWorld, registry: &AgentRegistry, from: Position) -> Action {
    let best = registry
        .with_role(Role::Target)
        .filter_map(|(_, target)| astar(grid, from, target.position))
        .fold(None::<Vec<Position>>, |best, path| match best {
            Some(b) if b.len() <= path.len() => Some(b),
            _ => Some(path),
        });

    best.and_then(|path| path.get(1).copied())
        .and_then(|next| from.action_towards(next))
        .unwrap_or(Action::Stay)
}

/// Executes agent-turns and tracks the current [`TurnPhase`].
#[derive(Debug, Clone, Default)]
pub struct TurnEngine {
    phase: TurnPhase,
}

impl TurnEngine {
    /// Create an idle engine.
    pub const fn new() -> Self {
        Self {
            phase: TurnPhase::Idle,
        }
    }

    /// Phase reached by the most recent turn.
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Run one agent-turn.
    ///
    /// On error nothing in `grid` or `registry` has changed.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::UnknownAgent`] for a bad index and
    /// [`TurnError::InvalidMove`] for an action outside the valid set.
    pub fn execute(
        &mut self,
        grid: &mut GridWorld,
        registry: &mut AgentRegistry,
        index: usize,
        requested: Action,
    ) -> Result<TurnOutcome, TurnError> {
        self.enter(TurnPhase::Validating);
        let Some(agent) = registry.get(index).cloned() else {
            self.enter(TurnPhase::Idle);
            return Err(TurnError::UnknownAgent(index));
        };

        let from = agent.position;
        if !valid_actions(grid, from).contains(&requested) {
            self.enter(TurnPhase::Idle);
            return Err(TurnError::InvalidMove {
                agent: agent.id,
                action: requested,
                position: from,
            });
        }

        let applied = if agent.is_scripted_pursuer() {
            pursuit_step(grid, registry, from)
        } else {
            requested
        };

        self.enter(TurnPhase::Applying);
        let to = from.offset(applied).unwrap_or(from);
        registry.move_agent(grid, index, to)?;

        let reward_collected = agent.role == Role::Target && grid.get(to)? == Cell::Reward;
        if reward_collected {
            grid.set(to, Cell::Empty)?;
        }

        let opponent = agent.role.opposite();
        let capture = registry
            .occupied_by(to, opponent)
            .then(|| registry.indices_at(to, opponent))
            .and_then(|found| found.first().copied())
            .and_then(|other| registry.get(other))
            .map(|other| match agent.role {
                Role::Pursuer => Capture {
                    pursuer: agent.id,
                    target: other.id,
                    position: to,
                },
                Role::Target => Capture {
                    pursuer: other.id,
                    target: agent.id,
                    position: to,
                },
            });
        self.enter(TurnPhase::Resolved);

        if let Some(c) = capture {
            debug!(pursuer = %c.pursuer, target = %c.target, position = %c.position, "Capture");
        }

        Ok(TurnOutcome {
            agent: agent.id,
            requested,
            applied,
            from,
            to,
            reward_collected,
            capture,
        })
    }

    fn enter(&mut self, next: TurnPhase) {
        trace!(from = ?self.phase, to = ?next, "Turn phase");
        self.phase = next;
    }
}
