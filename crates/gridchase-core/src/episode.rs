//! Episode lifecycle: snapshot, scoring, and reset.
//!
//! An episode starts from an [`EpisodeSnapshot`] captured once, right after
//! setup finishes. Turns run through the [`TurnEngine`]; every reward a
//! target picks up adds exactly one point. An episode ends when a turn
//! produces a capture, or when a target picks up the last reward on the
//! board. The manager then restores terrain and roster from the snapshot,
//! zeroes the score, and bumps the iteration counter.
//!
//! The snapshot is never mutated. Rewards placed mid-episode with
//! [`EpisodeManager::add_reward`] therefore vanish on the next reset.

use gridchase_agents::AgentRegistry;
use gridchase_types::{Action, Agent, Cell, Observation, Position};
use gridchase_world::{GridWorld, WorldError};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::perception::assemble_observation;
use crate::turn::{Capture, TurnEngine, TurnError, TurnOutcome, TurnPhase, valid_actions};

/// Errors from episode-level operations other than turns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EpisodeError {
    /// A terrain lookup failed (typically out of bounds).
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The requested cell is a wall.
    #[error("cell {0} is not passable")]
    CellNotPassable(Position),

    /// An agent stands on the requested cell.
    #[error("cell {0} is occupied by an agent")]
    CellOccupied(Position),

    /// No empty, unoccupied cell is left.
    #[error("no free cell available for a reward")]
    NoFreeCell,
}

/// Immutable copy of the starting world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSnapshot {
    world: GridWorld,
    agents: Vec<Agent>,
}

impl EpisodeSnapshot {
    /// Deep-copy terrain and roster.
    pub fn capture(world: &GridWorld, agents: &AgentRegistry) -> Self {
        Self {
            world: world.clone(),
            agents: agents.agents().to_vec(),
        }
    }

    /// Starting terrain.
    pub const fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Starting roster.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }
}

/// Scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpisodeState {
    /// Rewards collected this episode.
    pub score: u64,
    /// Completed episodes.
    pub iteration: u64,
    /// Best score reached in any episode so far.
    pub high_score: u64,
    /// Turns resolved this episode.
    pub episode_turns: u64,
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A pursuer and a target met.
    Capture(Capture),
    /// A target collected the last reward on the board.
    RewardsExhausted,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeEnd {
    /// Completed-episode count including this one.
    pub iteration: u64,
    /// Score at the moment the episode ended.
    pub final_score: u64,
    /// What ended it.
    pub reason: EndReason,
}

/// Result of a successful [`EpisodeManager::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// What the turn did.
    pub outcome: TurnOutcome,
    /// Set when the turn ended the episode; the world has already been
    /// reset by the time the caller sees this.
    pub terminal: Option<EpisodeEnd>,
}

/// Owns the live world, the roster, and the scoreboard.
#[derive(Debug, Clone)]
pub struct EpisodeManager {
    world: GridWorld,
    agents: AgentRegistry,
    snapshot: EpisodeSnapshot,
    state: EpisodeState,
    engine: TurnEngine,
}

impl EpisodeManager {
    /// Take ownership of a fully set-up world and capture its snapshot.
    pub fn new(world: GridWorld, agents: AgentRegistry) -> Self {
        let snapshot = EpisodeSnapshot::capture(&world, &agents);
        info!(
            size = world.size(),
            agents = agents.len(),
            rewards = world.count(Cell::Reward),
            "Episode snapshot captured"
        );
        Self {
            world,
            agents,
            snapshot,
            state: EpisodeState::default(),
            engine: TurnEngine::new(),
        }
    }

    /// Live terrain.
    pub const fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Live roster.
    pub const fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Scoreboard.
    pub const fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// The starting world every reset returns to.
    pub const fn snapshot(&self) -> &EpisodeSnapshot {
        &self.snapshot
    }

    /// Phase reached by the most recent turn.
    pub const fn turn_phase(&self) -> TurnPhase {
        self.engine.phase()
    }

    /// Valid actions for the agent at roster `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::UnknownAgent`] for a bad index.
    pub fn valid_actions(&self, index: usize) -> Result<Vec<Action>, TurnError> {
        let agent = self.agents.get(index).ok_or(TurnError::UnknownAgent(index))?;
        Ok(valid_actions(&self.world, agent.position))
    }

    /// Observation for the agent at roster `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::UnknownAgent`] for a bad index.
    pub fn observe(&self, index: usize) -> Result<Observation, TurnError> {
        assemble_observation(&self.world, &self.agents, index)
    }

    /// Run one agent-turn, resetting the episode on capture or when the last
    /// reward is taken. A capture wins when both happen on the same turn.
    ///
    /// # Errors
    ///
    /// Propagates [`TurnError`] from the turn engine; on error nothing has
    /// changed.
    pub fn step(&mut self, index: usize, action: Action) -> Result<StepReport, TurnError> {
        let outcome = self
            .engine
            .execute(&mut self.world, &mut self.agents, index, action)?;

        self.state.episode_turns = self.state.episode_turns.saturating_add(1);
        if outcome.reward_collected {
            self.state.score = self.state.score.saturating_add(1);
            self.state.high_score = self.state.high_score.max(self.state.score);
            debug!(agent = %outcome.agent, position = %outcome.to, score = self.state.score, "Reward collected");
        }

        let reason = outcome.capture.map(EndReason::Capture).or_else(|| {
            (outcome.reward_collected && self.world.count(Cell::Reward) == 0)
                .then_some(EndReason::RewardsExhausted)
        });
        let terminal = reason.map(|reason| {
            let final_score = self.state.score;
            self.reset();
            EpisodeEnd {
                iteration: self.state.iteration,
                final_score,
                reason,
            }
        });

        Ok(StepReport { outcome, terminal })
    }

    /// Restore the starting world and start a new episode.
    pub fn reset(&mut self) {
        info!(
            iteration = self.state.iteration,
            score = self.state.score,
            turns = self.state.episode_turns,
            "Episode ended"
        );
        self.world = self.snapshot.world.clone();
        self.agents.restore(&self.snapshot.agents);
        self.state.score = 0;
        self.state.episode_turns = 0;
        self.state.iteration = self.state.iteration.saturating_add(1);
    }

    /// Put a reward on the live terrain.
    ///
    /// With `at`, the reward goes exactly there; without, on a uniformly
    /// random empty cell no agent stands on. Placing a reward where one
    /// already lies is a no-op success. The snapshot is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`EpisodeError::World`] out of bounds,
    /// [`EpisodeError::CellNotPassable`] on a wall,
    /// [`EpisodeError::CellOccupied`] under an agent, or
    /// [`EpisodeError::NoFreeCell`] when random placement has no candidate.
    pub fn add_reward<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        at: Option<Position>,
    ) -> Result<Position, EpisodeError> {
        place_reward(&mut self.world, &self.agents, rng, at)
    }
}

/// Shared by live placement and setup-time scattering.
pub(crate) fn place_reward<R: Rng + ?Sized>(
    world: &mut GridWorld,
    agents: &AgentRegistry,
    rng: &mut R,
    at: Option<Position>,
) -> Result<Position, EpisodeError> {
    let position = match at {
        Some(position) => {
            if !world.get(position)?.is_passable() {
                return Err(EpisodeError::CellNotPassable(position));
            }
            if agents.is_occupied(position) {
                return Err(EpisodeError::CellOccupied(position));
            }
            position
        }
        None => {
            let free: Vec<Position> = world
                .cells_of(Cell::Empty)
                .into_iter()
                .filter(|&p| !agents.is_occupied(p))
                .collect();
            *free.choose(rng).ok_or(EpisodeError::NoFreeCell)?
        }
    };
    world.set(position, Cell::Reward)?;
    debug!(%position, "Reward placed");
    Ok(position)
}
