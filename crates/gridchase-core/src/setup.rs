//! Episode setup: terrain, roster, and starting rewards.
//!
//! [`EpisodeSetup`] gathers everything needed before the first turn and
//! hands back an [`EpisodeManager`] whose snapshot holds the finished
//! world. Steps run in a fixed order:
//!
//! 1. Terrain: the explicit grid if one was supplied, else a freshly
//!    generated maze.
//! 2. Roster: agents with a fixed position are registered first (so random
//!    placement cannot steal their cell), then the rest on random free
//!    cells.
//! 3. Rewards: `initial_rewards` scattered on empty cells no agent stands
//!    on. Placement stops early, with a warning, once no such cell is left.

use gridchase_agents::{AgentError, AgentRegistry};
use gridchase_world::{GridWorld, MazeGenerator, MazeParams, WorldError};
use rand::Rng;
use tracing::{info, warn};

use crate::config::{AgentConfig, SimulationConfig};
use crate::episode::{EpisodeError, EpisodeManager, place_reward};

/// Errors that can occur while building an episode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// Terrain generation or validation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent could not be placed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A starting reward could not be placed.
    #[error("episode error: {source}")]
    Episode {
        /// The underlying episode error.
        #[from]
        source: EpisodeError,
    },
}

/// Builder for a ready-to-run [`EpisodeManager`].
#[derive(Debug, Clone)]
pub struct EpisodeSetup {
    params: MazeParams,
    terrain: Option<GridWorld>,
    initial_rewards: usize,
    roster: Vec<AgentConfig>,
}

impl EpisodeSetup {
    /// Generated terrain, no rewards, no agents.
    pub const fn new(params: MazeParams) -> Self {
        Self {
            params,
            terrain: None,
            initial_rewards: 0,
            roster: Vec::new(),
        }
    }

    /// Everything the config describes.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            params: config.world.maze_params(),
            terrain: None,
            initial_rewards: config.world.initial_rewards,
            roster: config.agents.clone(),
        }
    }

    /// Use this grid instead of generating one.
    #[must_use]
    pub fn with_terrain(mut self, terrain: GridWorld) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Number of rewards to scatter after placing agents.
    #[must_use]
    pub const fn with_initial_rewards(mut self, count: usize) -> Self {
        self.initial_rewards = count;
        self
    }

    /// Append one agent to the roster.
    #[must_use]
    pub fn with_agent(mut self, agent: AgentConfig) -> Self {
        self.roster.push(agent);
        self
    }

    /// Build the world and capture its snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::World`] for invalid generator parameters,
    /// or [`SetupError::Agent`] when an agent cannot be placed.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<EpisodeManager, SetupError> {
        let mut world = match self.terrain {
            Some(terrain) => terrain,
            None => MazeGenerator::new(self.params)?.generate(rng)?.grid,
        };

        let mut agents = AgentRegistry::new();
        let (fixed, roaming): (Vec<&AgentConfig>, Vec<&AgentConfig>) =
            self.roster.iter().partition(|a| a.position.is_some());
        for agent in fixed {
            if let Some(position) = agent.position {
                agents.register_at(&world, position, agent.role, agent.color, agent.control)?;
            }
        }
        for agent in roaming {
            agents.register_random(&world, rng, agent.role, agent.color, agent.control)?;
        }

        let mut placed: usize = 0;
        while placed < self.initial_rewards {
            match place_reward(&mut world, &agents, rng, None) {
                Ok(_) => placed = placed.saturating_add(1),
                Err(EpisodeError::NoFreeCell) => {
                    warn!(
                        requested = self.initial_rewards,
                        placed, "No free cell left for starting rewards"
                    );
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            size = world.size(),
            agents = agents.len(),
            rewards = placed,
            "Episode setup complete"
        );
        Ok(EpisodeManager::new(world, agents))
    }
}
