//! Policy provider trait and built-in policies.
//!
//! Before each agent-turn the engine presents the agent with an
//! [`Observation`] and asks a [`PolicyProvider`] for an [`Action`]. The
//! trait abstracts where decisions come from: a learned model, a human at
//! the keyboard, a scripted bot, or a test stub.
//!
//! A policy is free to return an action outside the observation's
//! valid-action set; the turn engine rejects it and the agent loses its
//! turn.
//!
//! Policies that need randomness own their RNG, so a seeded run stays
//! reproducible regardless of how many agents share one policy.

use gridchase_types::{Action, Agent, Cell, Observation, Position, Role};
use gridchase_world::{GridWorld, bfs_nearest};
use rand::Rng;
use rand::seq::IndexedRandom;

/// A source of agent actions.
pub trait PolicyProvider {
    /// Pick an action for `agent` given what it can observe.
    fn choose_action(&mut self, agent: &Agent, observation: &Observation) -> Action;
}

/// Always returns [`Action::Stay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StayPolicy;

impl PolicyProvider for StayPolicy {
    fn choose_action(&mut self, _agent: &Agent, _observation: &Observation) -> Action {
        Action::Stay
    }
}

/// Uniformly random choice over the valid-action set.
#[derive(Debug, Clone)]
pub struct RandomPolicy<R> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    /// Wrap an RNG.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PolicyProvider for RandomPolicy<R> {
    fn choose_action(&mut self, _agent: &Agent, observation: &Observation) -> Action {
        random_valid(&mut self.rng, observation)
    }
}

/// Walks toward the nearest reward, or wanders when none is reachable.
#[derive(Debug, Clone)]
pub struct RewardSeekingPolicy<R> {
    rng: R,
}

impl<R: Rng> RewardSeekingPolicy<R> {
    /// Wrap an RNG used for the random fallback.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PolicyProvider for RewardSeekingPolicy<R> {
    fn choose_action(&mut self, _agent: &Agent, observation: &Observation) -> Action {
        step_to_reward(observation).unwrap_or_else(|| random_valid(&mut self.rng, observation))
    }
}

/// The stock behaviour: targets seek rewards, pursuers hold still.
///
/// Pursuers are expected to run under scripted pursuit, where the turn
/// engine replaces their action anyway; `Stay` is always valid, so the
/// request never fails validation.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy<R> {
    seeker: RewardSeekingPolicy<R>,
}

impl<R: Rng> ScriptedPolicy<R> {
    /// Wrap an RNG used by the reward seeker.
    pub const fn new(rng: R) -> Self {
        Self {
            seeker: RewardSeekingPolicy::new(rng),
        }
    }
}

impl<R: Rng> PolicyProvider for ScriptedPolicy<R> {
    fn choose_action(&mut self, agent: &Agent, observation: &Observation) -> Action {
        match agent.role {
            Role::Target => self.seeker.choose_action(agent, observation),
            Role::Pursuer => Action::Stay,
        }
    }
}

fn random_valid<R: Rng + ?Sized>(rng: &mut R, observation: &Observation) -> Action {
    observation
        .valid_actions
        .choose(rng)
        .copied()
        .unwrap_or(Action::Stay)
}

/// First step of the shortest path to any reward in the observation.
fn step_to_reward(observation: &Observation) -> Option<Action> {
    let me = observation.me()?;
    let grid = terrain(observation)?;
    let path = bfs_nearest(&grid, me.position, |c| grid.get(c) == Ok(Cell::Reward))?;
    let next = path.get(1).copied()?;
    me.position
        .action_towards(next)
        .filter(|&action| observation.allows(action))
}

/// Rebuild terrain from an observation's cell codes.
fn terrain(observation: &Observation) -> Option<GridWorld> {
    let mut grid = GridWorld::new(observation.size).ok()?;
    let positions: Vec<Position> = grid.positions().collect();
    if positions.len() != observation.cells.len() {
        return None;
    }
    for (position, &code) in positions.into_iter().zip(&observation.cells) {
        grid.set(position, Cell::from_code(code).unwrap_or_default()).ok()?;
    }
    Some(grid)
}
