//! Agent roster with per-role occupancy indices.
//!
//! The [`AgentRegistry`] keeps agents in registration order (the order in
//! which the engine lets them act each tick) alongside two
//! [`OccupancyIndex`]es, one per [`Role`]. Every position change goes
//! through [`AgentRegistry::move_agent`], which updates the agent and its
//! index entry together, so the indices can never drift from the roster.
//!
//! Placement rules:
//!
//! - an agent may only be registered on passable terrain,
//! - no two agents may share a cell at registration time,
//! - after registration, agents move freely; overlap between opposite
//!   roles is how captures happen, so moves do not check occupancy.

use std::collections::BTreeMap;

use gridchase_types::{Agent, AgentColor, AgentId, Control, Position, Role};
use gridchase_world::GridWorld;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::error::AgentError;

/// Multiset of positions: how many agents of one role stand on each cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    counts: BTreeMap<Position, usize>,
}

impl OccupancyIndex {
    /// Create an empty index.
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Record one more agent at `position`.
    pub fn insert(&mut self, position: Position) {
        let count = self.counts.entry(position).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Forget one agent at `position`. No-op if none is recorded there.
    pub fn remove(&mut self, position: Position) {
        if let Some(count) = self.counts.get_mut(&position) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&position);
            }
        }
    }

    /// Whether at least one agent is recorded at `position`.
    pub fn contains(&self, position: Position) -> bool {
        self.counts.contains_key(&position)
    }

    /// Number of agents recorded at `position`.
    pub fn count_at(&self, position: Position) -> usize {
        self.counts.get(&position).copied().unwrap_or(0)
    }

    /// Total number of agents recorded.
    pub fn total(&self) -> usize {
        self.counts.values().fold(0, |acc, n| acc.saturating_add(*n))
    }

    fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Ordered roster of agents plus one occupancy index per role.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    /// Agents in registration (turn) order.
    agents: Vec<Agent>,
    /// Cells occupied by pursuers.
    pursuers: OccupancyIndex,
    /// Cells occupied by targets.
    targets: OccupancyIndex,
    /// Next identifier to hand out.
    next_id: u32,
}

impl AgentRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            agents: Vec::new(),
            pursuers: OccupancyIndex::new(),
            targets: OccupancyIndex::new(),
            next_id: 0,
        }
    }

    // -------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------

    /// Register an agent at an explicit cell.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if `position` is out of bounds,
    /// [`AgentError::CellNotPassable`] for a wall, or
    /// [`AgentError::CellOccupied`] if any agent already stands there.
    pub fn register_at(
        &mut self,
        grid: &GridWorld,
        position: Position,
        role: Role,
        color: AgentColor,
        control: Control,
    ) -> Result<AgentId, AgentError> {
        if !grid.get(position)?.is_passable() {
            return Err(AgentError::CellNotPassable(position));
        }
        if self.is_occupied(position) {
            return Err(AgentError::CellOccupied(position));
        }
        self.push(position, role, color, control)
    }

    /// Register an agent on a uniformly random passable, unoccupied cell.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NoFreeCell`] if every passable cell is taken.
    pub fn register_random<R: Rng + ?Sized>(
        &mut self,
        grid: &GridWorld,
        rng: &mut R,
        role: Role,
        color: AgentColor,
        control: Control,
    ) -> Result<AgentId, AgentError> {
        let free = self.free_cells(grid);
        let position = *free.choose(rng).ok_or(AgentError::NoFreeCell)?;
        self.push(position, role, color, control)
    }

    fn push(
        &mut self,
        position: Position,
        role: Role,
        color: AgentColor,
        control: Control,
    ) -> Result<AgentId, AgentError> {
        let id = AgentId::new(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(AgentError::IdExhausted)?;
        self.agents.push(Agent {
            id,
            position,
            role,
            color,
            control,
        });
        self.index_mut(role).insert(position);
        debug!(agent = %id, %position, ?role, "Agent registered");
        Ok(id)
    }

    /// Drop every agent and reset identifiers.
    pub fn clear(&mut self) {
        self.agents.clear();
        self.pursuers.clear();
        self.targets.clear();
        self.next_id = 0;
    }

    /// Replace the roster wholesale and rebuild both indices.
    ///
    /// Used to restore a previously captured roster; the records are taken
    /// as-is.
    pub fn restore(&mut self, roster: &[Agent]) {
        self.clear();
        self.agents = roster.to_vec();
        for agent in &self.agents {
            match agent.role {
                Role::Pursuer => self.pursuers.insert(agent.position),
                Role::Target => self.targets.insert(agent.position),
            }
        }
        self.next_id = roster
            .iter()
            .map(|a| a.id.into_inner().saturating_add(1))
            .max()
            .unwrap_or(0);
    }

    // -------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------

    /// Move the agent at `index` to `to`, keeping the role index in step.
    ///
    /// Returns the position the agent left.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AgentNotFound`] for a bad index,
    /// [`AgentError::World`] if `to` is out of bounds, or
    /// [`AgentError::CellNotPassable`] if `to` is a wall. On error nothing
    /// changes.
    pub fn move_agent(
        &mut self,
        grid: &GridWorld,
        index: usize,
        to: Position,
    ) -> Result<Position, AgentError> {
        if !grid.get(to)?.is_passable() {
            return Err(AgentError::CellNotPassable(to));
        }
        let agent = self
            .agents
            .get_mut(index)
            .ok_or(AgentError::AgentNotFound(index))?;
        let from = agent.position;
        let role = agent.role;
        agent.position = to;

        let occupancy = self.index_mut(role);
        occupancy.remove(from);
        occupancy.insert(to);
        Ok(from)
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// All agents in turn order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The agent at roster `index`.
    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    /// Roster index of the agent with identifier `id`.
    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The occupancy index for `role`.
    pub const fn occupancy(&self, role: Role) -> &OccupancyIndex {
        match role {
            Role::Pursuer => &self.pursuers,
            Role::Target => &self.targets,
        }
    }

    /// Whether an agent of `role` stands on `position`.
    pub fn occupied_by(&self, position: Position, role: Role) -> bool {
        self.occupancy(role).contains(position)
    }

    /// Whether any agent stands on `position`.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.pursuers.contains(position) || self.targets.contains(position)
    }

    /// Roster indices of agents with `role` standing on `position`.
    pub fn indices_at(&self, position: Position, role: Role) -> Vec<usize> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.position == position && a.role == role)
            .map(|(i, _)| i)
            .collect()
    }

    /// Agents with the given role, paired with their roster index.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = (usize, &Agent)> {
        self.agents
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.role == role)
    }

    /// Passable cells no agent stands on, row-major.
    pub fn free_cells(&self, grid: &GridWorld) -> Vec<Position> {
        grid.passable_cells()
            .into_iter()
            .filter(|&p| !self.is_occupied(p))
            .collect()
    }

    const fn index_mut(&mut self, role: Role) -> &mut OccupancyIndex {
        match role {
            Role::Pursuer => &mut self.pursuers,
            Role::Target => &mut self.targets,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridchase_types::Cell;
    use gridchase_world::WorldError;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn walled_grid() -> GridWorld {
        let mut grid = GridWorld::new(4).unwrap();
        grid.set(p(1, 1), Cell::Wall).unwrap();
        grid.set(p(2, 2), Cell::Wall).unwrap();
        grid
    }

    /// Indices must mirror the roster exactly.
    fn assert_consistent(registry: &AgentRegistry) {
        for role in [Role::Pursuer, Role::Target] {
            let expected = registry.with_role(role).count();
            assert_eq!(registry.occupancy(role).total(), expected);
            for (_, agent) in registry.with_role(role) {
                assert!(registry.occupied_by(agent.position, role));
            }
        }
    }

    #[test]
    fn register_at_validates_cell() {
        let grid = walled_grid();
        let mut registry = AgentRegistry::new();

        let id = registry.register_at(&grid, p(0, 0), Role::Pursuer, AgentColor::Red, Control::External);
        assert_eq!(id, Ok(AgentId::new(0)));

        assert_eq!(
            registry.register_at(&grid, p(1, 1), Role::Target, AgentColor::Green, Control::External),
            Err(AgentError::CellNotPassable(p(1, 1)))
        );
        assert_eq!(
            registry.register_at(&grid, p(0, 0), Role::Target, AgentColor::Green, Control::External),
            Err(AgentError::CellOccupied(p(0, 0)))
        );
        assert!(matches!(
            registry.register_at(&grid, p(4, 0), Role::Target, AgentColor::Green, Control::External),
            Err(AgentError::World {
                source: WorldError::OutOfBounds { .. }
            })
        ));
        assert_eq!(registry.len(), 1);
        assert_consistent(&registry);
    }

    #[test]
    fn register_random_avoids_walls_and_agents() {
        let grid = walled_grid();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut registry = AgentRegistry::new();

        // 16 cells - 2 walls = 14 free cells.
        for i in 0..14 {
            let role = if i % 2 == 0 { Role::Pursuer } else { Role::Target };
            let placed = registry.register_random(&grid, &mut rng, role, AgentColor::Cyan, Control::External);
            assert!(placed.is_ok());
        }
        assert_eq!(
            registry.register_random(&grid, &mut rng, Role::Target, AgentColor::Cyan, Control::External),
            Err(AgentError::NoFreeCell)
        );

        for agent in registry.agents() {
            assert!(grid.is_passable(agent.position));
            assert_eq!(registry.indices_at(agent.position, agent.role).len(), 1);
        }
        assert_consistent(&registry);
    }

    #[test]
    fn move_updates_index_atomically() {
        let grid = walled_grid();
        let mut registry = AgentRegistry::new();
        registry
            .register_at(&grid, p(0, 0), Role::Target, AgentColor::Green, Control::External)
            .unwrap();

        let from = registry.move_agent(&grid, 0, p(0, 1)).unwrap();
        assert_eq!(from, p(0, 0));
        assert!(!registry.occupied_by(p(0, 0), Role::Target));
        assert!(registry.occupied_by(p(0, 1), Role::Target));
        assert!(!registry.occupied_by(p(0, 1), Role::Pursuer));
        assert_consistent(&registry);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let grid = walled_grid();
        let mut registry = AgentRegistry::new();
        registry
            .register_at(&grid, p(1, 0), Role::Pursuer, AgentColor::Red, Control::External)
            .unwrap();

        assert_eq!(
            registry.move_agent(&grid, 0, p(1, 1)),
            Err(AgentError::CellNotPassable(p(1, 1)))
        );
        assert_eq!(
            registry.move_agent(&grid, 3, p(0, 0)),
            Err(AgentError::AgentNotFound(3))
        );
        assert_eq!(registry.get(0).map(|a| a.position), Some(p(1, 0)));
        assert_consistent(&registry);
    }

    #[test]
    fn stacked_agents_are_counted() {
        let grid = walled_grid();
        let mut registry = AgentRegistry::new();
        registry
            .register_at(&grid, p(0, 0), Role::Pursuer, AgentColor::Red, Control::External)
            .unwrap();
        registry
            .register_at(&grid, p(0, 1), Role::Pursuer, AgentColor::Blue, Control::External)
            .unwrap();
        registry.move_agent(&grid, 1, p(0, 0)).unwrap();
        assert_eq!(registry.occupancy(Role::Pursuer).count_at(p(0, 0)), 2);

        registry.move_agent(&grid, 0, p(1, 0)).unwrap();
        assert!(registry.occupied_by(p(0, 0), Role::Pursuer));
        assert_consistent(&registry);
    }

    #[test]
    fn restore_rebuilds_indices() {
        let grid = walled_grid();
        let mut registry = AgentRegistry::new();
        registry
            .register_at(&grid, p(0, 0), Role::Pursuer, AgentColor::Red, Control::ScriptedPursuit)
            .unwrap();
        registry
            .register_at(&grid, p(3, 3), Role::Target, AgentColor::Green, Control::External)
            .unwrap();
        let saved = registry.agents().to_vec();

        registry.move_agent(&grid, 0, p(0, 1)).unwrap();
        registry.restore(&saved);

        assert_eq!(registry.agents(), saved.as_slice());
        assert!(registry.occupied_by(p(0, 0), Role::Pursuer));
        assert!(!registry.occupied_by(p(0, 1), Role::Pursuer));
        assert_consistent(&registry);

        let next = registry
            .register_at(&grid, p(2, 0), Role::Target, AgentColor::Cyan, Control::External)
            .unwrap();
        assert_eq!(next, AgentId::new(2));
        assert_eq!(registry.index_of(next), Some(2));
        assert_eq!(registry.index_of(AgentId::new(9)), None);
    }

    #[test]
    fn clear_empties_everything() {
        let grid = walled_grid();
        let mut registry = AgentRegistry::new();
        registry
            .register_at(&grid, p(0, 0), Role::Pursuer, AgentColor::Red, Control::External)
            .unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.is_occupied(p(0, 0)));
    }
}
