//! Observation payload delivered to policy providers.
//!
//! Before an agent acts, the engine assembles an [`Observation`]: the
//! flattened terrain, every agent's position and role, and the set of
//! actions the agent may legally take this turn. The observation is a
//! detached copy, so a policy can hold on to it without borrowing the world.

use serde::{Deserialize, Serialize};

use crate::enums::{Action, Role};
use crate::ids::AgentId;
use crate::structs::Position;

/// Feature code of the observing agent's own cell.
pub const SELF_CODE: u8 = 2;

/// Feature code of a cell occupied by an opposite-role agent.
pub const OPPONENT_CODE: u8 = 4;

/// Public view of one agent inside an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    /// The agent's identity.
    pub id: AgentId,
    /// Where the agent stands.
    pub position: Position,
    /// Pursuer or target.
    pub role: Role,
}

/// Everything a policy provider is shown before choosing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Side length of the square grid.
    pub size: usize,
    /// Terrain codes in row-major order (`size * size` entries).
    pub cells: Vec<u8>,
    /// All agents in registry order.
    pub agents: Vec<AgentView>,
    /// Index of the observing agent within `agents`.
    pub self_index: usize,
    /// Actions the observing agent may take this turn. Always contains
    /// [`Action::Stay`].
    pub valid_actions: Vec<Action>,
}

impl Observation {
    /// The observing agent's own view, if the index is consistent.
    pub fn me(&self) -> Option<&AgentView> {
        self.agents.get(self.self_index)
    }

    /// Whether `action` is in the valid-action set.
    pub fn allows(&self, action: Action) -> bool {
        self.valid_actions.contains(&action)
    }

    /// Flatten into a numeric feature vector.
    ///
    /// Terrain codes are copied as-is, then the observer's cell is marked
    /// with [`SELF_CODE`] and every opposite-role agent's cell with
    /// [`OPPONENT_CODE`]. Same-role agents are not marked.
    pub fn to_features(&self) -> Vec<f32> {
        let mut codes = self.cells.clone();
        if let Some(me) = self.me() {
            let opponent = me.role.opposite();
            for view in self.agents.iter().filter(|v| v.role == opponent) {
                if let Some(slot) = self.flat_index(view.position).and_then(|i| codes.get_mut(i)) {
                    *slot = OPPONENT_CODE;
                }
            }
            if let Some(slot) = self.flat_index(me.position).and_then(|i| codes.get_mut(i)) {
                *slot = SELF_CODE;
            }
        }
        codes.into_iter().map(f32::from).collect()
    }

    fn flat_index(&self, position: Position) -> Option<usize> {
        if position.row >= self.size || position.col >= self.size {
            return None;
        }
        position.row.checked_mul(self.size)?.checked_add(position.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Observation {
        Observation {
            size: 2,
            cells: vec![0, 1, 3, 0],
            agents: vec![
                AgentView {
                    id: AgentId::new(0),
                    position: Position::new(0, 0),
                    role: Role::Target,
                },
                AgentView {
                    id: AgentId::new(1),
                    position: Position::new(1, 1),
                    role: Role::Pursuer,
                },
            ],
            self_index: 0,
            valid_actions: vec![Action::Stay, Action::Down],
        }
    }

    #[test]
    fn features_mark_self_and_opponents() {
        let features = sample().to_features();
        assert_eq!(features, vec![2.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn allows_checks_valid_set() {
        let obs = sample();
        assert!(obs.allows(Action::Stay));
        assert!(obs.allows(Action::Down));
        assert!(!obs.allows(Action::Right));
    }

    #[test]
    fn observation_serializes() {
        let json = serde_json::to_value(sample()).unwrap_or_default();
        assert_eq!(json["size"], 2);
        assert_eq!(json["valid_actions"][1], "down");
    }
}
