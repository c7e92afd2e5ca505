//! Core entity structs for the GridChase simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{Action, AgentColor, Control, Role};
use crate::ids::AgentId;

/// A grid coordinate as `(row, col)`.
///
/// Ordering is row-major, which is also the scan order used when the world
/// needs a deterministic "first" cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index, `0` is the top row.
    pub row: usize,
    /// Column index, `0` is the leftmost column.
    pub col: usize,
}

impl Position {
    /// Create a position from row and column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The position one step away in the direction of `action`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern, not the coordinate's.
    pub fn offset(self, action: Action) -> Option<Self> {
        match action {
            Action::Stay => Some(self),
            Action::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            Action::Down => self.row.checked_add(1).map(|row| Self::new(row, self.col)),
            Action::Left => self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            Action::Right => self.col.checked_add(1).map(|col| Self::new(self.row, col)),
        }
    }

    /// The action that moves from `self` to an adjacent (or equal) `to`.
    pub fn action_towards(self, to: Self) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|&action| self.offset(action) == Some(to))
    }

    /// Manhattan distance between two positions.
    pub const fn manhattan(self, other: Self) -> usize {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// An agent living in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Registry-assigned identity.
    pub id: AgentId,
    /// Current cell. Always passable terrain.
    pub position: Position,
    /// Pursuer or target.
    pub role: Role,
    /// Display colour; carries no meaning for the simulation.
    pub color: AgentColor,
    /// Whether moves come from the policy provider or scripted pursuit.
    pub control: Control,
}

impl Agent {
    /// Whether the turn engine drives this agent with scripted pursuit.
    pub fn is_scripted_pursuer(&self) -> bool {
        self.role == Role::Pursuer && self.control == Control::ScriptedPursuit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stops_at_zero() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(Action::Up), None);
        assert_eq!(origin.offset(Action::Left), None);
        assert_eq!(origin.offset(Action::Down), Some(Position::new(1, 0)));
        assert_eq!(origin.offset(Action::Right), Some(Position::new(0, 1)));
        assert_eq!(origin.offset(Action::Stay), Some(origin));
    }

    #[test]
    fn action_towards_neighbours() {
        let p = Position::new(3, 3);
        assert_eq!(p.action_towards(Position::new(2, 3)), Some(Action::Up));
        assert_eq!(p.action_towards(Position::new(3, 4)), Some(Action::Right));
        assert_eq!(p.action_towards(p), Some(Action::Stay));
        assert_eq!(p.action_towards(Position::new(5, 3)), None);
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(1, 7);
        let b = Position::new(4, 2);
        assert_eq!(a.manhattan(b), 8);
        assert_eq!(b.manhattan(a), 8);
    }

    #[test]
    fn scripted_only_for_pursuers() {
        let mut agent = Agent {
            id: AgentId::new(0),
            position: Position::new(0, 0),
            role: Role::Target,
            color: AgentColor::Green,
            control: Control::ScriptedPursuit,
        };
        assert!(!agent.is_scripted_pursuer());
        agent.role = Role::Pursuer;
        assert!(agent.is_scripted_pursuer());
    }
}
