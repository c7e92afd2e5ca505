//! Enumeration types for the GridChase simulation.
//!
//! Every lookup that maps a variant to data (cell codes, action indices) is
//! a `match` on the variant, so the tables are fixed at compile time.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// A single terrain cell.
///
/// Agents are never stored in cells; occupancy is tracked separately by the
/// agent registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// Open floor.
    #[default]
    Empty,
    /// Impassable wall. Permanent once generation finishes.
    Wall,
    /// Open floor holding a collectible reward.
    Reward,
}

impl Cell {
    /// Whether an agent may stand on this cell.
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Numeric code used in flattened observations.
    ///
    /// Codes `2` and `4` are reserved for the observing agent and its
    /// opponents (see [`crate::perception`]).
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Reward => 3,
        }
    }

    /// Inverse of [`Cell::code`]. Agent codes map to `None`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            3 => Some(Self::Reward),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A movement action an agent may take during its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Remain on the current cell. Always valid.
    #[default]
    Stay,
    /// Move one row towards row 0.
    Up,
    /// Move one row away from row 0.
    Down,
    /// Move one column towards column 0.
    Left,
    /// Move one column away from column 0.
    Right,
}

impl Action {
    /// Every action, in index order.
    pub const ALL: [Self; 5] = [Self::Stay, Self::Up, Self::Down, Self::Left, Self::Right];

    /// The four directional actions, in neighbour-scan order.
    pub const DIRECTIONS: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Stable index of this action (position in [`Action::ALL`]).
    pub const fn index(self) -> usize {
        match self {
            Self::Stay => 0,
            Self::Up => 1,
            Self::Down => 2,
            Self::Left => 3,
            Self::Right => 4,
        }
    }

    /// Inverse of [`Action::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Stay),
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            4 => Some(Self::Right),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// The role an agent plays in the chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Hunts targets; reaching a target's cell is a capture.
    Pursuer,
    /// Collects rewards while avoiding pursuers.
    Target,
}

impl Role {
    /// The role this role competes against.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Pursuer => Self::Target,
            Self::Target => Self::Pursuer,
        }
    }
}

/// Display colour of an agent. Opaque to the simulation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentColor {
    /// Yellow.
    #[default]
    Yellow,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Cyan.
    Cyan,
    /// Magenta.
    Magenta,
    /// Blue.
    Blue,
    /// White.
    White,
}

/// Who decides an agent's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// The action supplied by the policy provider is applied as-is.
    #[default]
    External,
    /// The turn engine replaces the supplied action with a step along the
    /// shortest path to the nearest target. Only meaningful for pursuers.
    ScriptedPursuit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_walls_block() {
        assert!(Cell::Empty.is_passable());
        assert!(Cell::Reward.is_passable());
        assert!(!Cell::Wall.is_passable());
    }

    #[test]
    fn cell_codes_invert() {
        for cell in [Cell::Empty, Cell::Wall, Cell::Reward] {
            assert_eq!(Cell::from_code(cell.code()), Some(cell));
        }
        assert_eq!(Cell::from_code(2), None);
        assert_eq!(Cell::from_code(4), None);
    }

    #[test]
    fn action_index_is_stable() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(5), None);
    }

    #[test]
    fn directions_exclude_stay() {
        assert!(!Action::DIRECTIONS.contains(&Action::Stay));
        assert_eq!(Action::DIRECTIONS.len(), 4);
    }

    #[test]
    fn roles_are_opposed() {
        assert_eq!(Role::Pursuer.opposite(), Role::Target);
        assert_eq!(Role::Target.opposite().opposite(), Role::Target);
    }

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&Control::ScriptedPursuit).unwrap_or_default();
        assert_eq!(json, "\"scripted_pursuit\"");
        let role: Option<Role> = serde_json::from_str("\"target\"").ok();
        assert_eq!(role, Some(Role::Target));
    }
}
