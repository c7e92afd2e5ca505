//! Error types for the gridchase-agents crate.
//!
//! Registration and movement never panic; every rejected operation leaves
//! the registry untouched and reports one of these variants.

use gridchase_types::Position;
use gridchase_world::WorldError;

/// Errors that can occur during roster operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
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

    /// Another agent already stands on the requested cell.
    #[error("cell {0} is already occupied")]
    CellOccupied(Position),

    /// No passable, unoccupied cell is left for placement.
    #[error("no free cell available for placement")]
    NoFreeCell,

    /// No agent exists at the given roster index.
    #[error("no agent at index {0}")]
    AgentNotFound(usize),

    /// The identifier space is exhausted.
    #[error("agent identifier space exhausted")]
    IdExhausted,
}
