//! Error types for the `gridchase-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use gridchase_types::Position;

/// Errors that can occur during terrain and generation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A coordinate lies outside `[0, size)²`.
    #[error("position {position} is out of bounds for a {size}x{size} grid")]
    OutOfBounds {
        /// The offending coordinate.
        position: Position,
        /// Side length of the grid.
        size: usize,
    },

    /// Construction parameters were rejected.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Explanation of what is wrong with the parameters.
        reason: String,
    },

    /// Arithmetic overflow while sizing or indexing the grid.
    #[error("arithmetic overflow in grid calculation")]
    ArithmeticOverflow,
}
